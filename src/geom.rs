use euclid::{TypedPoint2D, TypedVector2D};

pub struct MapSpace;
/// Map coordinates are 16-bit on the wire, so they are 16-bit here too.
pub type Coord = i16;
pub type Point = TypedPoint2D<Coord, MapSpace>;
pub type Offset = TypedVector2D<Coord, MapSpace>;
