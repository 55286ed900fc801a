//! In-memory editing of the binary map data in a Doom-engine level: typed
//! records for the geometry lumps, byte-for-byte pass-through for the
//! precomputed ones, and a handful of structural edits on top.
//!
//! Reading and writing the surrounding archive is somebody else's job; this
//! crate only consumes and produces ordered groups of named lumps.

#[macro_use]
extern crate bitflags;
#[macro_use]
extern crate error_chain;
#[macro_use]
extern crate nom;
extern crate byteorder;
extern crate euclid;

pub mod errors;
pub mod geom;
pub mod lump;
pub mod map;
pub mod parse;
pub mod transform;

pub use errors::{Error, ErrorKind, Result};
pub use lump::NameGroup;
pub use map::{MapEditor, ToVertex};
pub use parse::map::{
    decode_all, encode_all, GLSeg, GLVertex, LineFlags, Linedef, MapRecord, Sector, Seg, Sidedef,
    SubSector, Thing, ThingFlags, Vertex,
};
pub use transform::mirror;
