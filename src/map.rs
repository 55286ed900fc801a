//! The map editor: typed sequences for one map's geometry lumps, raw bytes
//! for the precomputed ones, and the structural edits on top of them.

use errors::{ErrorKind, Result};
use geom::{Coord, Offset, Point};
use lump::NameGroup;
use parse::map::{
    decode_all, encode_all, GLSeg, GLVertex, LineFlags, Linedef, Sector, Seg, Sidedef, SubSector,
    Thing, Vertex,
};

/// Anything `draw_sector` accepts as a polygon corner: an existing vertex
/// record, or a raw coordinate pair.
pub trait ToVertex {
    fn to_vertex(&self) -> Vertex;
}

impl ToVertex for Vertex {
    fn to_vertex(&self) -> Vertex {
        self.clone()
    }
}

impl ToVertex for (Coord, Coord) {
    fn to_vertex(&self) -> Vertex {
        Vertex { x: self.0, y: self.1 }
    }
}

impl ToVertex for Point {
    fn to_vertex(&self) -> Vertex {
        Vertex { x: self.x, y: self.y }
    }
}

/// One map's worth of lumps, decoded into editable sequences.
///
/// Everything is public, and nothing stops you from putting the contents
/// into a state no engine would accept: records index each other by
/// position, with -1 for "none" where a reference is optional, and none of
/// the editing operations validate those indices.  The three precomputed
/// lumps (NODES, REJECT, BLOCKMAP) are carried as raw bytes and written
/// back exactly as they were loaded.
#[derive(Clone, Debug, Default)]
pub struct MapEditor {
    pub vertices: Vec<Vertex>,
    pub linedefs: Vec<Linedef>,
    pub sidedefs: Vec<Sidedef>,
    pub sectors: Vec<Sector>,
    pub things: Vec<Thing>,
    pub segs: Vec<Seg>,
    pub subsectors: Vec<SubSector>,

    pub nodes: Vec<u8>,
    pub reject: Vec<u8>,
    pub blockmap: Vec<u8>,

    /// GL nodes data, populated by `load_gl` and otherwise empty.
    pub gl_vertices: Vec<GLVertex>,
    pub gl_segs: Vec<GLSeg>,
    pub gl_subsectors: Vec<SubSector>,
}

fn required<'a>(group: &'a NameGroup, name: &'static str) -> Result<&'a [u8]> {
    group
        .get(name)
        .ok_or_else(|| ErrorKind::MissingMapLump(name).into())
}

impl MapEditor {
    /// A map with nothing in it.
    pub fn new() -> Self {
        MapEditor::default()
    }

    /// Decodes the ten lumps every vanilla map carries.
    pub fn from_lumps(group: &NameGroup) -> Result<MapEditor> {
        let mut ed = MapEditor::new();
        ed.vertices = decode_all("VERTEXES", required(group, "VERTEXES")?)?;
        ed.sidedefs = decode_all("SIDEDEFS", required(group, "SIDEDEFS")?)?;
        ed.sectors = decode_all("SECTORS", required(group, "SECTORS")?)?;
        ed.things = decode_all("THINGS", required(group, "THINGS")?)?;
        ed.linedefs = decode_all("LINEDEFS", required(group, "LINEDEFS")?)?;
        ed.subsectors = decode_all("SSECTORS", required(group, "SSECTORS")?)?;
        ed.segs = decode_all("SEGS", required(group, "SEGS")?)?;
        ed.blockmap = required(group, "BLOCKMAP")?.to_owned();
        ed.reject = required(group, "REJECT")?.to_owned();
        ed.nodes = required(group, "NODES")?.to_owned();
        Ok(ed)
    }

    /// Decodes the GL nodes lumps into the `gl_*` sequences.  These are
    /// auxiliary: nothing checks them against the primary geometry, and
    /// `to_lumps` does not write them back out.
    pub fn load_gl(&mut self, group: &NameGroup) -> Result<()> {
        // GL_VERT opens with a 4-byte version magic ("gNd2" and friends),
        // skipped without being checked.
        let data = required(group, "GL_VERT")?;
        let data = data.get(4..).unwrap_or(&[]);
        self.gl_vertices = decode_all("GL_VERT", data)?;
        self.gl_segs = decode_all("GL_SEGS", required(group, "GL_SEGS")?)?;
        self.gl_subsectors = decode_all("GL_SSECT", required(group, "GL_SSECT")?)?;
        Ok(())
    }

    /// Encodes the map back into its lump group, in the conventional order,
    /// with an empty map marker first.  Renaming the marker to the actual
    /// map slot is the caller's job.  The editor itself is untouched.
    pub fn to_lumps(&self) -> Result<NameGroup> {
        let mut group = NameGroup::new();
        group.push("_HEADER_", Vec::new());
        group.push("VERTEXES", encode_all(&self.vertices)?);
        group.push("THINGS", encode_all(&self.things)?);
        group.push("LINEDEFS", encode_all(&self.linedefs)?);
        group.push("SIDEDEFS", encode_all(&self.sidedefs)?);
        group.push("SECTORS", encode_all(&self.sectors)?);
        group.push("NODES", self.nodes.clone());
        group.push("SEGS", encode_all(&self.segs)?);
        group.push("SSECTORS", encode_all(&self.subsectors)?);
        group.push("BLOCKMAP", self.blockmap.clone());
        group.push("REJECT", self.reject.clone());
        // TODO the GL sequences loaded by load_gl are dropped here; writing
        // them back needs the GL_VERT magic carried through load_gl first
        Ok(group)
    }

    /// Appends a closed polygon: one new sector, plus a vertex, a sidedef,
    /// and a one-sided impassable linedef per edge.  The templates, when
    /// given, are copied for the new sector and sidedefs.  Existing records
    /// are never touched or renumbered.
    ///
    /// Edges run from corner `i+1` back to corner `i`, so listing corners
    /// counterclockwise puts their fronts on the outside.
    pub fn draw_sector<T: ToVertex>(
        &mut self,
        corners: &[T],
        sector: Option<&Sector>,
        sidedef: Option<&Sidedef>,
    ) -> Result<()> {
        if corners.len() < 3 {
            bail!(ErrorKind::InvalidPolygon(corners.len()));
        }

        let first_vertex = self.vertices.len() as i16;
        let first_sidedef = self.sidedefs.len() as i16;
        self.sectors.push(sector.cloned().unwrap_or_default());
        let new_sector = (self.sectors.len() - 1) as i16;

        for corner in corners {
            self.vertices.push(corner.to_vertex());
        }

        let n = corners.len();
        for i in 0..n {
            let mut side = sidedef.cloned().unwrap_or_default();
            side.sector = new_sector;
            self.sidedefs.push(side);

            let mut line = Linedef::default();
            line.vx_a = first_vertex + ((i + 1) % n) as i16;
            line.vx_b = first_vertex + i as i16;
            line.front = first_sidedef + i as i16;
            line.set_flag(LineFlags::IMPASSABLE, true);
            self.linedefs.push(line);
        }
        Ok(())
    }

    /// Appends a deep copy of everything in `other`, shifted by `offset`.
    /// Vertex, sidedef, and sector indices inside the copy are rebased past
    /// this map's existing records; a -1 "no sidedef" stays -1.  Indices
    /// that were already out of range in `other` come through as the same
    /// garbage, just rebased.
    pub fn paste(&mut self, other: &MapEditor, offset: Offset) {
        let vertex_base = self.vertices.len() as i16;
        let sidedef_base = self.sidedefs.len() as i16;
        let sector_base = self.sectors.len() as i16;

        for vertex in &other.vertices {
            self.vertices.push(Vertex {
                x: vertex.x.wrapping_add(offset.x),
                y: vertex.y.wrapping_add(offset.y),
            });
        }
        for linedef in &other.linedefs {
            let mut linedef = linedef.clone();
            linedef.vx_a = linedef.vx_a.wrapping_add(vertex_base);
            linedef.vx_b = linedef.vx_b.wrapping_add(vertex_base);
            if linedef.front != -1 {
                linedef.front = linedef.front.wrapping_add(sidedef_base);
            }
            if linedef.back != -1 {
                linedef.back = linedef.back.wrapping_add(sidedef_base);
            }
            self.linedefs.push(linedef);
        }
        for sidedef in &other.sidedefs {
            let mut sidedef = sidedef.clone();
            sidedef.sector = sidedef.sector.wrapping_add(sector_base);
            self.sidedefs.push(sidedef);
        }
        self.sectors.extend(other.sectors.iter().cloned());
        for thing in &other.things {
            let mut thing = thing.clone();
            thing.x = thing.x.wrapping_add(offset.x);
            thing.y = thing.y.wrapping_add(offset.y);
            self.things.push(thing);
        }
    }

    /// The smallest axis-aligned box around every vertex, as its (min, max)
    /// corners, or None for a map with no vertices.
    pub fn bbox(&self) -> Option<(Point, Point)> {
        let first = self.vertices.first()?;
        let mut min = Point::new(first.x, first.y);
        let mut max = min;
        for vertex in &self.vertices {
            if vertex.x < min.x {
                min.x = vertex.x;
            }
            if vertex.x > max.x {
                max.x = vertex.x;
            }
            if vertex.y < min.y {
                min.y = vertex.y;
            }
            if vertex.y > max.y {
                max.y = vertex.y;
            }
        }
        Some((min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geom::Offset;

    const REQUIRED_LUMPS: [&'static str; 10] = [
        "VERTEXES", "SIDEDEFS", "SECTORS", "THINGS", "LINEDEFS", "SSECTORS", "SEGS", "BLOCKMAP",
        "REJECT", "NODES",
    ];

    #[test]
    fn draw_sector_appends_a_closed_polygon() {
        let mut ed = MapEditor::new();
        ed.draw_sector(&[(0, 0), (10, 0), (10, 10), (0, 10)], None, None)
            .unwrap();

        assert_eq!(ed.sectors.len(), 1);
        assert_eq!(ed.vertices.len(), 4);
        assert_eq!(ed.sidedefs.len(), 4);
        assert_eq!(ed.linedefs.len(), 4);

        let pairs: Vec<(i16, i16)> = ed.linedefs.iter().map(|l| (l.vx_a, l.vx_b)).collect();
        assert_eq!(pairs, vec![(1, 0), (2, 1), (3, 2), (0, 3)]);
        for (i, line) in ed.linedefs.iter().enumerate() {
            assert_eq!(line.front, i as i16);
            assert_eq!(line.back, -1);
            assert_eq!(line.flags, 1);
            assert!(line.has_flag(LineFlags::IMPASSABLE));
        }
        for side in &ed.sidedefs {
            assert_eq!(side.sector, 0);
        }
        assert_eq!(ed.vertices[2], Vertex { x: 10, y: 10 });
    }

    #[test]
    fn draw_sector_needs_three_corners() {
        let mut ed = MapEditor::new();
        let err = ed.draw_sector(&[(0, 0), (1, 1)], None, None).unwrap_err();
        match *err.kind() {
            ErrorKind::InvalidPolygon(count) => assert_eq!(count, 2),
            ref other => panic!("wrong error: {}", other),
        }
        // nothing half-drawn
        assert!(ed.vertices.is_empty());
        assert!(ed.sectors.is_empty());
    }

    #[test]
    fn draw_sector_copies_its_templates() {
        let mut ed = MapEditor::new();
        let mut sector = Sector::default();
        sector.light = 255;
        let mut side = Sidedef::default();
        side.tx_mid = "STONE2".to_owned();
        ed.draw_sector(&[(0, 0), (64, 0), (64, 64)], Some(&sector), Some(&side))
            .unwrap();

        assert_eq!(ed.sectors[0].light, 255);
        for side in &ed.sidedefs {
            assert_eq!(side.tx_mid, "STONE2");
            assert_eq!(side.sector, 0);
        }
        // the template itself still points nowhere
        assert_eq!(side.sector, -1);
    }

    #[test]
    fn draw_sector_takes_vertex_records_too() {
        let mut ed = MapEditor::new();
        let corners = [
            Vertex { x: 0, y: 0 },
            Vertex { x: 8, y: 0 },
            Vertex { x: 8, y: 8 },
        ];
        ed.draw_sector(&corners, None, None).unwrap();
        assert_eq!(ed.vertices[1], Vertex { x: 8, y: 0 });

        // second polygon lands after the first, nothing renumbered
        ed.draw_sector(&[(100, 100), (116, 100), (116, 116)], None, None)
            .unwrap();
        assert_eq!(ed.linedefs[3].vx_a, 4);
        assert_eq!(ed.linedefs[3].vx_b, 3);
        assert_eq!(ed.linedefs[3].front, 3);
        assert_eq!(ed.sidedefs[3].sector, 1);
        assert_eq!(ed.linedefs[0].vx_a, 1);
    }

    #[test]
    fn paste_rebases_indices_and_shifts_coordinates() {
        let mut receiver = MapEditor::new();
        receiver
            .draw_sector(&[(0, 0), (10, 0), (10, 10)], None, None)
            .unwrap();

        let mut donor = MapEditor::new();
        donor.vertices.push(Vertex { x: 5, y: 5 });
        let mut line = Linedef::default();
        line.vx_a = 0;
        line.vx_b = 0;
        donor.linedefs.push(line);
        let mut side = Sidedef::default();
        side.sector = 0;
        donor.sidedefs.push(side);
        donor.sectors.push(Sector::default());
        let mut thing = Thing::default();
        thing.x = 1;
        thing.y = 2;
        donor.things.push(thing);

        receiver.paste(&donor, Offset::new(100, 0));

        assert_eq!(receiver.vertices.len(), 4);
        assert_eq!(receiver.vertices[3], Vertex { x: 105, y: 5 });
        let pasted = receiver.linedefs.last().unwrap();
        assert_eq!(pasted.vx_a, 3);
        assert_eq!(pasted.vx_b, 3);
        // -1 means "none" and never gets rebased
        assert_eq!(pasted.front, -1);
        assert_eq!(pasted.back, -1);
        assert_eq!(receiver.sidedefs.last().unwrap().sector, 1);
        assert_eq!(receiver.sectors.len(), 2);
        assert_eq!(receiver.things.last().unwrap().x, 101);
        assert_eq!(receiver.things.last().unwrap().y, 2);

        // the donor is untouched
        assert_eq!(donor.vertices[0], Vertex { x: 5, y: 5 });
        assert_eq!(donor.linedefs[0].vx_a, 0);
    }

    #[test]
    fn paste_rebases_real_sidedef_references() {
        let mut receiver = MapEditor::new();
        receiver
            .draw_sector(&[(0, 0), (10, 0), (10, 10)], None, None)
            .unwrap();
        let mut donor = MapEditor::new();
        donor
            .draw_sector(&[(0, 0), (20, 0), (20, 20)], None, None)
            .unwrap();

        receiver.paste(&donor, Offset::new(0, 200));

        let pasted = &receiver.linedefs[3];
        assert_eq!((pasted.vx_a, pasted.vx_b), (4, 3));
        assert_eq!(pasted.front, 3);
        assert_eq!(receiver.sidedefs[3].sector, 1);
        assert_eq!(receiver.vertices[3], Vertex { x: 0, y: 200 });
    }

    #[test]
    fn lump_round_trip_is_byte_identical() {
        let mut ed = MapEditor::new();
        ed.draw_sector(&[(0, 0), (128, 0), (128, 128), (0, 128)], None, None)
            .unwrap();
        let mut thing = Thing::default();
        thing.doomednum = 1;
        thing.angle = 90;
        ed.things.push(thing);
        ed.segs.push(Seg {
            vx_a: 0,
            vx_b: 1,
            angle: 0,
            line: 0,
            side: 0,
            offset: 0,
        });
        ed.subsectors.push(SubSector { numsegs: 1, seg_a: 0 });
        ed.nodes = vec![1, 2, 3, 4];
        ed.reject = vec![0];
        ed.blockmap = vec![9, 9];

        let lumps = ed.to_lumps().unwrap();
        assert_eq!(lumps.len(), 11);
        assert_eq!(lumps.iter().next().unwrap(), ("_HEADER_", &[][..]));
        for &name in REQUIRED_LUMPS.iter() {
            assert!(lumps.get(name).is_some(), "{} missing", name);
        }

        let again = MapEditor::from_lumps(&lumps).unwrap();
        assert_eq!(again.vertices, ed.vertices);
        assert_eq!(again.linedefs, ed.linedefs);
        assert_eq!(again.sidedefs, ed.sidedefs);
        assert_eq!(again.sectors, ed.sectors);
        assert_eq!(again.things, ed.things);
        assert_eq!(again.segs, ed.segs);
        assert_eq!(again.subsectors, ed.subsectors);
        assert_eq!(again.nodes, vec![1, 2, 3, 4]);
        assert_eq!(again.reject, vec![0]);
        assert_eq!(again.blockmap, vec![9, 9]);

        let a: Vec<(String, Vec<u8>)> = lumps
            .iter()
            .map(|(n, d)| (n.to_owned(), d.to_owned()))
            .collect();
        let b: Vec<(String, Vec<u8>)> = again
            .to_lumps()
            .unwrap()
            .iter()
            .map(|(n, d)| (n.to_owned(), d.to_owned()))
            .collect();
        assert_eq!(a, b);
    }

    #[test]
    fn from_lumps_names_the_missing_lump() {
        let mut group = NameGroup::new();
        for &name in REQUIRED_LUMPS.iter() {
            if name != "NODES" {
                group.push(name, Vec::new());
            }
        }
        let err = MapEditor::from_lumps(&group).unwrap_err();
        match *err.kind() {
            ErrorKind::MissingMapLump(lump) => assert_eq!(lump, "NODES"),
            ref other => panic!("wrong error: {}", other),
        }
    }

    #[test]
    fn from_lumps_rejects_partial_records() {
        let mut group = NameGroup::new();
        group.push("VERTEXES", vec![0, 0, 0, 0, 0]);
        for &name in REQUIRED_LUMPS.iter() {
            if name != "VERTEXES" {
                group.push(name, Vec::new());
            }
        }
        let err = MapEditor::from_lumps(&group).unwrap_err();
        match *err.kind() {
            ErrorKind::MalformedLump(lump, size, record_size) => {
                assert_eq!(lump, "VERTEXES");
                assert_eq!(size, 5);
                assert_eq!(record_size, 4);
            }
            ref other => panic!("wrong error: {}", other),
        }
    }

    #[test]
    fn load_gl_skips_the_version_magic() {
        let mut group = NameGroup::new();
        let mut vert = b"gNd2".to_vec();
        vert.extend(&[0, 0, 1, 0, 0, 0, 0xff, 0xff]);
        group.push("GL_VERT", vert);
        group.push("GL_SEGS", vec![0; 10]);
        group.push("GL_SSECT", vec![0; 4]);

        let mut ed = MapEditor::new();
        ed.load_gl(&group).unwrap();
        assert_eq!(ed.gl_vertices, vec![GLVertex { x: 0x10000, y: -0x10000 }]);
        assert_eq!(ed.gl_segs.len(), 1);
        assert_eq!(ed.gl_subsectors.len(), 1);
        // primary sequences stay empty; GL data is independent
        assert!(ed.vertices.is_empty());
    }

    #[test]
    fn load_gl_requires_all_three_lumps() {
        let mut group = NameGroup::new();
        group.push("GL_VERT", b"gNd2".to_vec());
        let mut ed = MapEditor::new();
        let err = ed.load_gl(&group).unwrap_err();
        match *err.kind() {
            ErrorKind::MissingMapLump(lump) => assert_eq!(lump, "GL_SEGS"),
            ref other => panic!("wrong error: {}", other),
        }
    }

    #[test]
    fn bbox_spans_all_vertices() {
        let mut ed = MapEditor::new();
        assert!(ed.bbox().is_none());
        ed.draw_sector(&[(-16, 0), (32, 8), (0, -4)], None, None)
            .unwrap();
        let (min, max) = ed.bbox().unwrap();
        assert_eq!((min.x, min.y), (-16, -4));
        assert_eq!((max.x, max.y), (32, 8));
    }
}
