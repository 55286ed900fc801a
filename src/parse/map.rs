//! The record codec for the binary map lumps.  Every lump here is a bare
//! array of one fixed-size record type: little-endian integers plus
//! NUL-padded 8-byte names, so decoding is slicing at a fixed stride and
//! encoding is concatenation.
//!
//! Nothing in this module checks that indices stored in one record actually
//! land inside another lump; garbage goes in and comes back out unchanged.

use std::io::Write;

use byteorder::{LittleEndian, WriteBytesExt};
use nom::{le_i16, le_i32, le_u16, IResult};

use super::util::fixed_length_ascii;
use errors::{ErrorKind, Result};

/// One fixed-size record type from a map lump.
pub trait MapRecord: Clone + Default {
    /// Encoded size of one record, in bytes.
    const BYTES: usize;

    /// Parses a whole lump as a run of records.
    fn parse_lump(buf: &[u8]) -> IResult<&[u8], Vec<Self>>;

    /// Appends this record's fixed-size encoding.
    fn write_to(&self, writer: &mut Write) -> Result<()>;
}

/// Slices a lump into fixed-size chunks and decodes each one.
pub fn decode_all<R: MapRecord>(lump: &'static str, buf: &[u8]) -> Result<Vec<R>> {
    if buf.len() % R::BYTES != 0 {
        bail!(ErrorKind::MalformedLump(lump, buf.len(), R::BYTES));
    }
    match R::parse_lump(buf) {
        Ok((leftovers, records)) => {
            if leftovers.is_empty() {
                Ok(records)
            } else {
                bail!(ErrorKind::MalformedLump(lump, buf.len(), R::BYTES))
            }
        }
        Err(_) => bail!(ErrorKind::MalformedLump(lump, buf.len(), R::BYTES)),
    }
}

/// Encodes a run of records back into lump bytes, `count * BYTES` long.
pub fn encode_all<R: MapRecord>(records: &[R]) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(records.len() * R::BYTES);
    for record in records {
        record.write_to(&mut buf)?;
    }
    Ok(buf)
}

// Names are stored as exactly 8 bytes, NUL-padded.  A longer name is a
// caller error, not something to truncate.
fn write_name(writer: &mut Write, field: &'static str, name: &str) -> Result<()> {
    if name.len() > 8 {
        bail!(ErrorKind::FieldOverflow(field, 8));
    }
    writer.write_all(name.as_bytes())?;
    for _ in name.len()..8 {
        writer.write_all(&[0])?;
    }
    Ok(())
}

bitflags! {
    /// The named bits of `Linedef::flags`.  Source ports define further bits
    /// above these; they pass through untouched.
    pub struct LineFlags: u16 {
        const IMPASSABLE     = 0x0001;
        const BLOCK_MONSTERS = 0x0002;
        const TWO_SIDED      = 0x0004;
        const UPPER_UNPEG    = 0x0008;
        const LOWER_UNPEG    = 0x0010;
        const SECRET         = 0x0020;
        const BLOCK_SOUND    = 0x0040;
        const INVISIBLE      = 0x0080;
        const AUTOMAP        = 0x0100;
    }
}

bitflags! {
    /// The named bits of `Thing::flags`.
    pub struct ThingFlags: u16 {
        const EASY        = 0x0001;
        const MEDIUM      = 0x0002;
        const HARD        = 0x0004;
        const DEAF        = 0x0008;
        const MULTIPLAYER = 0x0010;
    }
}

/// A corner point referenced by linedefs and segs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Vertex {
    pub x: i16,
    pub y: i16,
}

named!(vertex_lump<Vec<Vertex>>, many0!(complete!(do_parse!(
    x: le_i16 >>
    y: le_i16 >>
    (Vertex { x, y })
))));

impl MapRecord for Vertex {
    const BYTES: usize = 4;

    fn parse_lump(buf: &[u8]) -> IResult<&[u8], Vec<Vertex>> {
        vertex_lump(buf)
    }

    fn write_to(&self, writer: &mut Write) -> Result<()> {
        writer.write_i16::<LittleEndian>(self.x)?;
        writer.write_i16::<LittleEndian>(self.y)?;
        Ok(())
    }
}

/// A vertex from the GL nodes lumps: 16.16 fixed-point, so node builders can
/// split segs at fractional positions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GLVertex {
    pub x: i32,
    pub y: i32,
}

named!(gl_vertex_lump<Vec<GLVertex>>, many0!(complete!(do_parse!(
    x: le_i32 >>
    y: le_i32 >>
    (GLVertex { x, y })
))));

impl MapRecord for GLVertex {
    const BYTES: usize = 8;

    fn parse_lump(buf: &[u8]) -> IResult<&[u8], Vec<GLVertex>> {
        gl_vertex_lump(buf)
    }

    fn write_to(&self, writer: &mut Write) -> Result<()> {
        writer.write_i32::<LittleEndian>(self.x)?;
        writer.write_i32::<LittleEndian>(self.y)?;
        Ok(())
    }
}

/// One side of a linedef: texture names, offsets into them, and the sector
/// this side faces.  -1 means no sector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sidedef {
    pub off_x: i16,
    pub off_y: i16,
    pub tx_up: String,
    pub tx_low: String,
    pub tx_mid: String,
    pub sector: i16,
}

impl Default for Sidedef {
    fn default() -> Self {
        Sidedef {
            off_x: 0,
            off_y: 0,
            tx_up: "-".to_owned(),
            tx_low: "-".to_owned(),
            tx_mid: "-".to_owned(),
            sector: -1,
        }
    }
}

named!(sidedef_lump<Vec<Sidedef>>, many0!(complete!(do_parse!(
    off_x: le_i16 >>
    off_y: le_i16 >>
    tx_up: map!(apply!(fixed_length_ascii, 8), String::from) >>
    tx_low: map!(apply!(fixed_length_ascii, 8), String::from) >>
    tx_mid: map!(apply!(fixed_length_ascii, 8), String::from) >>
    sector: le_i16 >>
    (Sidedef { off_x, off_y, tx_up, tx_low, tx_mid, sector })
))));

impl MapRecord for Sidedef {
    const BYTES: usize = 30;

    fn parse_lump(buf: &[u8]) -> IResult<&[u8], Vec<Sidedef>> {
        sidedef_lump(buf)
    }

    fn write_to(&self, writer: &mut Write) -> Result<()> {
        writer.write_i16::<LittleEndian>(self.off_x)?;
        writer.write_i16::<LittleEndian>(self.off_y)?;
        write_name(writer, "tx_up", &self.tx_up)?;
        write_name(writer, "tx_low", &self.tx_low)?;
        write_name(writer, "tx_mid", &self.tx_mid)?;
        writer.write_i16::<LittleEndian>(self.sector)?;
        Ok(())
    }
}

/// A wall segment between two vertices, with up to two sidedefs.  -1 on
/// `front` or `back` means no sidedef on that side.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Linedef {
    pub vx_a: i16,
    pub vx_b: i16,
    pub flags: i16,
    pub action: i16,
    pub tag: i16,
    pub front: i16,
    pub back: i16,
}

impl Default for Linedef {
    fn default() -> Self {
        Linedef {
            vx_a: -1,
            vx_b: -1,
            flags: 0,
            action: 0,
            tag: 0,
            front: -1,
            back: -1,
        }
    }
}

impl Linedef {
    /// Tests one named flag bit.
    pub fn has_flag(&self, flag: LineFlags) -> bool {
        (self.flags as u16) & flag.bits() != 0
    }

    /// Sets or clears one named flag bit, leaving every other bit alone.
    pub fn set_flag(&mut self, flag: LineFlags, on: bool) {
        let bits = if on {
            self.flags as u16 | flag.bits()
        } else {
            self.flags as u16 & !flag.bits()
        };
        self.flags = bits as i16;
    }
}

named!(linedef_lump<Vec<Linedef>>, many0!(complete!(do_parse!(
    vx_a: le_i16 >>
    vx_b: le_i16 >>
    flags: le_i16 >>
    action: le_i16 >>
    tag: le_i16 >>
    front: le_i16 >>
    back: le_i16 >>
    (Linedef { vx_a, vx_b, flags, action, tag, front, back })
))));

impl MapRecord for Linedef {
    const BYTES: usize = 14;

    fn parse_lump(buf: &[u8]) -> IResult<&[u8], Vec<Linedef>> {
        linedef_lump(buf)
    }

    fn write_to(&self, writer: &mut Write) -> Result<()> {
        writer.write_i16::<LittleEndian>(self.vx_a)?;
        writer.write_i16::<LittleEndian>(self.vx_b)?;
        writer.write_i16::<LittleEndian>(self.flags)?;
        writer.write_i16::<LittleEndian>(self.action)?;
        writer.write_i16::<LittleEndian>(self.tag)?;
        writer.write_i16::<LittleEndian>(self.front)?;
        writer.write_i16::<LittleEndian>(self.back)?;
        Ok(())
    }
}

/// A placed actor or item.  `doomednum` picks what it is; `angle` is its
/// facing in degrees, 0 pointing east.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Thing {
    pub x: i16,
    pub y: i16,
    pub angle: i16,
    pub doomednum: i16,
    pub flags: i16,
}

impl Thing {
    /// Tests one named flag bit.
    pub fn has_flag(&self, flag: ThingFlags) -> bool {
        (self.flags as u16) & flag.bits() != 0
    }

    /// Sets or clears one named flag bit, leaving every other bit alone.
    pub fn set_flag(&mut self, flag: ThingFlags, on: bool) {
        let bits = if on {
            self.flags as u16 | flag.bits()
        } else {
            self.flags as u16 & !flag.bits()
        };
        self.flags = bits as i16;
    }
}

named!(thing_lump<Vec<Thing>>, many0!(complete!(do_parse!(
    x: le_i16 >>
    y: le_i16 >>
    angle: le_i16 >>
    doomednum: le_i16 >>
    flags: le_i16 >>
    (Thing { x, y, angle, doomednum, flags })
))));

impl MapRecord for Thing {
    const BYTES: usize = 10;

    fn parse_lump(buf: &[u8]) -> IResult<&[u8], Vec<Thing>> {
        thing_lump(buf)
    }

    fn write_to(&self, writer: &mut Write) -> Result<()> {
        writer.write_i16::<LittleEndian>(self.x)?;
        writer.write_i16::<LittleEndian>(self.y)?;
        writer.write_i16::<LittleEndian>(self.angle)?;
        writer.write_i16::<LittleEndian>(self.doomednum)?;
        writer.write_i16::<LittleEndian>(self.flags)?;
        Ok(())
    }
}

/// A floor/ceiling region.  The defaults are the stock prototype used when
/// drawing new geometry without a template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sector {
    pub z_floor: i16,
    pub z_ceil: i16,
    pub tx_floor: String,
    pub tx_ceil: String,
    pub light: i16,
    pub sector_type: i16,
    pub tag: i16,
}

impl Default for Sector {
    fn default() -> Self {
        Sector {
            z_floor: 0,
            z_ceil: 128,
            tx_floor: "FLOOR4_8".to_owned(),
            tx_ceil: "CEIL3_5".to_owned(),
            light: 160,
            sector_type: 0,
            tag: 0,
        }
    }
}

named!(sector_lump<Vec<Sector>>, many0!(complete!(do_parse!(
    z_floor: le_i16 >>
    z_ceil: le_i16 >>
    tx_floor: map!(apply!(fixed_length_ascii, 8), String::from) >>
    tx_ceil: map!(apply!(fixed_length_ascii, 8), String::from) >>
    light: le_i16 >>
    sector_type: le_i16 >>
    tag: le_i16 >>
    (Sector { z_floor, z_ceil, tx_floor, tx_ceil, light, sector_type, tag })
))));

impl MapRecord for Sector {
    const BYTES: usize = 26;

    fn parse_lump(buf: &[u8]) -> IResult<&[u8], Vec<Sector>> {
        sector_lump(buf)
    }

    fn write_to(&self, writer: &mut Write) -> Result<()> {
        writer.write_i16::<LittleEndian>(self.z_floor)?;
        writer.write_i16::<LittleEndian>(self.z_ceil)?;
        write_name(writer, "tx_floor", &self.tx_floor)?;
        write_name(writer, "tx_ceil", &self.tx_ceil)?;
        writer.write_i16::<LittleEndian>(self.light)?;
        writer.write_i16::<LittleEndian>(self.sector_type)?;
        writer.write_i16::<LittleEndian>(self.tag)?;
        Ok(())
    }
}

/// A piece of a linedef, as carved up by the node builder.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Seg {
    pub vx_a: i16,
    pub vx_b: i16,
    pub angle: i16,
    pub line: i16,
    pub side: i16,
    pub offset: i16,
}

named!(seg_lump<Vec<Seg>>, many0!(complete!(do_parse!(
    vx_a: le_i16 >>
    vx_b: le_i16 >>
    angle: le_i16 >>
    line: le_i16 >>
    side: le_i16 >>
    offset: le_i16 >>
    (Seg { vx_a, vx_b, angle, line, side, offset })
))));

impl MapRecord for Seg {
    const BYTES: usize = 12;

    fn parse_lump(buf: &[u8]) -> IResult<&[u8], Vec<Seg>> {
        seg_lump(buf)
    }

    fn write_to(&self, writer: &mut Write) -> Result<()> {
        writer.write_i16::<LittleEndian>(self.vx_a)?;
        writer.write_i16::<LittleEndian>(self.vx_b)?;
        writer.write_i16::<LittleEndian>(self.angle)?;
        writer.write_i16::<LittleEndian>(self.line)?;
        writer.write_i16::<LittleEndian>(self.side)?;
        writer.write_i16::<LittleEndian>(self.offset)?;
        Ok(())
    }
}

/// A contiguous run of segs forming one leaf of the node tree.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubSector {
    pub numsegs: i16,
    pub seg_a: u16,
}

named!(subsector_lump<Vec<SubSector>>, many0!(complete!(do_parse!(
    numsegs: le_i16 >>
    seg_a: le_u16 >>
    (SubSector { numsegs, seg_a })
))));

impl MapRecord for SubSector {
    const BYTES: usize = 4;

    fn parse_lump(buf: &[u8]) -> IResult<&[u8], Vec<SubSector>> {
        subsector_lump(buf)
    }

    fn write_to(&self, writer: &mut Write) -> Result<()> {
        writer.write_i16::<LittleEndian>(self.numsegs)?;
        writer.write_u16::<LittleEndian>(self.seg_a)?;
        Ok(())
    }
}

/// A seg from the GL nodes lumps.  `partner` is the seg facing the other
/// way across the same line, or -1.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GLSeg {
    pub vx_a: i16,
    pub vx_b: i16,
    pub line: i16,
    pub side: i16,
    pub partner: i16,
}

named!(gl_seg_lump<Vec<GLSeg>>, many0!(complete!(do_parse!(
    vx_a: le_i16 >>
    vx_b: le_i16 >>
    line: le_i16 >>
    side: le_i16 >>
    partner: le_i16 >>
    (GLSeg { vx_a, vx_b, line, side, partner })
))));

impl MapRecord for GLSeg {
    const BYTES: usize = 10;

    fn parse_lump(buf: &[u8]) -> IResult<&[u8], Vec<GLSeg>> {
        gl_seg_lump(buf)
    }

    fn write_to(&self, writer: &mut Write) -> Result<()> {
        writer.write_i16::<LittleEndian>(self.vx_a)?;
        writer.write_i16::<LittleEndian>(self.vx_b)?;
        writer.write_i16::<LittleEndian>(self.line)?;
        writer.write_i16::<LittleEndian>(self.side)?;
        writer.write_i16::<LittleEndian>(self.partner)?;
        Ok(())
    }
}
