use std::io;

error_chain! {
    foreign_links {
        Io(io::Error);
    }

    errors {
        MissingMapLump(lump: &'static str) {
            description("missing required map lump")
            display("missing required map lump: {}", lump)
        }
        MalformedLump(lump: &'static str, size: usize, record_size: usize) {
            description("lump size is not a whole number of records")
            display("{} lump is {} bytes, not a multiple of the {}-byte record", lump, size, record_size)
        }
        FieldOverflow(field: &'static str, max_len: usize) {
            description("name field too long to encode")
            display("value of {} does not fit in {} bytes", field, max_len)
        }
        InvalidPolygon(count: usize) {
            description("not enough vertices to close a polygon")
            display("a sector outline needs at least 3 vertices, got {}", count)
        }
    }
}
