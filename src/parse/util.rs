use std::str;

use nom::{self, IResult, Needed};

/// Reads a fixed-width name field: printable ASCII, NUL-padded out to `len`
/// bytes.  Anything after the first NUL is ignored.
pub fn fixed_length_ascii(input: &[u8], len: usize) -> IResult<&[u8], &str> {
    if input.len() < len {
        return Err(nom::Err::Incomplete(Needed::Size(len)));
    }

    let field = &input[..len];
    let end = field.iter().position(|&b| b == 0).unwrap_or(len);
    for (i, &b) in field[..end].iter().enumerate() {
        match b {
            32..=126 => {}
            _ => {
                return Err(nom::Err::Error(nom::Context::Code(
                    &input[i..],
                    nom::ErrorKind::Custom(0),
                )));
            }
        }
    }

    // Everything up to `end` was just checked to be printable ASCII, so this
    // is valid UTF-8.
    Ok((&input[len..], unsafe {
        str::from_utf8_unchecked(&field[..end])
    }))
}
