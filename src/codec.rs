//! Variable-width serialization of code words.
//!
//! A dictionary holding `space` entries needs `ceil(log2(space))` bits to
//! address any of them. The width is recomputed for every code word since
//! the dictionary grows and shrinks between emissions.

use std::io;

use crate::bits::{BitRead, BitWrite};
use crate::Code;

/// Number of bits needed to address a code space of `space` entries.
///
/// A space of one entry needs no bits at all. An empty space cannot be
/// addressed and must not be asked about.
pub fn code_width(space: usize) -> u32 {
    debug_assert!(space > 0, "an empty code space cannot be addressed");
    if space < 2 {
        0
    } else {
        usize::BITS - (space - 1).leading_zeros()
    }
}

/// Writes `code` as a [`code_width`]`(space)`-bit integer, most significant
/// bit first.
pub fn write_code<W: BitWrite>(sink: &mut W, code: Code, space: usize) -> io::Result<()> {
    debug_assert!(code < space, "code {} does not fit a space of {}", code, space);
    for shift in (0..code_width(space)).rev() {
        sink.write_bit(code & (1 << shift) != 0)?;
    }
    Ok(())
}

/// Reads a [`code_width`]`(space)`-bit integer, most significant bit first.
///
/// Returns `None` if the source runs out before the code word completes.
/// That is not an error here: a stream's zero-padding tail looks exactly
/// like a truncated code word, and only the caller knows which one it has.
pub fn read_code<R: BitRead>(source: &mut R, space: usize) -> io::Result<Option<Code>> {
    let mut code = 0;
    for _ in 0..code_width(space) {
        match source.read_bit()? {
            Some(bit) => code = code << 1 | Code::from(bit),
            None => return Ok(None),
        }
    }
    Ok(Some(code))
}
