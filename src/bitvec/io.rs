//! Text parsing and printing.
//!
//! Unlike the binary codec in [`super::codec`], text I/O carries no
//! explicit width: `read` infers it from the number of significant bits in
//! the parsed magnitude, and `write` emits bare digits with no base prefix
//! or width annotation.

use ibig::UBig;

use super::BitVec;

/// Numeric base a text token is parsed/printed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Radix {
    /// Base 2.
    Binary,
    /// Base 8.
    Octal,
    /// Base 10.
    Decimal,
    /// Base 16.
    Hex,
}

impl Radix {
    fn value(self) -> u32 {
        match self {
            Radix::Binary => 2,
            Radix::Octal => 8,
            Radix::Decimal => 10,
            Radix::Hex => 16,
        }
    }
}

/// Parse the first whitespace-delimited token of `stream` as a `BitVec` in
/// the given `radix`.
///
/// Width is the number of significant bits in the parsed magnitude
/// (`0` parses as width 1, magnitude 0). A token that fails to parse in
/// `radix` also yields magnitude 0, width 1 -- malformed
/// text input is in-band, not an error.
///
/// Returns the parsed value and the byte length of the consumed token
/// (leading whitespace included), so callers can advance a cursor.
pub fn read(stream: &str, radix: Radix) -> (BitVec, usize) {
    let trimmed_start = stream.len() - stream.trim_start().len();
    let token_str = stream.trim_start();
    let token_len = token_str
        .find(char::is_whitespace)
        .unwrap_or(token_str.len());
    let token = &token_str[..token_len];
    let consumed = trimmed_start + token_len;

    let magnitude = UBig::from_str_radix(token, radix.value()).unwrap_or_else(|_| UBig::from(0u8));
    let width = magnitude.bit_len().max(1) as u16;
    (BitVec::from_magnitude(width, magnitude), consumed)
}

/// Render `value`'s magnitude in `radix`, with no base prefix or width
/// annotation.
pub fn write(value: &BitVec, radix: Radix) -> String {
    match radix {
        Radix::Binary => format!("{:b}", value.magnitude()),
        Radix::Octal => format!("{:o}", value.magnitude()),
        Radix::Decimal => format!("{}", value.magnitude()),
        Radix::Hex => format!("{:x}", value.magnitude()),
    }
}
