//! Fixed binary wire format for [`BitVec`].
//!
//! Layout:
//!
//! ```text
//! u16 width (LE) | u16 byte_len (LE) | byte_len x u8 magnitude (BE, MSB-first)
//! ```
//!
//! The two integer header fields are host-native little-endian; the
//! magnitude bytes are big-endian (most-significant byte first) regardless
//! of host byte order, so a width-32 value like `5` keeps its leading
//! zero bytes across a round trip. `byte_len` is the minimal number of
//! bytes needed to hold the magnitude (`0` for a zero magnitude); it is
//! independent of `width` and never exceeds
//! [`crate::consts::MAX_BYTE_LEN`].

use ibig::UBig;

use crate::consts::MAX_BYTE_LEN;
use crate::error::CodecError;

use super::BitVec;

const HEADER_LEN: usize = 4;

fn minimal_byte_len(magnitude: &UBig) -> usize {
    (magnitude.bit_len() + 7) / 8
}

fn to_be_bytes(magnitude: &UBig, len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    let mut n = magnitude.clone();
    let byte_mask = UBig::from(0xFFu32);
    for slot in bytes.iter_mut().rev() {
        let byte = &n & &byte_mask;
        *slot = u8::try_from(&byte).expect("masked by 0xFF");
        n = n >> 8usize;
    }
    bytes
}

fn from_be_bytes(bytes: &[u8]) -> UBig {
    let mut n = UBig::from(0u8);
    for &b in bytes {
        n = (n << 8usize) | UBig::from(b);
    }
    n
}

/// Encode `value` into its fixed binary representation.
pub fn encode(value: &BitVec) -> Vec<u8> {
    let byte_len = minimal_byte_len(value.magnitude());
    let mut out = Vec::with_capacity(HEADER_LEN + byte_len);
    out.extend_from_slice(&value.width().to_le_bytes());
    out.extend_from_slice(&(byte_len as u16).to_le_bytes());
    out.extend_from_slice(&to_be_bytes(value.magnitude(), byte_len));
    out
}

/// Decode a `BitVec` from the front of `bytes`.
///
/// Returns the decoded value and the number of bytes consumed, so callers
/// can decode a stream of back-to-back encodings.
pub fn decode(bytes: &[u8]) -> Result<(BitVec, usize), CodecError> {
    if bytes.len() < HEADER_LEN {
        return Err(CodecError::Truncated {
            expected: HEADER_LEN,
            available: bytes.len(),
        });
    }

    let width = u16::from_le_bytes([bytes[0], bytes[1]]);
    let byte_len = u16::from_le_bytes([bytes[2], bytes[3]]);

    if byte_len > MAX_BYTE_LEN {
        return Err(CodecError::MagnitudeTooLong {
            byte_len,
            max: MAX_BYTE_LEN,
        });
    }

    let total = HEADER_LEN + byte_len as usize;
    if bytes.len() < total {
        return Err(CodecError::Truncated {
            expected: total,
            available: bytes.len(),
        });
    }

    let magnitude = from_be_bytes(&bytes[HEADER_LEN..total]);
    let width = width.max(1);
    Ok((BitVec::from_magnitude(width, magnitude), total))
}
