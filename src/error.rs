//! Error types surfaced across the crate's public API.
//!
//! Precondition violations (out-of-range index, width-0 construction,
//! `to_int` on a width wider than 64 bits, ...) are programmer errors and
//! fail fast via `panic!`/`assert!` inside `bitvec::ops`, matching the
//! "not recoverable" classification in the core's error taxonomy; they have
//! no variant here. Parse failures and divide-by-zero are likewise in-band
//! (the operation still returns a value) and also have no variant here.
//! [`CodecError`] is the one failure mode callers are expected to handle.

use thiserror::Error;

/// Failure modes of [`crate::bitvec::codec`]'s binary (de)serialization.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CodecError {
    /// The input buffer ended before the declared `byte_len` of magnitude
    /// bytes (or the 4-byte header itself) could be read.
    #[error("truncated bitvec encoding: expected at least {expected} bytes, got {available}")]
    Truncated {
        /// Bytes required to finish decoding.
        expected: usize,
        /// Bytes actually available in the input.
        available: usize,
    },
    /// The encoded `byte_len` exceeds [`crate::consts::MAX_BYTE_LEN`].
    #[error("bitvec magnitude length {byte_len} exceeds the {max} byte cap")]
    MagnitudeTooLong {
        /// The `byte_len` field read from the stream.
        byte_len: u16,
        /// The cap it was checked against.
        max: u16,
    },
}
