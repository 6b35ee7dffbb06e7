//! Cross-cutting size limits shared by [`crate::bitvec`] and its codec.

/// Largest legal [`crate::bitvec::BitVec`] width, per the Verilog width
/// ceiling this core enforces.
pub const MAX_WIDTH: u16 = u16::MAX;

/// Largest `byte_len` the binary codec will accept for a magnitude, per the
/// fixed wire layout in `bitvec::codec`.
pub const MAX_BYTE_LEN: u16 = 1024;
