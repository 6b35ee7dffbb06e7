#![allow(clippy::wrong_self_convention)]
// `to_bool`/`to_int`/`to_u64` etc. take `&self` rather than `self`: `BitVec`
// isn't `Copy`, and these are cheap, non-consuming reads of the magnitude.

//! Core value types for the Cascade Verilog simulation platform.
//!
//! [`bitvec::BitVec`] is the sized bit-vector value that backs every
//! simulated signal, register, wire, literal, and expression temporary.
//! [`core::ComputeCore`] is the small contract a scheduler drives to
//! evaluate a simulation and commit its pending updates.

pub mod bitvec;
pub mod consts;
pub mod core;
pub mod error;

pub mod prelude {
    //! Convenience re-exports for consumers embedding Cascade's core value
    //! types.

    pub use crate::bitvec::BitVec;
    pub use crate::core::{ComputeCore, Input, State, StubCore, VId};
    pub use crate::error::CodecError;
}
