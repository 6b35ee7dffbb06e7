//! The compute-core contract.
//!
//! A compute-core is a bag of named [`BitVec`]-valued input slots plus a
//! private state, driven by a scheduler (out of scope) through a small,
//! uniform operation set. [`StubCore`] is the degenerate implementation
//! that satisfies the contract without doing any work -- it lets a
//! scheduler compose uniformly before a real, generated core exists.

mod stub;

pub use stub::StubCore;

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::bitvec::BitVec;

/// Opaque integer naming an input slot on a core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VId(pub u32);

/// Owned snapshot of a core's internal registers, as returned by
/// [`ComputeCore::get_state`].
///
/// Implementations may stash arbitrary named registers here; the contract
/// doesn't constrain their shape beyond "an owned, comparable object that
/// `set_state` can later restore from."
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct State {
    registers: BTreeMap<String, BitVec>,
}

impl State {
    /// An empty snapshot, equal to what a fresh core reports.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Read a named register, if present.
    pub fn get(&self, name: &str) -> Option<&BitVec> {
        self.registers.get(name)
    }

    /// Set a named register, overwriting any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: BitVec) {
        self.registers.insert(name.into(), value);
    }

    /// True iff no registers are recorded.
    pub fn is_empty(&self) -> bool {
        self.registers.is_empty()
    }
}

/// Owned snapshot of a core's input-slot values, as returned by
/// [`ComputeCore::get_input`] and consumed by [`ComputeCore::set_input`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Input {
    slots: BTreeMap<VId, BitVec>,
}

impl Input {
    /// An empty snapshot, equal to what a fresh core reports.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Read an input slot's last-written value, if any.
    pub fn get(&self, id: VId) -> Option<&BitVec> {
        self.slots.get(&id)
    }

    /// Write an input slot, overwriting any previous value.
    pub fn set(&mut self, id: VId, value: BitVec) {
        self.slots.insert(id, value);
    }

    /// True iff no slots have been written.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// The contract a scheduler drives to evaluate a simulation and commit its
/// pending updates.
///
/// Within one core, `read` calls are applied in caller order and are all
/// visible to the next `evaluate`; `update` commits exactly the
/// non-blocking assignments latched during the most recent `evaluate`
/// A core is a single-threaded
/// cooperative object: callers must not drive the same core from more than
/// one thread concurrently, though distinct cores may run on distinct
/// threads.
pub trait ComputeCore {
    /// Snapshot internal registers as an owned object.
    fn get_state(&self) -> State;

    /// Restore from a snapshot. Implementations may ignore unknown fields.
    fn set_state(&mut self, state: State);

    /// Snapshot input-slot values.
    fn get_input(&self) -> Input;

    /// Replace all input slots.
    fn set_input(&mut self, input: Input);

    /// Write `value` into the input slot named `id`. Does not trigger
    /// evaluation.
    fn read(&mut self, id: VId, value: BitVec);

    /// Run combinational logic to fixpoint. May enqueue pending updates
    /// and/or raise [`Self::had_tasks`].
    fn evaluate(&mut self);

    /// True iff [`Self::update`] would change observable state.
    fn has_updates(&self) -> bool;

    /// Commit pending non-blocking updates. Clears [`Self::has_updates`].
    fn update(&mut self);

    /// True iff the last [`Self::evaluate`] executed a side-effecting
    /// system task (e.g. `$display`).
    fn had_tasks(&self) -> bool;

    /// Identifies the degenerate [`StubCore`] variant so callers can skip
    /// work that cannot possibly change behavior.
    fn is_stub(&self) -> bool;
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;
    use crate::bitvec::BitVec;

    #[test]
    fn state_round_trips_through_json() {
        let mut state = State::empty();
        state.set("pc", BitVec::new(16, 42));
        let json = serde_json::to_string(&state).unwrap();
        let back: State = serde_json::from_str(&json).unwrap();
        assert_eq!(state, back);
    }

    #[test]
    fn input_round_trips_through_json() {
        let mut input = Input::empty();
        input.set(VId(3), BitVec::new(8, 0xAB));
        let json = serde_json::to_string(&input).unwrap();
        let back: Input = serde_json::from_str(&json).unwrap();
        assert_eq!(input, back);
    }
}
