use crate::bitvec::BitVec;

use super::{ComputeCore, Input, State, VId};

/// The degenerate compute-core: holds no state, consumes inputs without
/// effect, and never signals updates or tasks.
///
/// Exists so a scheduler can compose uniformly even before a real,
/// generated core is compiled for a given module.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StubCore;

impl StubCore {
    /// Construct a new stub. There is no state to initialize.
    pub fn new() -> Self {
        Self
    }
}

impl ComputeCore for StubCore {
    fn get_state(&self) -> State {
        State::empty()
    }

    fn set_state(&mut self, _state: State) {}

    fn get_input(&self) -> Input {
        Input::empty()
    }

    fn set_input(&mut self, _input: Input) {}

    fn read(&mut self, _id: VId, _value: BitVec) {}

    fn evaluate(&mut self) {
        tracing::trace!("stub core evaluate: no-op");
    }

    fn has_updates(&self) -> bool {
        false
    }

    fn update(&mut self) {
        tracing::trace!("stub core update: no-op");
    }

    fn had_tasks(&self) -> bool {
        false
    }

    fn is_stub(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stub_core_scenario() {
        let mut core = StubCore::new();
        core.read(VId(0), BitVec::new(8, 1));
        core.evaluate();

        assert!(!core.has_updates());
        assert!(!core.had_tasks());
        assert!(core.is_stub());
        assert_eq!(core.get_state(), State::empty());
    }
}
