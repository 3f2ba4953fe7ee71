//! Run-state machine for the execution loop.

use crate::fault::Fault;

/// Execution state observed by the run loop.
///
/// `Halted` is the clean terminal state reached via `HLT`; `Faulted` is the
/// error terminal state. Neither can transition back to `Running` except
/// through an explicit machine reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum RunState {
    /// Ready to execute the next instruction.
    #[default]
    Running,
    /// Clean terminal state; the program halted itself.
    Halted,
    /// Error terminal state; no further progress is possible.
    Faulted(Fault),
}

impl RunState {
    /// Returns the latched fault, if this state is faulted.
    #[must_use]
    pub const fn latched_fault(self) -> Option<Fault> {
        match self {
            Self::Faulted(cause) => Some(cause),
            Self::Running | Self::Halted => None,
        }
    }

    /// Returns `true` when the run loop must stop.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Halted | Self::Faulted(_))
    }
}
