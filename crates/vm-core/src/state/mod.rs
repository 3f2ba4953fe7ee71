//! Architectural machine-state primitives.

/// Condition state set by `CMP` and consumed by conditional jumps.
pub mod flags;
/// Register file and typed register identifiers.
pub mod registers;
/// Run-state machine for the execution loop.
pub mod run_state;

pub use flags::Condition;
pub use registers::{Register, RegisterFile, GENERAL_REGISTER_COUNT, SP_INITIAL};
pub use run_state::RunState;
