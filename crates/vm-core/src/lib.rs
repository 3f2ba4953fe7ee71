//! Core crate for the bytevm byte-oriented virtual machine.

/// Flat byte-addressed memory model.
pub mod memory;
pub use memory::{ImageTooLarge, Memory, MEMORY_SIZE};

/// Architectural machine-state primitives.
pub mod state;
pub use state::{
    Condition, Register, RegisterFile, RunState, GENERAL_REGISTER_COUNT, SP_INITIAL,
};

/// Fault taxonomy for terminal execution errors.
pub mod fault;
pub use fault::Fault;

/// Closed instruction-set enumeration and dispatch presence check.
pub mod opcode;
pub use opcode::Opcode;

/// Output-stream contract consumed by `PRN`.
pub mod output;
pub use output::{CaptureSink, OutputSink, StdoutSink};

/// Machine aggregate owning memory, registers, and run state.
pub mod machine;
pub use machine::Machine;

/// Instruction handlers and the fetch-decode-execute engine.
pub mod execute;
pub use execute::{run_to_completion, step_one, RunOutcome, StepOutcome};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
