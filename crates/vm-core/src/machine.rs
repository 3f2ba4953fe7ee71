//! Machine aggregate owning memory, registers, and run state.

use crate::memory::{ImageTooLarge, Memory};
use crate::state::{Condition, RegisterFile, RunState};

/// Complete machine state.
///
/// The machine owns its memory exclusively for the VM's lifetime: the
/// loader writes the initial image through [`Machine::load_image`] before
/// execution starts, and all later mutation happens inside instruction
/// handlers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Machine {
    /// Flat 256-byte memory image.
    pub memory: Memory,
    /// General-purpose register file (`R7` holds the stack pointer).
    pub registers: RegisterFile,
    /// Condition state from the most recent `CMP`, absent before the first.
    pub condition: Option<Condition>,
    /// Address of the next instruction byte to fetch.
    pub pc: u8,
    /// Current execution state.
    pub run_state: RunState,
}

impl Machine {
    /// Creates a machine with zeroed memory, `PC` at 0, and `SP` at the top
    /// of memory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes a program image into memory starting at address 0.
    ///
    /// Registers and the program counter are not touched; that is the
    /// loader contract.
    ///
    /// # Errors
    ///
    /// Returns [`ImageTooLarge`] when the image exceeds memory capacity.
    pub fn load_image(&mut self, image: &[u8]) -> Result<(), ImageTooLarge> {
        self.memory.load_image(image)
    }

    /// Restores architectural defaults while preserving the memory image.
    ///
    /// Registers are zeroed, `SP` returns to the top of memory, the
    /// condition state clears, and execution resumes at address 0.
    pub fn reset(&mut self) {
        self.registers = RegisterFile::new();
        self.condition = None;
        self.pc = 0;
        self.run_state = RunState::Running;
    }
}
