//! Fault taxonomy for terminal execution errors.

use thiserror::Error;

/// Terminal execution faults.
///
/// A fault latches the faulted run state and stops the loop; side effects
/// of instructions executed before the fault remain committed. Address
/// wraparound is not a fault: all addressing wraps modulo 256 silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Fault {
    /// The fetched byte is not in the instruction set.
    #[error("unknown opcode {opcode:#010b} at address {pc:#04X}")]
    UnknownOpcode {
        /// The unrecognized opcode byte.
        opcode: u8,
        /// Address the byte was fetched from.
        pc: u8,
    },
}

impl Fault {
    /// Program counter value at the time the fault was raised.
    #[must_use]
    pub const fn pc(self) -> u8 {
        match self {
            Self::UnknownOpcode { pc, .. } => pc,
        }
    }
}
