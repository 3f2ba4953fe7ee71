//! Closed instruction-set enumeration and dispatch presence check.

/// Instruction opcodes, with the wire byte values as discriminants.
///
/// The top two bits of each byte encode the operand count on the wire, but
/// that field is informational only: each handler's declared length (see
/// [`Opcode::operand_count`]) is authoritative for advancing the program
/// counter. The two are cross-checked for every opcode in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    /// Halt execution cleanly.
    Hlt = 0b0000_0001,
    /// Return from a subroutine to the address on the stack.
    Ret = 0b0001_0001,
    /// Push a register value onto the stack.
    Push = 0b0100_0101,
    /// Pop the top of stack into a register.
    Pop = 0b0100_0110,
    /// Emit a register value as a decimal line on the output stream.
    Prn = 0b0100_0111,
    /// Call the subroutine whose address is in a register.
    Call = 0b0101_0000,
    /// Unconditional jump to the address in a register.
    Jmp = 0b0101_0100,
    /// Jump when the condition state is `Equal`.
    Jeq = 0b0101_0101,
    /// Jump when the condition state is not `Equal`.
    Jne = 0b0101_0110,
    /// Load an immediate value into a register.
    Ldi = 0b1000_0010,
    /// Wrapping addition of two registers into the first.
    Add = 0b1010_0000,
    /// Wrapping subtraction of two registers into the first.
    Sub = 0b1010_0001,
    /// Wrapping multiplication of two registers into the first.
    Mul = 0b1010_0010,
    /// Compare two registers and set the condition state.
    Cmp = 0b1010_0111,
}

impl Opcode {
    /// Every opcode in the instruction set, in ascending byte order.
    pub const ALL: [Self; 14] = [
        Self::Hlt,
        Self::Ret,
        Self::Push,
        Self::Pop,
        Self::Prn,
        Self::Call,
        Self::Jmp,
        Self::Jeq,
        Self::Jne,
        Self::Ldi,
        Self::Add,
        Self::Sub,
        Self::Mul,
        Self::Cmp,
    ];

    /// Returns the wire byte for this opcode.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Dispatch presence check: resolves a fetched byte to an opcode.
    ///
    /// `None` means the byte is not in the instruction set; the machine
    /// must fault before any handler is invoked.
    #[must_use]
    pub const fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            0b0000_0001 => Some(Self::Hlt),
            0b0001_0001 => Some(Self::Ret),
            0b0100_0101 => Some(Self::Push),
            0b0100_0110 => Some(Self::Pop),
            0b0100_0111 => Some(Self::Prn),
            0b0101_0000 => Some(Self::Call),
            0b0101_0100 => Some(Self::Jmp),
            0b0101_0101 => Some(Self::Jeq),
            0b0101_0110 => Some(Self::Jne),
            0b1000_0010 => Some(Self::Ldi),
            0b1010_0000 => Some(Self::Add),
            0b1010_0001 => Some(Self::Sub),
            0b1010_0010 => Some(Self::Mul),
            0b1010_0111 => Some(Self::Cmp),
            _ => None,
        }
    }

    /// Assembly mnemonic for this opcode.
    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Hlt => "HLT",
            Self::Ret => "RET",
            Self::Push => "PUSH",
            Self::Pop => "POP",
            Self::Prn => "PRN",
            Self::Call => "CALL",
            Self::Jmp => "JMP",
            Self::Jeq => "JEQ",
            Self::Jne => "JNE",
            Self::Ldi => "LDI",
            Self::Add => "ADD",
            Self::Sub => "SUB",
            Self::Mul => "MUL",
            Self::Cmp => "CMP",
        }
    }

    /// Declared operand count; authoritative for program-counter advance.
    #[must_use]
    pub const fn operand_count(self) -> u8 {
        match self {
            Self::Hlt | Self::Ret => 0,
            Self::Push | Self::Pop | Self::Prn | Self::Call | Self::Jmp | Self::Jeq
            | Self::Jne => 1,
            Self::Ldi | Self::Add | Self::Sub | Self::Mul | Self::Cmp => 2,
        }
    }

    /// Total encoded instruction width in bytes (opcode plus operands).
    #[must_use]
    pub const fn width(self) -> u8 {
        1 + self.operand_count()
    }

    /// Operand count as encoded in the top two bits of a raw opcode byte.
    ///
    /// Informational wire field; never used to advance the program counter.
    #[must_use]
    pub const fn encoded_operand_count(byte: u8) -> u8 {
        byte >> 6
    }
}
