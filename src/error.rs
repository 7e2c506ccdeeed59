use thiserror::Error;

use crate::cpu::alu::AluOp;
use crate::memory::{Address, Byte, Word};

/// Errors raised while executing or poking at the machine.
///
/// Every kind except [`UnrecognizedInstruction`](VmError::UnrecognizedInstruction)
/// aborts a run and propagates out of [`Cpu::run`](crate::cpu::Cpu::run).
/// An unrecognized instruction is a fault in the *program*, not the
/// engine; the loop catches it, records it and halts cleanly.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum VmError {
    /// Address outside the 256-byte memory.
    #[error("address {address:#x} is outside memory")]
    OutOfBounds { address: Address },

    /// Register index outside the register file.
    #[error("register r{index} does not exist")]
    InvalidRegister { index: usize },

    /// Value too wide for a memory cell or a register.
    #[error("value {value:#x} does not fit in a byte")]
    InvalidValue { value: Word },

    /// The ALU was handed an operation tag it has no handler for.
    #[error("unsupported ALU operation {op}")]
    UnsupportedOperation { op: AluOp },

    /// An instruction byte with no entry in the dispatch table.
    #[error("unrecognized instruction {opcode:#010b} at {pc:#04x}")]
    UnrecognizedInstruction { opcode: Byte, pc: Address },
}
