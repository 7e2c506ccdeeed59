//! Instruction encoding: the opcode table and the bit-field decoder.
//!
//! An instruction byte carries its own layout:
//!
//! ```text
//! 7 6 5 4 3 2 1 0
//! c c i p i i i i
//! ```
//!
//! Bits 7-6 (`c`) count the operand bytes that follow, bit 4 (`p`) marks
//! instructions that take over the program counter themselves, and the
//! remaining bits (`i`) identify the operation.

use num_enum::IntoPrimitive;
use num_enum::TryFromPrimitive;

use crate::memory::Byte;

/// Bits 7-6 of an instruction byte: how many operand bytes follow.
const OPERAND_COUNT_SHIFT: u32 = 6;
/// Bit 4 of an instruction byte: the handler moves the program counter itself.
const SETS_PC_MASK: Byte = 0b0001_0000;
/// Bits 5 and 3-0 of an instruction byte: the operation's identifying bits.
const OPCODE_MASK: Byte = 0b0010_1111;

/// Largest value the two-bit operand count field can hold.
pub const MAX_OPERANDS: usize = 0b11;

macro_rules! opcodes {
    ( $( $( #[doc = $doc:expr] )+ $name:ident = $repr:literal , )+ ) => {
        /// The instruction table.
        ///
        /// Each discriminant is the full instruction byte, so converting a
        /// fetched byte doubles as the "do we know this instruction" check.
        #[repr(u8)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
        #[derive(TryFromPrimitive, IntoPrimitive)]
        pub enum Opcode {
            $(
                $( #[doc = $doc] )+
                $name = $repr,
            )+
        }

        impl Opcode {
            /// Every opcode the machine understands.
            pub const ALL: &'static [Self] = &[
                $( Self::$name , )+
            ];

            /// Returns the mnemonic of the opcode.
            pub fn name(&self) -> &'static str {
                match self {
                    $( Self::$name => stringify!($name) , )+
                }
            }
        }

        impl ::std::fmt::Display for Opcode {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

opcodes! {
    /// Load an immediate value into a register.
    /// Operands: register index, value.
    LDI = 0b1000_0010,
    /// Hand a register's value to the output sink.
    /// Operands: register index.
    PRN = 0b0100_0111,
    /// Add one register into another through the ALU, wrapping on overflow.
    /// Operands: destination register index, source register index.
    ADD = 0b1010_0000,
    /// Stop the fetch-decode-execute loop.
    HLT = 0b0000_0001,
}

/// The fields packed into a single instruction byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoded {
    /// The operation's identifying bits (bits 5 and 3-0).
    pub opcode: Byte,
    /// Number of operand bytes following the instruction (bits 7-6).
    pub operand_count: usize,
    /// Whether the handler moves the program counter itself (bit 4).
    pub sets_pc: bool,
}

/// Splits an instruction byte into its fields.
///
/// Decoding is total: any byte decodes, including bytes that name no known
/// operation. Whether the machine can actually execute the byte is decided
/// at dispatch time.
pub fn decode(byte: Byte) -> Decoded {
    Decoded {
        opcode: byte & OPCODE_MASK,
        operand_count: usize::from(byte >> OPERAND_COUNT_SHIFT),
        sets_pc: byte & SETS_PC_MASK != 0,
    }
}
