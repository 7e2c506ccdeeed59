//! The arithmetic logic unit.
//!
//! Arithmetic never touches the register file directly from the dispatch
//! loop; instruction handlers name an [`AluOp`] and the ALU applies it to
//! the register pair. Only addition is wired up so far.

use crate::error::VmError;
use crate::memory::Word;
use crate::registers::RegisterFile;

/// Operations the ALU knows the name of.
///
/// Naming an operation is not the same as supporting it: applying one of
/// the unwired variants yields [`VmError::UnsupportedOperation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AluOp {
    Add,
    Sub,
    Mul,
}

impl std::fmt::Display for AluOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mnemonic = match self {
            AluOp::Add => "ADD",
            AluOp::Sub => "SUB",
            AluOp::Mul => "MUL",
        };
        f.write_str(mnemonic)
    }
}

/// Applies `op` to registers `reg_a` and `reg_b`, storing the result in
/// `reg_a`. Addition wraps on overflow.
pub fn apply(
    registers: &mut RegisterFile,
    op: AluOp,
    reg_a: usize,
    reg_b: usize,
) -> Result<(), VmError> {
    match op {
        AluOp::Add => {
            let result = registers.get(reg_a)?.wrapping_add(registers.get(reg_b)?);
            registers.set(reg_a, Word::from(result))
        }
        AluOp::Sub | AluOp::Mul => Err(VmError::UnsupportedOperation { op }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use color_eyre::eyre::Result;

    #[test]
    fn add_stores_sum_in_first_register() -> Result<()> {
        let mut registers = RegisterFile::default();
        registers.set(0, 42)?;
        registers.set(1, 58)?;

        apply(&mut registers, AluOp::Add, 0, 1)?;

        assert_eq!(registers.get(0)?, 100);
        assert_eq!(registers.get(1)?, 58);
        Ok(())
    }

    #[test]
    fn add_wraps_on_overflow() -> Result<()> {
        let mut registers = RegisterFile::default();
        registers.set(2, 200)?;
        registers.set(3, 100)?;

        apply(&mut registers, AluOp::Add, 2, 3)?;

        assert_eq!(registers.get(2)?, 44);
        Ok(())
    }

    #[test]
    fn add_register_to_itself_doubles_it() -> Result<()> {
        let mut registers = RegisterFile::default();
        registers.set(5, 21)?;

        apply(&mut registers, AluOp::Add, 5, 5)?;

        assert_eq!(registers.get(5)?, 42);
        Ok(())
    }

    #[test]
    fn unwired_operations_are_rejected() {
        let mut registers = RegisterFile::default();

        assert_eq!(
            apply(&mut registers, AluOp::Sub, 0, 1),
            Err(VmError::UnsupportedOperation { op: AluOp::Sub })
        );
        assert_eq!(
            apply(&mut registers, AluOp::Mul, 0, 1),
            Err(VmError::UnsupportedOperation { op: AluOp::Mul })
        );
    }

    #[test]
    fn invalid_register_is_rejected() {
        let mut registers = RegisterFile::default();

        assert_eq!(
            apply(&mut registers, AluOp::Add, 8, 0),
            Err(VmError::InvalidRegister { index: 8 })
        );
    }

    #[test]
    fn mnemonics() {
        assert_eq!(AluOp::Add.to_string(), "ADD");
        assert_eq!(AluOp::Sub.to_string(), "SUB");
        assert_eq!(AluOp::Mul.to_string(), "MUL");
    }
}
