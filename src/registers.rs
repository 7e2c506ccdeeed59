use std::convert::TryFrom;

use crate::error::VmError;
use crate::memory::{Byte, Word};

/// Number of general purpose registers.
pub const NUM_REGISTERS: usize = 8;

/// The general purpose registers, R0 through R7.
///
/// Registers are byte-wide, the same width as a memory cell, so a value
/// loaded from memory round-trips exactly. Arithmetic on register
/// contents wraps modulo 256; see [`alu`](crate::cpu::alu).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RegisterFile {
    regs: [Byte; NUM_REGISTERS],
}

impl RegisterFile {
    /// Returns the value held in register `index`.
    pub fn get(&self, index: usize) -> Result<Byte, VmError> {
        self.regs
            .get(index)
            .copied()
            .ok_or(VmError::InvalidRegister { index })
    }

    /// Stores a value into register `index`.
    ///
    /// The value is accepted as a [`Word`] and rejected with
    /// [`VmError::InvalidValue`] if it is wider than a register.
    pub fn set(&mut self, index: usize, value: Word) -> Result<(), VmError> {
        let reg = self
            .regs
            .get_mut(index)
            .ok_or(VmError::InvalidRegister { index })?;
        *reg = Byte::try_from(value).map_err(|_| VmError::InvalidValue { value })?;
        Ok(())
    }

    /// Copies out the whole file, R0 first.
    pub fn all(&self) -> [Byte; NUM_REGISTERS] {
        self.regs
    }

    /// Zeroes every register.
    pub fn clear(&mut self) {
        self.regs = [0; NUM_REGISTERS];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use color_eyre::eyre::Result;

    #[test]
    fn test_set_get_round_trip() -> Result<()> {
        let mut regs = RegisterFile::default();
        for index in 0..NUM_REGISTERS {
            regs.set(index, index as Word * 3)?;
        }
        for index in 0..NUM_REGISTERS {
            assert_eq!(regs.get(index)?, index as Byte * 3);
        }

        Ok(())
    }

    #[test]
    fn test_invalid_register() {
        let mut regs = RegisterFile::default();
        assert_eq!(
            regs.get(NUM_REGISTERS),
            Err(VmError::InvalidRegister {
                index: NUM_REGISTERS
            })
        );
        assert_eq!(
            regs.set(NUM_REGISTERS, 0),
            Err(VmError::InvalidRegister {
                index: NUM_REGISTERS
            })
        );
    }

    #[test]
    fn test_value_too_wide() {
        let mut regs = RegisterFile::default();
        assert_eq!(regs.set(0, 256), Err(VmError::InvalidValue { value: 256 }));
        // the register is untouched
        assert_eq!(regs.get(0), Ok(0));
    }

    #[test]
    fn test_widest_value_fits() -> Result<()> {
        let mut regs = RegisterFile::default();
        regs.set(7, 255)?;
        assert_eq!(regs.get(7)?, 255);

        Ok(())
    }

    #[test]
    fn test_clear() -> Result<()> {
        let mut regs = RegisterFile::default();
        regs.set(3, 42)?;
        regs.clear();
        assert_eq!(regs, RegisterFile::default());

        Ok(())
    }
}
