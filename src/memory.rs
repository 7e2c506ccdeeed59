use std::convert::TryFrom;

use crate::error::VmError;

pub mod parse;

pub type Byte = u8; // 1 byte, the width of a cell and a register
pub type Word = u16; // 2 bytes, the ingress width for range-checked writes

/// Index into memory.
pub type Address = usize;

/// Number of cells in memory.
pub const MEMORY_SIZE: usize = 256;

/// The machine's only store, holding both instructions and data.
///
/// Allocated once, zero-filled, never resized. All access goes through
/// [`read`](Memory::read) and [`write`](Memory::write) so that every
/// address is checked against [`MEMORY_SIZE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Memory {
    data: [Byte; MEMORY_SIZE],
}

impl Default for Memory {
    /// Initializes zeroed memory
    fn default() -> Self {
        Memory {
            data: [0; MEMORY_SIZE],
        }
    }
}

impl Memory {
    /// Reads the byte stored at `address`.
    pub fn read(&self, address: Address) -> Result<Byte, VmError> {
        self.data
            .get(address)
            .copied()
            .ok_or(VmError::OutOfBounds { address })
    }

    /// Writes a value to `address`.
    ///
    /// The value is accepted as a [`Word`] and rejected with
    /// [`VmError::InvalidValue`] if it does not fit in a cell.
    pub fn write(&mut self, address: Address, value: Word) -> Result<(), VmError> {
        let cell = self
            .data
            .get_mut(address)
            .ok_or(VmError::OutOfBounds { address })?;
        *cell = Byte::try_from(value).map_err(|_| VmError::InvalidValue { value })?;
        Ok(())
    }

    /// Writes a whole image of bytes starting at `start`.
    ///
    /// Fails with [`VmError::OutOfBounds`] if the image would run past
    /// the end of memory; nothing is written in that case.
    pub fn load(&mut self, start: Address, data: &[Byte]) -> Result<(), VmError> {
        let end = start
            .checked_add(data.len())
            .filter(|end| *end <= MEMORY_SIZE)
            .ok_or(VmError::OutOfBounds {
                address: start.saturating_add(data.len()).saturating_sub(1),
            })?;
        self.data[start..end].copy_from_slice(data);
        Ok(())
    }
}

/// Builds a program image from opcode and operand bytes.
///
/// Every expression is cast to a [`Byte`](crate::memory::Byte), so opcodes
/// can be written by name:
///
/// ```
/// use vcpu::cpu::isa::Opcode::*;
/// use vcpu::program;
///
/// let image = program![LDI, 0, 8, PRN, 0, HLT];
/// assert_eq!(image.len(), 6);
/// ```
#[macro_export]
macro_rules! program {
    ( $( $byte:expr ),+ $(,)? ) => {
        [
            $(
                $byte as $crate::memory::Byte,
            )+
        ]
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::isa::Opcode;
    use color_eyre::eyre::Result;

    #[test]
    fn test_read() -> Result<()> {
        let mut mem = Memory::default();
        mem.write(0x2, 0x12)?;
        assert_eq!(mem.read(0x2)?, 0x12);

        Ok(())
    }

    #[test]
    fn test_default_is_zero_filled() -> Result<()> {
        let mem = Memory::default();
        for address in 0..MEMORY_SIZE {
            assert_eq!(mem.read(address)?, 0);
        }

        Ok(())
    }

    #[test]
    fn test_read_out_of_bounds() {
        let mem = Memory::default();
        assert_eq!(
            mem.read(MEMORY_SIZE),
            Err(VmError::OutOfBounds {
                address: MEMORY_SIZE
            })
        );
    }

    #[test]
    fn test_write_out_of_bounds() {
        let mut mem = Memory::default();
        assert_eq!(
            mem.write(0x1_0000, 1),
            Err(VmError::OutOfBounds { address: 0x1_0000 })
        );
    }

    #[test]
    fn test_write_too_wide() {
        let mut mem = Memory::default();
        assert_eq!(
            mem.write(0, 0x100),
            Err(VmError::InvalidValue { value: 0x100 })
        );
        // the cell is untouched
        assert_eq!(mem.read(0), Ok(0));
    }

    #[test]
    fn test_load() -> Result<()> {
        let mut mem = Memory::default();
        mem.load(0, &[0x12, 0x34, 0x56])?;
        assert_eq!(mem.read(0)?, 0x12);
        assert_eq!(mem.read(1)?, 0x34);
        assert_eq!(mem.read(2)?, 0x56);

        Ok(())
    }

    #[test]
    fn test_load_up_to_the_last_cell() -> Result<()> {
        let mut mem = Memory::default();
        mem.load(MEMORY_SIZE - 2, &[0xAA, 0xBB])?;
        assert_eq!(mem.read(MEMORY_SIZE - 1)?, 0xBB);

        Ok(())
    }

    #[test]
    fn test_load_past_the_end() {
        let mut mem = Memory::default();
        let image = [0; MEMORY_SIZE + 1];
        assert_eq!(
            mem.load(0, &image),
            Err(VmError::OutOfBounds {
                address: MEMORY_SIZE
            })
        );

        let mut mem = Memory::default();
        assert_eq!(
            mem.load(MEMORY_SIZE - 1, &[1, 2]),
            Err(VmError::OutOfBounds {
                address: MEMORY_SIZE
            })
        );
        // nothing was written
        assert_eq!(mem, Memory::default());
    }

    #[test]
    fn test_program_macro() {
        let image = program![Opcode::LDI, 0, 8, Opcode::PRN, 0, Opcode::HLT];
        assert_eq!(
            image,
            [0b1000_0010, 0, 0b0000_1000, 0b0100_0111, 0, 0b0000_0001]
        );
    }
}
