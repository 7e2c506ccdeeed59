//! An 8-bit register machine: 256 bytes of memory, eight general purpose
//! registers, and a fetch-decode-execute loop over a small fixed
//! instruction set (LDI, PRN, ADD, HLT).
//!
//! ```
//! use vcpu::cpu::isa::Opcode::*;
//! use vcpu::cpu::Cpu;
//! use vcpu::program;
//!
//! let mut cpu = Cpu::new();
//! cpu.load(&program![LDI, 0, 8, PRN, 0, HLT]).unwrap();
//!
//! let mut emitted: Vec<u8> = Vec::new();
//! cpu.run(&mut emitted).unwrap();
//! assert_eq!(emitted, vec![8]);
//! ```

pub mod cpu;
pub mod error;
pub mod memory;
pub mod registers;
