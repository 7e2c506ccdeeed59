//! The execution engine: fetch, decode, execute.

pub mod alu;
pub mod isa;

use std::convert::TryFrom;

use log::*;

use self::alu::AluOp;
use self::isa::Opcode;
use crate::error::VmError;
use crate::memory::{Address, Byte, Memory, Word};
use crate::registers::{RegisterFile, NUM_REGISTERS};

/// Whether the machine is willing to execute another instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Running,
    Halted,
}

/// Receives the values a running program emits.
pub trait Sink {
    fn emit(&mut self, value: Byte);
}

/// Prints each emitted value on its own line.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl Sink for StdoutSink {
    fn emit(&mut self, value: Byte) {
        println!("{}", value);
    }
}

impl Sink for Vec<Byte> {
    fn emit(&mut self, value: Byte) {
        self.push(value);
    }
}

/// A point-in-time view of the machine.
///
/// The memory window holds the bytes at `pc`, `pc + 1` and `pc + 2`,
/// zero-padded where the window runs past the end of memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub pc: Address,
    pub memory_window: [Byte; 3],
    pub registers: [Byte; NUM_REGISTERS],
}

impl std::fmt::Display for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:02X} | {:02X} {:02X} {:02X} |",
            self.pc, self.memory_window[0], self.memory_window[1], self.memory_window[2]
        )?;
        for value in &self.registers {
            write!(f, " {:02X}", value)?;
        }
        Ok(())
    }
}

/// Emulates a CPU: ties memory, registers and the ALU together into a
/// runnable machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cpu {
    memory: Memory,
    registers: RegisterFile,
    /// Program counter
    pc: Address,
    state: State,
    /// The fault that halted the machine, if one did.
    fault: Option<VmError>,
}

impl Default for Cpu {
    fn default() -> Self {
        Self::with_memory(Memory::default())
    }
}

impl Cpu {
    /// Initializes a new CPU with zeroed memory and registers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Initializes a new CPU around an already populated memory.
    pub fn with_memory(memory: Memory) -> Self {
        Self {
            memory,
            registers: RegisterFile::default(),
            pc: 0,
            state: State::Running,
            fault: None,
        }
    }

    /// Copies a program into memory, starting at address zero.
    pub fn load(&mut self, program: &[Byte]) -> Result<(), VmError> {
        self.memory.load(0, program)
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn pc(&self) -> Address {
        self.pc
    }

    /// The fault that halted the machine, if one did.
    pub fn fault(&self) -> Option<VmError> {
        self.fault
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn registers(&self) -> &RegisterFile {
        &self.registers
    }

    /// Makes the machine willing to run again from address zero.
    ///
    /// Clears the program counter, the registers and any recorded fault.
    /// Memory is left alone, so the loaded program survives.
    pub fn reset(&mut self) {
        self.pc = 0;
        self.state = State::Running;
        self.fault = None;
        self.registers.clear();
    }

    /// Captures the machine state without changing it.
    pub fn snapshot(&self) -> Snapshot {
        let mut memory_window = [0; 3];
        for (offset, slot) in memory_window.iter_mut().enumerate() {
            if let Ok(byte) = self.memory.read(self.pc + offset) {
                *slot = byte;
            }
        }

        Snapshot {
            pc: self.pc,
            memory_window,
            registers: self.registers.all(),
        }
    }

    /// Executes a single instruction.
    ///
    /// Fetches the byte at the program counter, decodes its fields, fetches
    /// the operand bytes and dispatches. On a halted machine this is a
    /// no-op. A byte that names no known operation records a fault and
    /// halts the machine instead of returning an error; the fault stays
    /// inspectable through [`Cpu::fault`] until the next [`Cpu::reset`].
    pub fn step(&mut self, sink: &mut dyn Sink) -> Result<State, VmError> {
        if self.state == State::Halted {
            return Ok(State::Halted);
        }

        let byte = self.memory.read(self.pc)?;
        let decoded = isa::decode(byte);

        let mut operands = [0; isa::MAX_OPERANDS];
        for (offset, operand) in operands.iter_mut().take(decoded.operand_count).enumerate() {
            *operand = self.memory.read(self.pc + 1 + offset)?;
        }

        match Opcode::try_from(byte) {
            Ok(opcode) => {
                self.execute(opcode, operands, sink)?;

                if !decoded.sets_pc {
                    self.pc += 1 + decoded.operand_count;
                }
            }
            Err(_) => {
                let fault = VmError::UnrecognizedInstruction {
                    opcode: byte,
                    pc: self.pc,
                };
                error!("{}", fault);

                self.fault = Some(fault);
                self.state = State::Halted;
            }
        }

        Ok(self.state)
    }

    /// Runs instructions until the machine halts.
    pub fn run(&mut self, sink: &mut dyn Sink) -> Result<(), VmError> {
        while self.step(sink)? == State::Running {}

        info!("Program halted at pc {:#04x}", self.pc);
        Ok(())
    }

    fn execute(
        &mut self,
        opcode: Opcode,
        operands: [Byte; isa::MAX_OPERANDS],
        sink: &mut dyn Sink,
    ) -> Result<(), VmError> {
        match opcode {
            Opcode::LDI => self.ldi(operands[0], operands[1]),
            Opcode::PRN => self.prn(operands[0], sink),
            Opcode::ADD => self.add(operands[0], operands[1]),
            Opcode::HLT => self.hlt(),
        }
    }

    fn ldi(&mut self, register: Byte, value: Byte) -> Result<(), VmError> {
        self.registers.set(usize::from(register), Word::from(value))?;

        debug!("LDI r{}: {}", register, value);
        Ok(())
    }

    fn prn(&mut self, register: Byte, sink: &mut dyn Sink) -> Result<(), VmError> {
        let value = self.registers.get(usize::from(register))?;
        sink.emit(value);

        debug!("PRN r{}: {}", register, value);
        Ok(())
    }

    fn add(&mut self, reg_a: Byte, reg_b: Byte) -> Result<(), VmError> {
        let (reg_a, reg_b) = (usize::from(reg_a), usize::from(reg_b));
        alu::apply(&mut self.registers, AluOp::Add, reg_a, reg_b)?;
        let result = self.registers.get(reg_a)?;

        debug!("ADD r{} r{}: {}", reg_a, reg_b, result);
        Ok(())
    }

    fn hlt(&mut self) -> Result<(), VmError> {
        self.state = State::Halted;

        debug!("HLT");
        Ok(())
    }
}
