use color_eyre::eyre::Result;

use simple_logger::SimpleLogger;
use vcpu::cpu::{Cpu, StdoutSink};
use vcpu::program;

fn main() -> Result<()> {
    color_eyre::install()?; // rust error handling
    SimpleLogger::new().init().unwrap(); // logging

    let mut cpu = Cpu::new();

    use vcpu::cpu::isa::Opcode::*;
    cpu.load(&program![LDI, 0, 8, PRN, 0, HLT])?;

    cpu.run(&mut StdoutSink)?;

    Ok(())
}
