use color_eyre::eyre::Result;

use simple_logger::SimpleLogger;
use vcpu::cpu::{Cpu, StdoutSink};
use vcpu::memory::Memory;

fn main() -> Result<()> {
    color_eyre::install()?; // rust error handling
    SimpleLogger::new().init().unwrap(); // logging

    let memory = Memory::from_file("demos/programs/print8.ls8")?;
    let mut cpu = Cpu::with_memory(memory);

    cpu.run(&mut StdoutSink)?;

    Ok(())
}
