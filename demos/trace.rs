use color_eyre::eyre::Result;

use simple_logger::SimpleLogger;
use vcpu::cpu::{Cpu, State, StdoutSink};
use vcpu::memory::Memory;

fn main() -> Result<()> {
    color_eyre::install()?; // rust error handling
    SimpleLogger::new().init().unwrap(); // logging

    let memory = Memory::from_file("demos/programs/add.ls8")?;
    let mut cpu = Cpu::with_memory(memory);

    let mut sink = StdoutSink;
    while cpu.state() == State::Running {
        println!("TRACE: {}", cpu.snapshot());
        cpu.step(&mut sink)?;
    }

    Ok(())
}
