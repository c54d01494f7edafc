//! Emulator front-end: loads a ROM image at 0x8000, resets through the
//! reset vector, and runs until the CPU halts. Display traffic from the
//! memory-mapped register at 0xF001 goes to stdout.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use mos6502::{IoMemory, CPU};

/// Run a 6502 ROM image.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Raw ROM image, loaded at $8000 (32 KiB maximum).
    rom: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let data =
        fs::read(&args.rom).with_context(|| format!("failed to read {}", args.rom.display()))?;

    let mut memory = IoMemory::new();
    memory.set_display(|byte| {
        let mut stdout = io::stdout();
        let _ = stdout.write_all(&[byte]);
        let _ = stdout.flush();
    });

    let mut cpu = CPU::new(memory);
    cpu.load_rom(&data)
        .with_context(|| format!("failed to load {}", args.rom.display()))?;

    cpu.reset();
    cpu.run()?;

    Ok(())
}
