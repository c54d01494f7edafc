//! Assembler front-end: assembly source in, raw ROM image out.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use mos6502::Assembler;

/// Assemble 6502 source into a raw ROM image.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Assembly source file.
    input: PathBuf,

    /// Output ROM path. Defaults to the input name with a `.rom` extension.
    #[arg(short = 'o', long)]
    out: Option<PathBuf>,

    /// ROM start address (accepts `$hex`, `0xhex`, or decimal).
    #[arg(long, value_parser = parse_address, default_value = "$8000")]
    start: u16,

    /// ROM size in bytes.
    #[arg(long, default_value_t = 32768)]
    size: usize,

    /// Print per-item emission details.
    #[arg(short, long)]
    verbose: bool,
}

fn parse_address(text: &str) -> Result<u16, String> {
    let parsed = if let Some(hex) = text.strip_prefix('$') {
        u16::from_str_radix(hex, 16)
    } else if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        u16::from_str_radix(hex, 16)
    } else {
        text.parse::<u16>()
    };
    parsed.map_err(|_| format!("'{text}' is not a 16-bit address"))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let out = args
        .out
        .unwrap_or_else(|| args.input.with_extension("rom"));

    if args.verbose {
        println!(
            "assembling {} -> {} (start ${:04X}, {} bytes)",
            args.input.display(),
            out.display(),
            args.start,
            args.size
        );
    }

    let source = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;

    let mut assembler = Assembler::new();
    assembler.set_verbose(args.verbose);
    assembler
        .assemble(&source)
        .with_context(|| format!("failed to assemble {}", args.input.display()))?;

    let rom = assembler.rom_image(args.start, args.size);
    fs::write(&out, &rom).with_context(|| format!("failed to write {}", out.display()))?;

    if args.verbose {
        println!("wrote {} bytes to {}", rom.len(), out.display());
    }

    Ok(())
}
