use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

/// Assembler for the Timble 32-bit instruction set.
///
/// Reads one assembly source file and prints the machine code to standard
/// output as 8-digit hex words, one per line.
#[derive(Parser, Debug)]
#[clap(name = "timble", version, about)]
struct AppArgs {
    /// The assembly source file to translate.
    input: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = AppArgs::parse();

    let source = fs::read_to_string(&args.input)
        .with_context(|| format!("cannot read {}", args.input.display()))?;
    let hex = timble::assemble(&source)
        .with_context(|| format!("cannot assemble {}", args.input.display()))?;

    println!("{hex}");
    Ok(())
}
