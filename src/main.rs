use std::{
    fs,
    io::{self, Read, Write},
    path::Path,
};

use anyhow::Context;
use clap::Parser;
use owo_colors::OwoColorize;

use crate::{cli::Cli, convert::Converter};

mod cli;
mod convert;
mod extract;
mod html;
mod resolver;
mod source;

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let text = match args.input.as_deref() {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).context("read stdin")?;
            buf
        }
    };

    let converter = Converter::new(resolver::SOURCES);
    let outcome = match args.output {
        Some(path) => {
            let file = fs::File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            let mut out = io::BufWriter::new(file);
            let outcome = converter.convert(&text, &mut out)?;
            out.flush()?;
            outcome
        }
        None => converter.convert(&text, &mut io::stdout().lock())?,
    };

    eprintln!("{} {}   {} {}", "✓".green(), outcome.written, "✗".red(), outcome.skipped);
    Ok(())
}
