//! skillmap CLI: extract skill records from assessment-report page dumps.
//!
//! Reads a page dump, extracts every item-level skill with its domain,
//! subdomain and mastery status, and attaches a reference age to each.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
