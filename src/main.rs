//! # Versions Aggregate CLI
//!
//! This is the binary entry point for the `versions-aggregate` command-line
//! tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Setting up logging.
//! - Executing the selected command and reporting failures.
//!
//! The aggregation logic lives in the `versions_aggregate` library crate; the
//! binary is a thin wrapper around it.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
