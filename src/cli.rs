//! CLI argument parsing and command dispatch

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;

use crate::commands;
use versions_aggregate::output::{ColorChoice, OutputConfig};

/// Versions Aggregate - Merge per-version release folders into one package
#[derive(Parser, Debug)]
#[command(name = "versions-aggregate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Path to the project configuration file
    #[arg(
        short,
        long,
        global = true,
        value_name = "FILE",
        env = "VERSIONS_AGGREGATE_CONFIG"
    )]
    config: Option<PathBuf>,

    /// Colorize output
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: ColorWhen,

    /// Set log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, global = true, value_name = "LEVEL", default_value = "info")]
    log_level: LevelFilter,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ColorWhen {
    Auto,
    Always,
    Never,
}

impl From<ColorWhen> for ColorChoice {
    fn from(when: ColorWhen) -> Self {
        match when {
            ColorWhen::Auto => ColorChoice::Auto,
            ColorWhen::Always => ColorChoice::Always,
            ColorWhen::Never => ColorChoice::Never,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Aggregate a range of version folders into one archive
    Aggregate(commands::aggregate::AggregateArgs),

    /// List the configured projects
    Projects,

    /// Validate the configuration file
    Validate,

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(self.log_level);
        let color = ColorChoice::from(self.color);

        match self.command {
            Commands::Aggregate(args) => {
                let out = OutputConfig::new(color, args.quiet);
                commands::aggregate::execute(args, self.config, &out)
            }
            Commands::Projects => {
                commands::projects::execute(self.config, &OutputConfig::new(color, false))
            }
            Commands::Validate => {
                commands::validate::execute(self.config, &OutputConfig::new(color, false))
            }
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}

fn init_logging(level: LevelFilter) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level).format_timestamp(None);
    if let Ok(spec) = std::env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    }
    // A second initialisation only happens in tests and is harmless
    let _ = builder.try_init();
}
