//! # Validate Command Implementation
//!
//! This module implements the `validate` subcommand, which loads the
//! configuration file and reports whether it is usable without touching any
//! source tree.
//!
//! Loading already runs every check (legacy format conversion, folder name
//! shape, overlapping names), so a successful load means the configuration
//! is valid. On success a per-project summary is printed.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};

use versions_aggregate::config::{self, ProjectConfig, UnknownUnitPolicy};
use versions_aggregate::output::{emoji, OutputConfig};

/// Execute the `validate` command.
pub fn execute(config_path: Option<PathBuf>, out: &OutputConfig) -> Result<()> {
    let config_path = config::locate(config_path);
    println!(
        "{} Validating configuration: {}",
        emoji(out, "🔍", "[SCAN]"),
        config_path.display()
    );
    if !config_path.exists() {
        bail!("Configuration file not found: {}", config_path.display());
    }

    let config = match config::from_file(&config_path) {
        Ok(config) => config,
        Err(e) => {
            println!(
                "{} Configuration is invalid: {}",
                emoji(out, "❌", "[ERR]"),
                e
            );
            return Err(anyhow!("Configuration validation failed: {}", e));
        }
    };

    println!("\n{} Projects:", emoji(out, "📊", "[INFO]"));
    for (name, project) in &config.projects {
        println!("   {}", describe(name, project));
    }

    println!(
        "\n{} Configuration is valid",
        emoji(out, "✅", "[OK]")
    );
    Ok(())
}

fn describe(name: &str, project: &ProjectConfig) -> String {
    let categories = &project.categories;
    let units = if project.databases.is_empty() {
        "none".to_string()
    } else {
        project.databases.join(", ")
    };
    let policy = match project.unknown_database_units {
        UnknownUnitPolicy::Bucket => "bucket",
        UnknownUnitPolicy::Fail => "fail",
    };
    format!(
        "{}: {} / {} / {}; units: {}; unmatched units: {}",
        name, categories.application, categories.database, categories.report, units, policy
    )
}
