//! # Projects Command Implementation
//!
//! Lists the projects defined in the configuration file, one per line, so
//! scripts can iterate over them.

use std::path::PathBuf;

use anyhow::{bail, Result};

use versions_aggregate::config::{self, Config};
use versions_aggregate::output::OutputConfig;

/// Execute the `projects` command.
pub fn execute(config_path: Option<PathBuf>, out: &OutputConfig) -> Result<()> {
    let config_path = config::locate(config_path);
    if !config_path.exists() {
        bail!("Configuration file not found: {}", config_path.display());
    }
    let config = config::from_file(&config_path)?;

    out.status(
        "📋",
        "[LIST]",
        format!("Projects in {}:", config_path.display()),
    );
    for line in project_lines(&config) {
        println!("{}", line);
    }
    Ok(())
}

fn project_lines(config: &Config) -> Vec<String> {
    config
        .projects
        .iter()
        .map(|(name, project)| {
            format!(
                "{}  ({} database units)",
                name,
                project.databases.len()
            )
        })
        .collect()
}
