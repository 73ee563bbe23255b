//! # Aggregate Command Implementation
//!
//! This module implements the `aggregate` subcommand, the main entry point of
//! the tool. It wires the library pieces together for one run:
//!
//! 1.  **Configuration**: Load the configuration file and look up the project.
//! 2.  **Workspace**: Allocate a private workspace with `source/` and
//!     `staging/` trees.
//! 3.  **Source**: Clone the requested branch, or copy a local checkout, into
//!     `source/`.
//! 4.  **Aggregate**: Merge the selected versions into `staging/`.
//! 5.  **Package**: Write `staging/` to a zip archive, or move it into an
//!     output directory with `--unpacked`.
//!
//! The workspace is discarded at the end of every run, successful or not.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{ArgGroup, Args};
use log::{info, warn};

use versions_aggregate::category::Category;
use versions_aggregate::config::{self, ProjectConfig};
use versions_aggregate::git::Credentials;
use versions_aggregate::output::OutputConfig;
use versions_aggregate::phases::package::{self, DEFAULT_ARCHIVE_NAME};
use versions_aggregate::phases::{execute_aggregation, AggregationReport};
use versions_aggregate::source::{GitSource, LocalSource, SourceTreeProvider};
use versions_aggregate::workspace::Workspace;

const DEFAULT_BRANCH: &str = "main";
const DEFAULT_UNPACKED_DIR: &str = "Operation";

/// Aggregate a range of version folders into one archive
#[derive(Args, Debug)]
#[command(group(
    ArgGroup::new("origin")
        .required(true)
        .args(["repo_url", "source"])
))]
pub struct AggregateArgs {
    /// Project to aggregate, as named in the configuration file
    #[arg(short, long, value_name = "NAME")]
    pub project: String,

    /// Folder holding the version folders, relative to the source tree root
    #[arg(long, value_name = "PATH", default_value = "Versions")]
    pub versions_path: PathBuf,

    /// Git repository to clone the source tree from
    #[arg(long, value_name = "URL")]
    pub repo_url: Option<String>,

    /// Branch to clone (defaults to main)
    #[arg(short, long, value_name = "BRANCH", requires = "repo_url")]
    pub branch: Option<String>,

    /// Username for HTTPS clones
    #[arg(long, value_name = "USER", requires = "repo_url")]
    pub username: Option<String>,

    /// App password or token for HTTPS clones
    #[arg(
        long,
        value_name = "PASSWORD",
        env = "VERSIONS_AGGREGATE_PASSWORD",
        hide_env_values = true
    )]
    pub password: Option<String>,

    /// Local checkout to use as the source tree (copied, never modified)
    #[arg(long, value_name = "DIR")]
    pub source: Option<PathBuf>,

    /// First version to include; without a range every version is merged
    #[arg(long, value_name = "VERSION", requires = "to")]
    pub from: Option<String>,

    /// Last version to include
    #[arg(long, value_name = "VERSION", requires = "from")]
    pub to: Option<String>,

    /// Archive to write, or directory with --unpacked
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Move the merged tree into the output directory instead of zipping it
    #[arg(long)]
    pub unpacked: bool,

    /// Directory under which per-run workspaces are created
    #[arg(long, value_name = "DIR", env = "VERSIONS_AGGREGATE_WORKSPACE")]
    pub workspace_root: Option<PathBuf>,

    /// Only print errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// What a finished run produced.
#[derive(Debug)]
struct RunOutcome {
    report: AggregationReport,
    output: PathBuf,
    entries: usize,
}

/// Execute the `aggregate` command.
pub fn execute(args: AggregateArgs, config_path: Option<PathBuf>, out: &OutputConfig) -> Result<()> {
    let start_time = Instant::now();

    let config_path = config::locate(config_path);
    if !config_path.exists() {
        bail!("Configuration file not found: {}", config_path.display());
    }
    let config = config::from_file(&config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;
    let project = config.project(&args.project)?;

    let provider = source_provider(&args)?;
    out.status(
        "🔍",
        "[SCAN]",
        format!("Aggregating {} from {}", args.project, provider.describe()),
    );

    let workspace = Workspace::allocate(args.workspace_root.as_deref())?;
    let outcome = run_in_workspace(&args, project, provider.as_ref(), &workspace);

    // The run's own error wins over a cleanup failure
    if let Err(e) = workspace.discard() {
        match &outcome {
            Ok(_) => return Err(e.into()),
            Err(_) => warn!("Failed to discard workspace: {}", e),
        }
    }

    let outcome = outcome?;
    print_summary(out, &outcome, args.unpacked);
    out.status(
        "⏱️",
        "[TIME]",
        format!("Completed in {:.2}s", start_time.elapsed().as_secs_f64()),
    );
    Ok(())
}

fn source_provider(args: &AggregateArgs) -> Result<Box<dyn SourceTreeProvider>> {
    if let Some(root) = &args.source {
        if args.username.is_some() || args.password.is_some() {
            warn!("Ignoring credentials for local source {}", root.display());
        }
        return Ok(Box::new(LocalSource::new(root)));
    }

    let Some(url) = &args.repo_url else {
        bail!("Either --repo-url or --source is required");
    };
    let credentials = match (&args.username, &args.password) {
        (Some(username), Some(password)) => Some(Credentials {
            username: username.clone(),
            password: password.clone(),
        }),
        (Some(username), None) => {
            bail!("--username {} given without a password", username)
        }
        (None, _) => None,
    };
    let branch = args.branch.as_deref().unwrap_or(DEFAULT_BRANCH);

    Ok(Box::new(
        GitSource::new(url.as_str(), branch).with_credentials(credentials),
    ))
}

fn run_in_workspace(
    args: &AggregateArgs,
    project: &ProjectConfig,
    provider: &dyn SourceTreeProvider,
    workspace: &Workspace,
) -> Result<RunOutcome> {
    let versions_root = workspace.versions_root(&args.versions_path)?;

    provider.populate(workspace.source_dir())?;
    if !versions_root.is_dir() {
        bail!(
            "Versions folder '{}' not found in {}",
            args.versions_path.display(),
            provider.describe()
        );
    }

    let report = execute_aggregation(
        project,
        &versions_root,
        workspace.staging_dir(),
        args.from.clone(),
        args.to.clone(),
    )?;

    let (output, entries) = if args.unpacked {
        let dir = output_path(args.output.as_deref(), DEFAULT_UNPACKED_DIR);
        let moved = package::unpack_into(workspace.staging_dir(), &dir)?;
        (dir, moved)
    } else {
        let archive = output_path(args.output.as_deref(), DEFAULT_ARCHIVE_NAME);
        let summary = package::write_zip(workspace.staging_dir(), &archive)?;
        (archive, summary.files)
    };
    info!("Aggregated {} versions into {}", report.versions.len(), output.display());

    Ok(RunOutcome {
        report,
        output,
        entries,
    })
}

fn output_path(requested: Option<&Path>, default_name: &str) -> PathBuf {
    requested
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(default_name))
}

fn print_summary(out: &OutputConfig, outcome: &RunOutcome, unpacked: bool) {
    let report = &outcome.report;
    out.status(
        "✅",
        "[OK]",
        format!("Merged {} versions", report.versions.len()),
    );
    if let (Some(first), Some(last)) = (report.versions.first(), report.versions.last()) {
        out.detail(format!("Range: {} .. {}", first, last));
    }
    for category in Category::KNOWN {
        out.detail(format!("{}: {}", category, report.relocated(category)));
    }
    if !report.unknown_units.is_empty() {
        out.status(
            "⚠️",
            "[WARN]",
            format!("Unmatched database units: {}", report.unknown_units.join(", ")),
        );
    }
    if !report.skipped.is_empty() {
        out.detail(format!("Skipped folders: {}", report.skipped.join(", ")));
    }
    if unpacked {
        out.status(
            "📁",
            "[DIR]",
            format!("{} ({} entries)", outcome.output.display(), outcome.entries),
        );
    } else {
        out.status(
            "📦",
            "[ZIP]",
            format!("{} ({} files)", outcome.output.display(), outcome.entries),
        );
    }
}
