//! Orchestrator for a complete aggregation run
//!
//! This module coordinates discovery, range selection, classification and
//! merging for one project. A run is an explicit state machine:
//!
//! ```text
//! Idle --run--> Running --ok--> Done
//!                  |
//!                  +--error--> Failed
//! ```
//!
//! `Done` and `Failed` are terminal. A failure can strike after part of the
//! source tree has already been moved, and nothing is rolled back: the
//! destination and source of a failed run must be discarded together.

use std::path::PathBuf;

use log::{debug, info};

use super::discovery::{classify_subfolders, enumerate_versions};
use super::merge::MergeEngine;
use super::range::select_range;
use super::AggregationReport;
use crate::category::Category;
use crate::config::ProjectConfig;
use crate::error::{Error, Result};

/// Lifecycle state of an aggregation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Done,
    Failed,
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// One aggregation of a versions root into a destination tree.
#[derive(Debug)]
pub struct Aggregation<'a> {
    project: &'a ProjectConfig,
    versions_root: PathBuf,
    destination: PathBuf,
    from: Option<String>,
    to: Option<String>,
    state: RunState,
}

impl<'a> Aggregation<'a> {
    /// Aggregate every version under `versions_root` into `destination`.
    pub fn new(
        project: &'a ProjectConfig,
        versions_root: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
    ) -> Self {
        Self {
            project,
            versions_root: versions_root.into(),
            destination: destination.into(),
            from: None,
            to: None,
            state: RunState::Idle,
        }
    }

    /// Restrict the run to the versions from `from` through `to`.
    pub fn with_range(mut self, from: Option<String>, to: Option<String>) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Execute the run. Only an `Idle` aggregation can run.
    pub fn run(&mut self) -> Result<AggregationReport> {
        if self.state != RunState::Idle {
            return Err(Error::RunFinished {
                state: self.state.to_string(),
            });
        }

        self.state = RunState::Running;
        match self.execute() {
            Ok(report) => {
                self.state = RunState::Done;
                Ok(report)
            }
            Err(e) => {
                self.state = RunState::Failed;
                Err(e)
            }
        }
    }

    fn execute(&self) -> Result<AggregationReport> {
        let versions = enumerate_versions(&self.versions_root)?;
        let selected = select_range(&versions, self.from.as_deref(), self.to.as_deref())?;
        info!(
            "Aggregating {} of {} versions from {}",
            selected.len(),
            versions.len(),
            self.versions_root.display()
        );

        let engine = MergeEngine::new(&self.destination, self.project);
        engine.prepare()?;

        let mut report = AggregationReport::default();
        for version in selected {
            info!("Merging version {}", version.name);
            for subfolder in classify_subfolders(version, &self.project.categories)? {
                if subfolder.category == Category::Unknown {
                    debug!("Skipping {}/{}: no matching category", version.name, subfolder.name);
                    report.skipped.push(format!("{}/{}", version.name, subfolder.name));
                    continue;
                }
                engine.merge(&subfolder, &mut report)?;
            }
            report.versions.push(version.name.clone());
        }

        info!(
            "Aggregated {} versions, {} items relocated",
            report.versions.len(),
            report.total_relocated()
        );
        Ok(report)
    }
}

/// Run a complete aggregation in one call.
pub fn execute_aggregation(
    project: &ProjectConfig,
    versions_root: impl Into<PathBuf>,
    destination: impl Into<PathBuf>,
    from: Option<String>,
    to: Option<String>,
) -> Result<AggregationReport> {
    Aggregation::new(project, versions_root, destination)
        .with_range(from, to)
        .run()
}
