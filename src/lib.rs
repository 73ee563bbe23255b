//! # Versions Aggregate Library
//!
//! This library replays per-version "delta" folders from a release
//! repository onto one consolidated tree and packages the result. It backs
//! the `versions-aggregate` command-line tool.
//!
//! ## Quick Example
//!
//! ```no_run
//! use versions_aggregate::config;
//! use versions_aggregate::phases::{execute_aggregation, package};
//!
//! let config = config::from_file("versions-aggregate.yaml")?;
//! let project = config.project("Trading")?;
//!
//! let report = execute_aggregation(
//!     project,
//!     "/tmp/clone/Versions",
//!     "/tmp/merged",
//!     Some("V1.0".to_string()),
//!     Some("V1.3".to_string()),
//! )?;
//! println!("merged {} versions", report.versions.len());
//!
//! package::write_zip("/tmp/merged".as_ref(), "Operation.zip".as_ref())?;
//! # Ok::<(), versions_aggregate::error::Error>(())
//! ```
//!
//! ## Core Concepts
//!
//! - **Configuration (`config`)**: per-project canonical names for the
//!   application, database and report categories, plus database unit names.
//! - **Classification (`category`, `naming`)**: containment matching of raw
//!   folder names against the canonical names, first match wins.
//! - **Phases (`phases`)**: discovery, range selection, merging and
//!   packaging, driven by the orchestrator.
//! - **Sources (`source`, `git`, `workspace`)**: laying down the version
//!   folders in a private per-run workspace.
//!
//! A run moves files out of its source tree. Sources are always staged into
//! a fresh workspace first, and a failed run's workspace is thrown away.

pub mod category;
pub mod config;
pub mod error;
pub mod filesystem;
pub mod git;
pub mod naming;
pub mod output;
pub mod phases;
pub mod source;
pub mod workspace;

#[cfg(test)]
mod range_proptest;
