//! # Error Handling
//!
//! This module defines the centralized error type for the `versions-aggregate`
//! library. It uses the `thiserror` library to create an `Error` enum that
//! covers every failure mode of an aggregation run, with descriptive messages.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum. Domain variants describe range selection and
//!   database unit resolution failures; ambient variants cover configuration,
//!   git, filesystem and archive problems.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! Every error is fatal for the run that raised it. Nothing is retried
//! internally, and a run that failed midway has already moved part of its
//! source tree, so callers discard the whole workspace.

use std::path::PathBuf;

use thiserror::Error;

/// Which end of a version range a boundary name refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    From,
    To,
}

impl std::fmt::Display for Boundary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Boundary::From => write!(f, "start"),
            Boundary::To => write!(f, "end"),
        }
    }
}

/// Main error type for versions-aggregate operations
#[derive(Error, Debug)]
pub enum Error {
    /// A requested boundary version does not exist among the enumerated
    /// version folders.
    #[error("Version range error: {boundary} version '{name}' not found")]
    RangeNotFound { boundary: Boundary, name: String },

    /// The end boundary precedes the start boundary.
    #[error("Version range error: end version '{to}' comes before start version '{from}'")]
    InvalidRange { from: String, to: String },

    /// A database unit folder matched no configured unit while the project
    /// forbids `(Unknown)` buckets.
    #[error("Unresolved database unit: '{folder}' matches none of [{}]", candidates.join(", "))]
    UnresolvedDatabaseUnit {
        folder: String,
        candidates: Vec<String>,
    },

    /// A move, delete, create or listing on the host filesystem failed.
    #[error("Filesystem error: failed to {operation} '{}': {source}", path.display())]
    FileSystem {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The versions path would point outside the source tree.
    #[error("Invalid versions path '{}': must be relative and stay inside the source tree", path.display())]
    InvalidVersionsPath { path: PathBuf },

    /// The workspace would be created inside the local checkout it copies.
    #[error("Workspace '{}' lies inside the source checkout '{}'", workspace.display(), checkout.display())]
    WorkspaceInsideSource { workspace: PathBuf, checkout: PathBuf },

    /// An error occurred while parsing or validating the configuration file.
    ///
    /// This error includes the specific issue and optionally a hint about how
    /// to fix it.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// The requested project has no entry in the configuration.
    #[error("Project '{project}' is not configured (available: {})", available.join(", "))]
    ProjectNotFound {
        project: String,
        available: Vec<String>,
    },

    /// An error occurred while cloning a Git repository.
    ///
    /// Includes the repository URL (credentials redacted), the branch, the
    /// error message, and an optional hint for resolution.
    #[error("Git clone error for {url}@{r#ref}: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    GitClone {
        url: String,
        r#ref: String,
        message: String,
        /// Optional hint for how to resolve the clone issue
        hint: Option<String>,
    },

    /// Writing the output archive failed.
    #[error("Archive error for '{}': {message}", path.display())]
    Archive { path: PathBuf, message: String },

    /// `run` was called on an aggregation that already reached a terminal
    /// state.
    #[error("Aggregation run already finished in state {state}")]
    RunFinished { state: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A URL parsing error, wrapped from `url::ParseError`.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Builds a `FileSystem` error for `operation` on `path`.
    pub fn fs(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::FileSystem {
            operation,
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_range_not_found() {
        let error = Error::RangeNotFound {
            boundary: Boundary::From,
            name: "V9.9".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("start version 'V9.9' not found"));
    }

    #[test]
    fn test_error_display_range_not_found_end() {
        let error = Error::RangeNotFound {
            boundary: Boundary::To,
            name: "V2.0".to_string(),
        };
        assert!(error.to_string().contains("end version 'V2.0'"));
    }

    #[test]
    fn test_error_display_invalid_range() {
        let error = Error::InvalidRange {
            from: "V1.2".to_string(),
            to: "V1.0".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("'V1.0' comes before start version 'V1.2'"));
    }

    #[test]
    fn test_error_display_unresolved_unit() {
        let error = Error::UnresolvedDatabaseUnit {
            folder: "Orders-Mystery".to_string(),
            candidates: vec!["Counterparty".to_string(), "Ledger".to_string()],
        };
        let display = format!("{}", error);
        assert!(display.contains("Orders-Mystery"));
        assert!(display.contains("[Counterparty, Ledger]"));
    }

    #[test]
    fn test_error_display_filesystem() {
        let error = Error::fs(
            "move",
            "/tmp/src/App1",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let display = format!("{}", error);
        assert!(display.contains("failed to move '/tmp/src/App1'"));
        assert!(display.contains("denied"));
    }

    #[test]
    fn test_error_display_invalid_versions_path() {
        let error = Error::InvalidVersionsPath {
            path: PathBuf::from("../elsewhere"),
        };
        assert!(error.to_string().contains("'../elsewhere'"));
    }

    #[test]
    fn test_error_display_workspace_inside_source() {
        let error = Error::WorkspaceInsideSource {
            workspace: PathBuf::from("/srv/checkout/tmp/run"),
            checkout: PathBuf::from("/srv/checkout"),
        };
        assert!(error
            .to_string()
            .contains("'/srv/checkout/tmp/run' lies inside the source checkout '/srv/checkout'"));
    }

    #[test]
    fn test_error_display_config_parse_with_hint() {
        let error = Error::ConfigParse {
            message: "overlapping category names".to_string(),
            hint: Some("rename 'Report' or 'Reports'".to_string()),
        };
        let display = format!("{}", error);
        assert!(display.contains("Configuration parsing error"));
        assert!(display.contains("hint:"));
        assert!(display.contains("rename 'Report'"));
    }

    #[test]
    fn test_error_display_config_parse_without_hint() {
        let error = Error::ConfigParse {
            message: "Invalid YAML".to_string(),
            hint: None,
        };
        assert!(!error.to_string().contains("hint:"));
    }

    #[test]
    fn test_error_display_project_not_found() {
        let error = Error::ProjectNotFound {
            project: "Billing".to_string(),
            available: vec!["Trading".to_string(), "Risk".to_string()],
        };
        let display = format!("{}", error);
        assert!(display.contains("'Billing'"));
        assert!(display.contains("Trading, Risk"));
    }

    #[test]
    fn test_error_display_git_clone_with_hint() {
        let error = Error::GitClone {
            url: "https://github.com/test/repo.git".to_string(),
            r#ref: "main".to_string(),
            message: "Authentication failed".to_string(),
            hint: Some("Check the app password".to_string()),
        };
        let display = format!("{}", error);
        assert!(display.contains("Git clone error"));
        assert!(display.contains("https://github.com/test/repo.git@main"));
        assert!(display.contains("Check the app password"));
    }

    #[test]
    fn test_error_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let error: Error = io_error.into();
        let display = format!("{}", error);
        assert!(display.contains("I/O error"));
        assert!(display.contains("File not found"));
    }

    #[test]
    fn test_error_from_yaml_error() {
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>("invalid: [unclosed").unwrap_err();
        let error: Error = yaml_error.into();
        assert!(error.to_string().contains("YAML parsing error"));
    }

    #[test]
    fn test_error_run_finished() {
        let error = Error::RunFinished {
            state: "Failed".to_string(),
        };
        assert!(error.to_string().contains("already finished in state Failed"));
    }
}
