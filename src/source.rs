//! # Source Tree Providers
//!
//! An aggregation run consumes a source tree: a directory that contains the
//! versions path, whose children are the version folders. This module
//! defines how such a tree gets into a run's workspace.
//!
//! ## Design
//!
//! - **`SourceTreeProvider`**: populates a target directory with the source
//!   tree. The aggregation never fetches anything itself.
//! - **`GitSource`**: clones one branch of a remote repository, optionally
//!   with username/app-password credentials. The actual clone goes through
//!   the `GitOperations` trait so tests can substitute it.
//! - **`LocalSource`**: stages a copy of a local checkout. The merge moves
//!   files out of the source tree, so the user's checkout must never be
//!   handed to it directly.

use std::path::{Path, PathBuf};

use log::info;

use crate::error::{Error, Result};
use crate::filesystem;
use crate::git::{self, Credentials};

/// Something that can lay down a source tree in a directory.
pub trait SourceTreeProvider {
    /// Human readable origin, safe to log (no credentials).
    fn describe(&self) -> String;

    /// Populate `target` with the source tree. `target` is replaced.
    fn populate(&self, target: &Path) -> Result<()>;
}

/// Trait for git operations - allows mocking in tests
pub trait GitOperations: Send + Sync {
    /// Clones a single branch into `target_dir`.
    fn clone_branch(
        &self,
        url: &str,
        branch: &str,
        credentials: Option<&Credentials>,
        target_dir: &Path,
    ) -> Result<()>;
}

/// The default implementation of `GitOperations`, which uses the system's
/// `git` command.
pub struct DefaultGitOperations;

impl GitOperations for DefaultGitOperations {
    fn clone_branch(
        &self,
        url: &str,
        branch: &str,
        credentials: Option<&Credentials>,
        target_dir: &Path,
    ) -> Result<()> {
        git::clone_branch(url, branch, credentials, target_dir)
    }
}

/// A branch of a remote repository.
pub struct GitSource {
    url: String,
    branch: String,
    credentials: Option<Credentials>,
    git_ops: Box<dyn GitOperations>,
}

impl GitSource {
    pub fn new(url: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            branch: branch.into(),
            credentials: None,
            git_ops: Box::new(DefaultGitOperations),
        }
    }

    pub fn with_credentials(mut self, credentials: Option<Credentials>) -> Self {
        self.credentials = credentials;
        self
    }

    /// Substitute the git implementation.
    pub fn with_operations(mut self, git_ops: Box<dyn GitOperations>) -> Self {
        self.git_ops = git_ops;
        self
    }
}

impl SourceTreeProvider for GitSource {
    fn describe(&self) -> String {
        format!("{}@{}", git::redact(&self.url), self.branch)
    }

    fn populate(&self, target: &Path) -> Result<()> {
        self.git_ops
            .clone_branch(&self.url, &self.branch, self.credentials.as_ref(), target)
    }
}

/// A local checkout, staged by copy.
pub struct LocalSource {
    root: PathBuf,
}

impl LocalSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl SourceTreeProvider for LocalSource {
    fn describe(&self) -> String {
        self.root.display().to_string()
    }

    fn populate(&self, target: &Path) -> Result<()> {
        if !self.root.is_dir() {
            return Err(Error::fs(
                "read source directory",
                &self.root,
                std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
            ));
        }
        let checkout = self
            .root
            .canonicalize()
            .map_err(|e| Error::fs("resolve source directory", &self.root, e))?;
        let workspace = resolve_lexically(target)?;
        if workspace.starts_with(&checkout) {
            return Err(Error::WorkspaceInsideSource {
                workspace,
                checkout,
            });
        }
        filesystem::recreate_dir(target)?;
        let copied = filesystem::copy_tree(&self.root, target)?;
        info!("Staged {} files from {}", copied, self.root.display());
        Ok(())
    }
}

/// Canonicalizes the deepest existing ancestor of `path` and re-appends the
/// components that do not exist yet.
fn resolve_lexically(path: &Path) -> Result<PathBuf> {
    let mut missing = Vec::new();
    let mut existing = path;
    while !existing.exists() {
        match (existing.file_name(), existing.parent()) {
            (Some(name), Some(parent)) => {
                missing.push(name.to_os_string());
                existing = parent;
            }
            _ => break,
        }
    }
    let base = if existing.as_os_str().is_empty() {
        Path::new(".")
    } else {
        existing
    };
    let mut resolved = base
        .canonicalize()
        .map_err(|e| Error::fs("resolve workspace directory", base, e))?;
    resolved.extend(missing.iter().rev());
    Ok(resolved)
}
