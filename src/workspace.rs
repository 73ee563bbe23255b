//! Per-run workspace allocation
//!
//! Each run gets its own uniquely named directory holding a `source/` tree
//! (consumed by the merge) and a `staging/` tree (the merge destination).
//! Concurrent runs therefore never share directories. The whole workspace
//! is removed when the run ends, whether it succeeded or not.

use std::path::{Component, Path, PathBuf};

use log::{debug, warn};
use tempfile::TempDir;

use crate::error::{Error, Result};
use crate::filesystem;

const WORKSPACE_PREFIX: &str = "versions-aggregate-";

/// A run's private scratch area.
#[derive(Debug)]
pub struct Workspace {
    dir: Option<TempDir>,
    source: PathBuf,
    staging: PathBuf,
}

impl Workspace {
    /// Allocate a workspace under `root`, or the system temp directory.
    pub fn allocate(root: Option<&Path>) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(WORKSPACE_PREFIX);
        let dir = match root {
            Some(root) => {
                filesystem::ensure_dir(root)?;
                builder.tempdir_in(root).map_err(|e| Error::fs("allocate workspace", root, e))?
            }
            None => builder
                .tempdir()
                .map_err(|e| Error::fs("allocate workspace", std::env::temp_dir(), e))?,
        };

        let source = dir.path().join("source");
        let staging = dir.path().join("staging");
        filesystem::ensure_dir(&source)?;
        filesystem::ensure_dir(&staging)?;
        debug!("Allocated workspace {}", dir.path().display());

        Ok(Self {
            dir: Some(dir),
            source,
            staging,
        })
    }

    pub fn path(&self) -> &Path {
        self.source.parent().unwrap_or(&self.source)
    }

    /// Where the source tree is laid down.
    pub fn source_dir(&self) -> &Path {
        &self.source
    }

    /// Where the merged tree is built.
    pub fn staging_dir(&self) -> &Path {
        &self.staging
    }

    /// Resolve the versions folder inside the source tree.
    ///
    /// The merge moves files out of this folder, so it must not escape the
    /// workspace: absolute paths and `..` components are rejected.
    pub fn versions_root(&self, versions_path: &Path) -> Result<PathBuf> {
        let escapes = versions_path.as_os_str().is_empty()
            || versions_path
                .components()
                .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(Error::InvalidVersionsPath {
                path: versions_path.to_path_buf(),
            });
        }
        Ok(self.source.join(versions_path))
    }

    /// Remove the workspace now, reporting failures.
    pub fn discard(mut self) -> Result<()> {
        match self.dir.take() {
            Some(dir) => {
                filesystem::make_writable(dir.path())?;
                let path = dir.path().to_path_buf();
                dir.close().map_err(|e| Error::fs("delete workspace", path, e))
            }
            None => Ok(()),
        }
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if let Some(dir) = self.dir.take() {
            let path = dir.path().to_path_buf();
            let cleaned = filesystem::make_writable(&path).and_then(|_| {
                dir.close()
                    .map_err(|e| Error::fs("delete workspace", &path, e))
            });
            if let Err(e) = cleaned {
                warn!("Could not remove workspace {}: {}", path.display(), e);
            }
        }
    }
}
