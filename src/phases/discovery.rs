//! Phase 1: Discovery and Classification
//!
//! Lists the version folders under the versions root and, for each version,
//! classifies its immediate subfolders into categories.
//!
//! Version folders are returned in byte-wise name order. That order is the
//! one range selection treats as authoritative; no semantic version parsing
//! happens here. Hidden entries (names starting with `.`, such as a `.git`
//! directory when the versions path is the repository root) are not
//! versions and are left out.

use std::path::{Path, PathBuf};

use log::debug;

use crate::category::{classify, Category};
use crate::config::CategoryNames;
use crate::error::Result;
use crate::filesystem;

/// One release folder, e.g. `V1.2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionFolder {
    pub name: String,
    pub path: PathBuf,
}

impl AsRef<str> for VersionFolder {
    fn as_ref(&self) -> &str {
        &self.name
    }
}

/// A directory directly under a version folder, with its category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySubfolder {
    pub name: String,
    pub path: PathBuf,
    pub category: Category,
}

/// Enumerate version folders under `versions_root`.
pub fn enumerate_versions(versions_root: &Path) -> Result<Vec<VersionFolder>> {
    let versions: Vec<VersionFolder> = filesystem::subdirectories(versions_root)?
        .into_iter()
        .map(|path| VersionFolder {
            name: filesystem::entry_name(&path),
            path,
        })
        .filter(|v| !v.name.starts_with('.'))
        .collect();

    debug!(
        "Found {} version folders under {}",
        versions.len(),
        versions_root.display()
    );
    Ok(versions)
}

/// Classify the immediate subfolders of `version`.
pub fn classify_subfolders(
    version: &VersionFolder,
    names: &CategoryNames,
) -> Result<Vec<CategorySubfolder>> {
    let subfolders = filesystem::subdirectories(&version.path)?
        .into_iter()
        .map(|path| {
            let name = filesystem::entry_name(&path);
            let category = classify(&name, names);
            debug!("{}/{} classified as {}", version.name, name, category);
            CategorySubfolder {
                name,
                path,
                category,
            }
        })
        .collect();
    Ok(subfolders)
}
