//! Phase 4: Merging
//!
//! Relocates the content of one classified category subfolder into the
//! destination tree. Two strategies exist:
//!
//! - **Wholesale** (applications, reports): every immediate subdirectory of
//!   the category folder replaces the same-named destination directory
//!   entirely. The last version in the range wins per folder.
//!
//! - **Incremental** (databases): every unit folder is mapped to its
//!   canonical unit directory, then merged one level deeper. Revision
//!   folders are created when missing but never cleared, and only files with
//!   the same name are replaced. Revisions contributed by earlier versions
//!   survive later ones.
//!
//! Items are moved, not copied: the source category folder is emptied as the
//! merge proceeds.

use std::path::{Path, PathBuf};

use log::{debug, warn};

use super::{AggregationReport, CategorySubfolder};
use crate::category::Category;
use crate::config::{ProjectConfig, UnknownUnitPolicy};
use crate::error::{Error, Result};
use crate::filesystem;
use crate::naming::{self, Resolution};

/// Merges category subfolders into one destination tree.
pub struct MergeEngine<'a> {
    destination: &'a Path,
    project: &'a ProjectConfig,
}

impl<'a> MergeEngine<'a> {
    pub fn new(destination: &'a Path, project: &'a ProjectConfig) -> Self {
        Self {
            destination,
            project,
        }
    }

    /// Destination directory of a known category.
    pub fn category_dir(&self, category: Category) -> Option<PathBuf> {
        self.project
            .categories
            .get(category)
            .map(|name| self.destination.join(name))
    }

    /// Create the destination skeleton: one directory per category and an
    /// empty directory per configured database unit.
    pub fn prepare(&self) -> Result<()> {
        for category in Category::KNOWN {
            if let Some(dir) = self.category_dir(category) {
                filesystem::ensure_dir(&dir)?;
            }
        }

        if let Some(database_dir) = self.category_dir(Category::Database) {
            for unit in &self.project.databases {
                filesystem::recreate_dir(&database_dir.join(unit))?;
            }
        }
        Ok(())
    }

    /// Merge one classified subfolder. `Unknown` subfolders are left alone.
    pub fn merge(&self, subfolder: &CategorySubfolder, report: &mut AggregationReport) -> Result<()> {
        let Some(dest) = self.category_dir(subfolder.category) else {
            debug!("Skipping unclassified folder {}", subfolder.path.display());
            return Ok(());
        };

        let count = match subfolder.category {
            Category::Database => self.merge_databases(&subfolder.path, &dest, report)?,
            _ => merge_wholesale(&subfolder.path, &dest)?,
        };
        report.record(subfolder.category, count);
        Ok(())
    }

    fn merge_databases(
        &self,
        src: &Path,
        dest: &Path,
        report: &mut AggregationReport,
    ) -> Result<usize> {
        let mut moved = 0;

        for unit in filesystem::subdirectories(src)? {
            let unit_name = filesystem::entry_name(&unit);
            let resolution = naming::resolve(&unit_name, &self.project.databases);

            if let Resolution::Unmatched(bucket) = &resolution {
                if self.project.unknown_database_units == UnknownUnitPolicy::Fail {
                    return Err(Error::UnresolvedDatabaseUnit {
                        folder: unit_name,
                        candidates: self.project.databases.clone(),
                    });
                }
                warn!(
                    "Database folder '{}' matches no configured unit, merging into '{}'",
                    unit_name, bucket
                );
                report.record_unknown_unit(bucket);
            }

            let unit_dest = dest.join(resolution.dir_name());
            filesystem::ensure_dir(&unit_dest)?;
            moved += merge_unit(&unit, &unit_dest)?;
        }

        Ok(moved)
    }
}

/// Replace each immediate subdirectory of `dest` by its counterpart in `src`.
fn merge_wholesale(src: &Path, dest: &Path) -> Result<usize> {
    let folders = filesystem::subdirectories(src)?;
    for folder in &folders {
        let target = dest.join(filesystem::entry_name(folder));
        filesystem::replace_dir(folder, &target)?;
    }

    for stray in filesystem::files(src)? {
        debug!("Ignoring loose file {}", stray.display());
    }
    Ok(folders.len())
}

/// Merge one database unit folder into its canonical directory.
fn merge_unit(unit: &Path, unit_dest: &Path) -> Result<usize> {
    let mut moved = 0;

    for revision in filesystem::subdirectories(unit)? {
        let revision_dest = unit_dest.join(filesystem::entry_name(&revision));
        filesystem::ensure_dir(&revision_dest)?;
        moved += replace_children(&revision, &revision_dest)?;
    }

    for file in filesystem::files(unit)? {
        filesystem::replace_entry(&file, &unit_dest.join(filesystem::entry_name(&file)))?;
        moved += 1;
    }

    Ok(moved)
}

/// Move every entry of `src` into `dest`, replacing same-named entries only.
fn replace_children(src: &Path, dest: &Path) -> Result<usize> {
    let mut moved = 0;
    for entry in filesystem::files(src)?
        .into_iter()
        .chain(filesystem::subdirectories(src)?)
    {
        filesystem::replace_entry(&entry, &dest.join(filesystem::entry_name(&entry)))?;
        moved += 1;
    }
    Ok(moved)
}
