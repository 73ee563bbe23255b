//! Phase 5: Packaging
//!
//! Turns a merged destination tree into the deliverable: a zip archive, or
//! the plain tree relocated into an output directory.
//!
//! ## Process
//!
//! 1.  **Walk**: The tree is walked in sorted name order, so the same tree
//!     always produces the same entry order.
//!
//! 2.  **Write Entries**: Directories become explicit entries, which keeps
//!     empty category and database unit folders in the archive. Files are
//!     deflate-compressed. Entry names use `/` separators, relative to the
//!     tree root.
//!
//! 3.  **Publish**: The archive is written next to the requested path under a
//!     temporary name and renamed into place only once complete.

use std::fs::File;
use std::io;
use std::path::Path;

use log::info;
use tempfile::NamedTempFile;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{Error, Result};
use crate::filesystem;

/// Default archive name, matching what consumers of the output expect.
pub const DEFAULT_ARCHIVE_NAME: &str = "Operation.zip";

/// Counts of what went into an archive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArchiveSummary {
    pub files: usize,
    pub directories: usize,
}

/// Write the tree rooted at `tree_root` to a zip archive at `archive_path`.
pub fn write_zip(tree_root: &Path, archive_path: &Path) -> Result<ArchiveSummary> {
    let archive_err = |message: String| Error::Archive {
        path: archive_path.to_path_buf(),
        message,
    };

    let parent = match archive_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => std::env::current_dir()?,
    };
    filesystem::ensure_dir(&parent)?;

    let staging = NamedTempFile::new_in(&parent).map_err(|e| Error::fs("create", &parent, e))?;
    let mut zip = ZipWriter::new(staging.reopen().map_err(|e| archive_err(e.to_string()))?);
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o644);

    let mut summary = ArchiveSummary::default();
    for entry in WalkDir::new(tree_root).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| archive_err(e.to_string()))?;
        let name = entry_name(tree_root, entry.path());

        if entry.file_type().is_dir() {
            zip.add_directory(name, options.unix_permissions(0o755))
                .map_err(|e| archive_err(e.to_string()))?;
            summary.directories += 1;
        } else {
            zip.start_file(name, options)
                .map_err(|e| archive_err(e.to_string()))?;
            let mut source =
                File::open(entry.path()).map_err(|e| Error::fs("read", entry.path(), e))?;
            io::copy(&mut source, &mut zip).map_err(|e| archive_err(e.to_string()))?;
            summary.files += 1;
        }
    }

    zip.finish().map_err(|e| archive_err(e.to_string()))?;
    // NamedTempFile creates 0600 files
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        staging
            .as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o644))
            .map_err(|e| Error::fs("set permissions", staging.path(), e))?;
    }
    staging
        .persist(archive_path)
        .map_err(|e| archive_err(e.error.to_string()))?;

    info!(
        "Wrote {} ({} files, {} directories)",
        archive_path.display(),
        summary.files,
        summary.directories
    );
    Ok(summary)
}

/// Move the merged tree's top-level entries into `output_dir`, replacing
/// same-named entries already there.
pub fn unpack_into(tree_root: &Path, output_dir: &Path) -> Result<usize> {
    filesystem::ensure_dir(output_dir)?;
    let entries: Vec<_> = filesystem::subdirectories(tree_root)?
        .into_iter()
        .chain(filesystem::files(tree_root)?)
        .collect();
    for entry in &entries {
        filesystem::replace_entry(entry, &output_dir.join(filesystem::entry_name(entry)))?;
    }
    info!("Moved merged tree into {}", output_dir.display());
    Ok(entries.len())
}

fn entry_name(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
