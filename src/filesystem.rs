//! Host filesystem primitives used by the merge
//!
//! Relocation is an ownership transfer: the entry is re-parented under the
//! destination with `rename`, so the source no longer holds it afterwards.
//! Listings are sorted by name so that runs are deterministic regardless of
//! the order the operating system returns directory entries in.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Immediate subdirectories of `dir`, sorted by name.
pub fn subdirectories(dir: &Path) -> Result<Vec<PathBuf>> {
    list(dir, true)
}

/// Immediate non-directory entries of `dir`, sorted by name.
pub fn files(dir: &Path) -> Result<Vec<PathBuf>> {
    list(dir, false)
}

fn list(dir: &Path, want_dirs: bool) -> Result<Vec<PathBuf>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| Error::fs("list", dir, e))? {
        let entry = entry.map_err(|e| Error::fs("list", dir, e))?;
        let file_type = entry.file_type().map_err(|e| Error::fs("inspect", entry.path(), e))?;
        if file_type.is_dir() == want_dirs {
            entries.push(entry.path());
        }
    }
    entries.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(entries)
}

/// Final component of `path` as a string, for name matching.
pub fn entry_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Create `dir` (and parents) if it does not exist. Existing content is kept.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| Error::fs("create directory", dir, e))
}

/// Remove `dir` if present and create it again, empty.
pub fn recreate_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        fs::remove_dir_all(dir).map_err(|e| Error::fs("delete directory", dir, e))?;
    }
    ensure_dir(dir)
}

/// Move `src` to `dst`, which must not exist.
///
/// Falls back to copy-then-remove when the two paths are on different
/// filesystems, leaving the same observable result.
pub fn relocate(src: &Path, dst: &Path) -> Result<()> {
    debug!("Relocating {} -> {}", src.display(), dst.display());
    match fs::rename(src, dst) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => move_by_copy(src, dst),
        Err(e) => Err(Error::fs("move", src, e)),
    }
}

fn move_by_copy(src: &Path, dst: &Path) -> Result<()> {
    copy_tree(src, dst)?;
    remove_entry(src)
}

/// Replace the directory at `dst` wholesale with `src`.
pub fn replace_dir(src: &Path, dst: &Path) -> Result<()> {
    if dst.exists() {
        fs::remove_dir_all(dst).map_err(|e| Error::fs("delete directory", dst, e))?;
    }
    relocate(src, dst)
}

/// Replace the entry at `dst` with `src`, whether `dst` is a file or a
/// directory.
pub fn replace_entry(src: &Path, dst: &Path) -> Result<()> {
    if dst.symlink_metadata().is_ok() {
        remove_entry(dst)?;
    }
    relocate(src, dst)
}

fn remove_entry(path: &Path) -> Result<()> {
    let metadata = path
        .symlink_metadata()
        .map_err(|e| Error::fs("inspect", path, e))?;
    if metadata.is_dir() {
        fs::remove_dir_all(path).map_err(|e| Error::fs("delete directory", path, e))
    } else {
        fs::remove_file(path).map_err(|e| Error::fs("delete file", path, e))
    }
}

/// Recursively copy `src` to `dst`. Returns the number of files copied.
pub fn copy_tree(src: &Path, dst: &Path) -> Result<u64> {
    // A lone file has an empty relative path; joining it would target `dst/`
    if !src.is_dir() {
        if let Some(parent) = dst.parent() {
            ensure_dir(parent)?;
        }
        fs::copy(src, dst).map_err(|e| Error::fs("copy", src, e))?;
        return Ok(1);
    }

    let mut copied = 0;
    for entry in WalkDir::new(src) {
        let entry = entry.map_err(|e| {
            let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| src.to_path_buf());
            Error::fs("walk", path, e.into())
        })?;
        let relative = entry.path().strip_prefix(src).unwrap_or(entry.path());
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            ensure_dir(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                ensure_dir(parent)?;
            }
            fs::copy(entry.path(), &target).map_err(|e| Error::fs("copy", entry.path(), e))?;
            copied += 1;
        }
    }
    Ok(copied)
}

/// Clear the read-only flag on every file under `root`.
///
/// Git writes its pack files read-only, which makes removal fail on some
/// platforms.
pub fn make_writable(root: &Path) -> Result<()> {
    for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(_) => continue,
        };
        let mut permissions = metadata.permissions();
        if permissions.readonly() {
            #[allow(clippy::permissions_set_readonly_false)]
            permissions.set_readonly(false);
            fs::set_permissions(entry.path(), permissions)
                .map_err(|e| Error::fs("set permissions", entry.path(), e))?;
        }
    }
    Ok(())
}
