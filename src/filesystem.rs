//! Filesystem capability used by the packaging pipeline.
//!
//! The pipeline never touches the disk directly. It goes through
//! [`PackageFs`], so tests can substitute a mock and the host implementation
//! stays the single place where copy, archive, and delete primitives live.
//! [`HostFs`] uses portable Rust APIs, so behaviour is identical on every
//! platform.

use crate::archive::write_tar;
use crate::error::{CleanupError, PackagingError, StagingError};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use walkdir::WalkDir;

/// Filesystem operations needed to stage and archive a release.
#[cfg_attr(test, mockall::automock)]
pub trait PackageFs {
    /// Create `path` and any missing parents. An existing directory is not
    /// an error.
    ///
    /// # Errors
    ///
    /// Returns [`StagingError::CreateDir`] if the directory cannot be created.
    fn create_dir(&self, path: &Utf8Path) -> Result<(), StagingError>;

    /// Copy a single file, overwriting `to` if it exists.
    ///
    /// # Errors
    ///
    /// Returns [`StagingError::CopyFile`] if the copy fails.
    fn copy_file(&self, from: &Utf8Path, to: &Utf8Path) -> Result<(), StagingError>;

    /// Recursively copy the contents of directory `from` into `to`,
    /// overwriting existing files. Returns the number of files copied.
    ///
    /// # Errors
    ///
    /// Returns a [`StagingError`] if the tree cannot be walked or any entry
    /// cannot be copied.
    fn copy_tree(&self, from: &Utf8Path, to: &Utf8Path) -> Result<usize, StagingError>;

    /// Write an uncompressed tar of `source_dir` to `archive_path`, with
    /// entries rooted at the directory's own name. A file already at
    /// `archive_path` is replaced only when the new archive is complete.
    ///
    /// # Errors
    ///
    /// Returns [`PackagingError::CreateArchive`] if the archive cannot be
    /// written.
    fn create_archive(
        &self,
        source_dir: &Utf8Path,
        archive_path: &Utf8Path,
    ) -> Result<(), PackagingError>;

    /// Recursively delete `path`.
    ///
    /// # Errors
    ///
    /// Returns [`CleanupError::RemoveTree`] if the directory cannot be
    /// removed.
    fn remove_tree(&self, path: &Utf8Path) -> Result<(), CleanupError>;
}

/// [`PackageFs`] backed by the host filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostFs;

impl PackageFs for HostFs {
    fn create_dir(&self, path: &Utf8Path) -> Result<(), StagingError> {
        fs::create_dir_all(path).map_err(|source| StagingError::CreateDir {
            path: path.to_owned(),
            source,
        })
    }

    fn copy_file(&self, from: &Utf8Path, to: &Utf8Path) -> Result<(), StagingError> {
        log::debug!("copying {from} -> {to}");
        fs::copy(from, to)
            .map(|_| ())
            .map_err(|source| StagingError::CopyFile {
                from: from.to_owned(),
                to: to.to_owned(),
                source,
            })
    }

    fn copy_tree(&self, from: &Utf8Path, to: &Utf8Path) -> Result<usize, StagingError> {
        let tree_error = |reason: String| StagingError::CopyTree {
            from: from.to_owned(),
            to: to.to_owned(),
            reason,
        };

        let mut copied = 0;
        for entry in WalkDir::new(from).sort_by_file_name() {
            let entry = entry.map_err(|e| tree_error(e.to_string()))?;
            let path = Utf8Path::from_path(entry.path()).ok_or_else(|| {
                tree_error(format!("{} is not valid UTF-8", entry.path().display()))
            })?;
            let relative = path
                .strip_prefix(from)
                .map_err(|e| tree_error(e.to_string()))?;
            let dest: Utf8PathBuf = to.join(relative);

            if entry.file_type().is_dir() {
                self.create_dir(&dest)?;
            } else {
                self.copy_file(path, &dest)?;
                copied += 1;
            }
        }
        Ok(copied)
    }

    fn create_archive(
        &self,
        source_dir: &Utf8Path,
        archive_path: &Utf8Path,
    ) -> Result<(), PackagingError> {
        write_tar(source_dir, archive_path).map_err(|source| PackagingError::CreateArchive {
            path: archive_path.to_owned(),
            source,
        })
    }

    fn remove_tree(&self, path: &Utf8Path) -> Result<(), CleanupError> {
        fs::remove_dir_all(path).map_err(|source| CleanupError::RemoveTree {
            path: path.to_owned(),
            source,
        })
    }
}
