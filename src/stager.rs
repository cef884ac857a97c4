//! Release staging.
//!
//! The stager owns the versioned staging directory and copies the resolved
//! [`SourceSet`] into it through the [`PackageFs`] capability.

use crate::error::StagingError;
use crate::filesystem::PackageFs;
use crate::naming::ReleaseName;
use crate::sources::SourceSet;
use camino::{Utf8Path, Utf8PathBuf};

/// Handles staging of release inputs into `<output>/<package>-v<version>`.
#[derive(Debug, Clone)]
pub struct Stager {
    staging_dir: Utf8PathBuf,
}

impl Stager {
    /// Create a stager for `release` under `output_dir`.
    #[must_use]
    pub fn new(output_dir: &Utf8Path, release: &ReleaseName) -> Self {
        Self {
            staging_dir: output_dir.join(release.staging_dir_name()),
        }
    }

    /// Create a stager for an already computed staging directory.
    #[must_use]
    pub fn at(staging_dir: Utf8PathBuf) -> Self {
        Self { staging_dir }
    }

    /// Return the full path to the staging directory.
    #[must_use]
    pub fn staging_path(&self) -> &Utf8Path {
        &self.staging_dir
    }

    /// Ensure the staging directory exists. An existing directory is reused.
    ///
    /// # Errors
    ///
    /// Returns [`StagingError::CreateDir`] if the directory cannot be created.
    pub fn prepare(&self, fs: &dyn PackageFs) -> Result<(), StagingError> {
        fs.create_dir(&self.staging_dir)
    }

    /// Copy one file into the top level of the staging directory.
    ///
    /// # Errors
    ///
    /// Returns [`StagingError::MissingSource`] if `file` has no file name,
    /// or the error from the copy itself.
    pub fn stage_file(
        &self,
        fs: &dyn PackageFs,
        file: &Utf8Path,
    ) -> Result<Utf8PathBuf, StagingError> {
        let name = file.file_name().ok_or_else(|| StagingError::MissingSource {
            path: file.to_owned(),
        })?;
        let dest = self.staging_dir.join(name);
        fs.copy_file(file, &dest)?;
        Ok(dest)
    }

    /// Copy a directory tree into a same-named subdirectory.
    ///
    /// Returns the number of files copied.
    ///
    /// # Errors
    ///
    /// Returns [`StagingError::MissingSource`] if `dir` has no name, or the
    /// error from the tree copy.
    pub fn stage_tree(&self, fs: &dyn PackageFs, dir: &Utf8Path) -> Result<usize, StagingError> {
        let name = dir.file_name().ok_or_else(|| StagingError::MissingSource {
            path: dir.to_owned(),
        })?;
        let dest = self.staging_dir.join(name);
        fs.create_dir(&dest)?;
        fs.copy_tree(dir, &dest)
    }

    /// Stage every input of `sources`, files first, then trees.
    ///
    /// Returns the total number of files copied. Nothing is rolled back on
    /// failure.
    ///
    /// # Errors
    ///
    /// Returns the first [`StagingError`] encountered.
    pub fn stage_all(
        &self,
        fs: &dyn PackageFs,
        sources: &SourceSet,
    ) -> Result<usize, StagingError> {
        let mut copied = 0;
        for file in &sources.files {
            self.stage_file(fs, file)?;
            copied += 1;
        }
        for dir in &sources.trees {
            copied += self.stage_tree(fs, dir)?;
        }
        Ok(copied)
    }
}
