//! Resolution of the release file set.
//!
//! A release contains every top-level file with the configured source
//! extension, the individually named files, and the named directories. All
//! inputs are resolved against the working directory before anything is
//! copied, so a missing input is reported without creating the staging
//! directory.

use crate::config::PackagerConfig;
use crate::error::StagingError;
use camino::{Utf8Path, Utf8PathBuf};
use glob::{MatchOptions, Pattern};

/// Inputs that make up a release.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceSet {
    /// Files copied flat into the staging directory.
    pub files: Vec<Utf8PathBuf>,
    /// Directories copied recursively under their own names.
    pub trees: Vec<Utf8PathBuf>,
}

impl SourceSet {
    /// Resolve the configured inputs in `work_dir`.
    ///
    /// Pattern matches are sorted by name and named files follow them in
    /// configuration order. A file that is both matched and named is listed
    /// once.
    ///
    /// # Errors
    ///
    /// Returns [`StagingError::MissingSource`] if a named file or directory
    /// does not exist, or [`StagingError::InvalidPattern`] if the source
    /// pattern cannot be expanded.
    pub fn resolve(work_dir: &Utf8Path, config: &PackagerConfig) -> Result<Self, StagingError> {
        let mut files = matching_files(work_dir, &config.source_pattern())?;
        if files.is_empty() {
            log::warn!(
                "no files matching {} in {work_dir}",
                config.source_pattern()
            );
        }

        for name in &config.extra_files {
            let path = work_dir.join(name);
            if !path.is_file() {
                return Err(StagingError::MissingSource { path });
            }
            if !files.contains(&path) {
                files.push(path);
            }
        }

        let trees = config
            .tree_dirs
            .iter()
            .map(|name| {
                let path = work_dir.join(name);
                if path.is_dir() {
                    Ok(path)
                } else {
                    Err(StagingError::MissingSource { path })
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { files, trees })
    }

    /// Whether the set contains nothing to copy.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.trees.is_empty()
    }
}

/// Expand `pattern` against the regular files directly inside `dir`.
fn matching_files(dir: &Utf8Path, pattern: &str) -> Result<Vec<Utf8PathBuf>, StagingError> {
    let full = format!("{}/{pattern}", Pattern::escape(dir.as_str()));
    let invalid = |reason: String| StagingError::InvalidPattern {
        pattern: full.clone(),
        reason,
    };

    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: true,
    };
    let paths = glob::glob_with(&full, options).map_err(|e| invalid(e.to_string()))?;

    let mut files = Vec::new();
    for entry in paths {
        let path = entry.map_err(|e| invalid(e.to_string()))?;
        if !path.is_file() {
            continue;
        }
        let path = Utf8PathBuf::try_from(path).map_err(|e| invalid(e.to_string()))?;
        files.push(path);
    }
    files.sort();
    Ok(files)
}
