//! Error types for the release packager.
//!
//! Failures fall into three fatal classes that mirror the pipeline steps:
//! configuration (the version or settings cannot be resolved), staging (a
//! copy into the staging directory failed), and packaging (the archive could
//! not be written). Cleanup failures are reported separately through
//! [`CleanupError`] because they never abort a run.

use camino::Utf8PathBuf;
use thiserror::Error;

/// The version or packager settings could not be resolved.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// No line in the version file matched the version marker.
    #[error("couldn't find {token} version in {path}")]
    VersionNotFound {
        /// The version file that was scanned.
        path: Utf8PathBuf,
        /// The marker token that was searched for.
        token: String,
    },

    /// The version file could not be read.
    #[error("failed to read version file {path}")]
    UnreadableVersionFile {
        /// Path of the version file.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// An explicitly requested configuration file does not exist.
    #[error("configuration file {path} not found")]
    ConfigFileNotFound {
        /// Path of the missing file.
        path: Utf8PathBuf,
    },

    /// The configuration file could not be read.
    #[error("failed to read configuration file {path}")]
    UnreadableConfigFile {
        /// Path of the configuration file.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`crate::config::PackagerConfig`].
    #[error("invalid configuration file {path}")]
    InvalidConfigFile {
        /// Path of the configuration file.
        path: Utf8PathBuf,
        /// The TOML parse error.
        #[source]
        source: toml::de::Error,
    },

    /// The version marker could not be compiled into a pattern.
    #[error("invalid version marker: {0}")]
    InvalidMarker(#[from] regex::Error),
}

/// Copying inputs into the staging directory failed.
///
/// A partially populated staging directory may remain on disk.
#[derive(Debug, Error)]
pub enum StagingError {
    /// The staging directory could not be created.
    #[error("failed to create staging directory {path}")]
    CreateDir {
        /// The staging directory.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A single file could not be copied.
    #[error("failed to copy {from} to {to}")]
    CopyFile {
        /// Source file.
        from: Utf8PathBuf,
        /// Destination file.
        to: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A directory tree could not be walked or copied.
    #[error("failed to copy directory {from} to {to}: {reason}")]
    CopyTree {
        /// Source directory.
        from: Utf8PathBuf,
        /// Destination directory.
        to: Utf8PathBuf,
        /// Description of the failure.
        reason: String,
    },

    /// A named input file or directory does not exist.
    #[error("required input {path} not found")]
    MissingSource {
        /// The missing input.
        path: Utf8PathBuf,
    },

    /// The source file pattern could not be expanded.
    #[error("invalid source pattern {pattern}: {reason}")]
    InvalidPattern {
        /// The glob pattern.
        pattern: String,
        /// Description of the failure.
        reason: String,
    },
}

/// Writing the release archive failed.
#[derive(Debug, Error)]
pub enum PackagingError {
    /// The archive file could not be created or written.
    #[error("failed to create archive {path}")]
    CreateArchive {
        /// The archive that was being written.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Removing the staging directory failed after the archive was written.
#[derive(Debug, Error)]
pub enum CleanupError {
    /// The staging directory could not be removed.
    #[error("failed to remove staging directory {path}")]
    RemoveTree {
        /// The staging directory.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Any fatal packager failure.
#[derive(Debug, Error)]
pub enum PackagerError {
    /// Version or settings could not be resolved.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Staging failed.
    #[error("staging error: {0}")]
    Staging(#[from] StagingError),

    /// Archival failed.
    #[error("packaging error: {0}")]
    Packaging(#[from] PackagingError),
}

/// Result type alias using [`PackagerError`].
pub type Result<T> = std::result::Result<T, PackagerError>;
