//! Release naming policy.
//!
//! A release is named `<package>-v<version>`, where the package name is the
//! product name with spaces replaced by hyphens. The same name is used for
//! the staging directory and, with a `.tar` suffix, for the archive.

use crate::version::Version;
use std::fmt;

/// The fixed separator between package name and version.
const VERSION_PREFIX: &str = "-v";

/// The fixed file extension for release archives.
const ARCHIVE_EXTENSION: &str = ".tar";

/// A product name made safe for use in file names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageName(String);

impl PackageName {
    /// Derive the package name from a human-readable product name.
    ///
    /// # Examples
    ///
    /// ```
    /// use gs_packager::naming::PackageName;
    ///
    /// assert_eq!(PackageName::from_product("Magic GS").as_str(), "Magic-GS");
    /// ```
    #[must_use]
    pub fn from_product(product: &str) -> Self {
        Self(product.replace(' ', "-"))
    }

    /// Get the package name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A versioned release name.
///
/// # Examples
///
/// ```
/// use gs_packager::naming::{PackageName, ReleaseName};
/// use gs_packager::version::Version;
///
/// let name = ReleaseName::new(PackageName::from_product("MagicGS"), Version::new(42));
/// assert_eq!(name.to_string(), "MagicGS-v42");
/// assert_eq!(name.archive_filename(), "MagicGS-v42.tar");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseName {
    package: PackageName,
    version: Version,
}

impl ReleaseName {
    /// Create a release name from its components.
    #[must_use]
    pub fn new(package: PackageName, version: Version) -> Self {
        Self { package, version }
    }

    /// Return the package component.
    #[must_use]
    pub fn package(&self) -> &PackageName {
        &self.package
    }

    /// Return the version component.
    #[must_use]
    pub fn version(&self) -> &Version {
        &self.version
    }

    /// Name of the staging directory.
    #[must_use]
    pub fn staging_dir_name(&self) -> String {
        self.to_string()
    }

    /// Name of the archive file.
    #[must_use]
    pub fn archive_filename(&self) -> String {
        format!("{self}{ARCHIVE_EXTENSION}")
    }
}

impl fmt::Display for ReleaseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{VERSION_PREFIX}{}", self.package, self.version)
    }
}
