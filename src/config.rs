//! Packager settings backed by an optional `packager.toml`.
//!
//! Every constant the release procedure depends on (product name, version
//! file and marker, the source file set) lives in [`PackagerConfig`]. Values
//! default to the `MagicGS` layout and may be overridden by a TOML file in
//! the working directory and then by command-line flags.

use crate::error::ConfigurationError;
use crate::naming::PackageName;
use crate::version::VersionMarker;
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use std::fs;

/// File name looked up in the working directory when no explicit
/// configuration file is given.
pub const DEFAULT_CONFIG_FILE: &str = "packager.toml";

/// Settings for a packaging run.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PackagerConfig {
    /// Human-readable product name; spaces become hyphens in file names.
    pub product_name: String,
    /// Script file holding the version marker, relative to the working
    /// directory.
    pub version_file: Utf8PathBuf,
    /// Token that introduces the version marker.
    pub version_token: String,
    /// Assignment operator between token and number.
    pub version_operator: String,
    /// Extension (without the dot) of source files copied from the top
    /// level of the working directory.
    pub source_extension: String,
    /// Individually named files copied into the release.
    pub extra_files: Vec<Utf8PathBuf>,
    /// Directories copied recursively into same-named subdirectories.
    pub tree_dirs: Vec<Utf8PathBuf>,
}

impl Default for PackagerConfig {
    fn default() -> Self {
        Self {
            product_name: "MagicGS".to_owned(),
            version_file: Utf8PathBuf::from("version.nut"),
            version_token: "SELF_VERSION".to_owned(),
            version_operator: "<-".to_owned(),
            source_extension: "nut".to_owned(),
            extra_files: ["readme.txt", "license.txt", "changelog.txt"]
                .into_iter()
                .map(Utf8PathBuf::from)
                .collect(),
            tree_dirs: vec![Utf8PathBuf::from("lang")],
        }
    }
}

impl PackagerConfig {
    /// Load settings for the working directory `dir`.
    ///
    /// With `explicit` set, that file must exist; a relative path is
    /// resolved against `dir`. Otherwise [`DEFAULT_CONFIG_FILE`] is read
    /// when present and the defaults are used when it is not.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if an explicit file is missing or a
    /// configuration file cannot be read or parsed.
    pub fn load(dir: &Utf8Path, explicit: Option<&Utf8Path>) -> Result<Self, ConfigurationError> {
        match explicit {
            Some(path) => {
                let path = dir.join(path);
                if !path.is_file() {
                    return Err(ConfigurationError::ConfigFileNotFound { path });
                }
                Self::from_file(&path)
            }
            None => {
                let path = dir.join(DEFAULT_CONFIG_FILE);
                if path.is_file() {
                    Self::from_file(&path)
                } else {
                    log::debug!("no {DEFAULT_CONFIG_FILE} in {dir}; using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    /// Read and parse a configuration file.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if the file cannot be read or is not
    /// valid configuration TOML.
    pub fn from_file(path: &Utf8Path) -> Result<Self, ConfigurationError> {
        let source =
            fs::read_to_string(path).map_err(|source| ConfigurationError::UnreadableConfigFile {
                path: path.to_owned(),
                source,
            })?;
        log::debug!("loading configuration from {path}");
        toml::from_str(&source).map_err(|source| ConfigurationError::InvalidConfigFile {
            path: path.to_owned(),
            source,
        })
    }

    /// Apply command-line overrides on top of the loaded settings.
    #[must_use]
    pub fn with_overrides(
        mut self,
        product_name: Option<String>,
        version_file: Option<Utf8PathBuf>,
    ) -> Self {
        if let Some(name) = product_name {
            self.product_name = name;
        }
        if let Some(file) = version_file {
            self.version_file = file;
        }
        self
    }

    /// Compile the version marker described by these settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidMarker`] if the marker cannot be
    /// compiled.
    pub fn marker(&self) -> Result<VersionMarker, ConfigurationError> {
        VersionMarker::new(&self.version_token, &self.version_operator)
    }

    /// The file-name-safe package name.
    #[must_use]
    pub fn package_name(&self) -> PackageName {
        PackageName::from_product(&self.product_name)
    }

    /// Glob matching top-level source files, e.g. `*.nut`.
    #[must_use]
    pub fn source_pattern(&self) -> String {
        format!("*.{}", self.source_extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn work_dir() -> (TempDir, Utf8PathBuf) {
        let dir = TempDir::new().expect("temp dir");
        let path = Utf8PathBuf::try_from(dir.path().to_path_buf()).expect("utf8 path");
        (dir, path)
    }

    #[rstest]
    fn defaults_match_the_magicgs_layout() {
        let config = PackagerConfig::default();

        assert_eq!(config.product_name, "MagicGS");
        assert_eq!(config.version_file, "version.nut");
        assert_eq!(config.version_token, "SELF_VERSION");
        assert_eq!(config.version_operator, "<-");
        assert_eq!(config.source_pattern(), "*.nut");
        assert_eq!(config.extra_files.len(), 3);
        assert_eq!(config.tree_dirs, vec![Utf8PathBuf::from("lang")]);
    }

    #[rstest]
    fn deserialises_partial_overrides_from_toml() {
        let source = "product_name = \"Other Script\"\ntree_dirs = [\"lang\", \"data\"]\n";

        let config = toml::from_str::<PackagerConfig>(source)
            .expect("expected configuration to parse successfully");

        assert_eq!(config.package_name().as_str(), "Other-Script");
        assert_eq!(config.tree_dirs.len(), 2);
        assert_eq!(config.version_token, "SELF_VERSION");
    }

    #[rstest]
    fn rejects_unknown_fields() {
        let outcome: Result<PackagerConfig, _> = toml::from_str("compression = \"zstd\"\n");

        assert!(
            outcome.is_err(),
            "expected a parse error when unknown fields are present"
        );
    }

    #[rstest]
    fn load_without_file_uses_defaults(work_dir: (TempDir, Utf8PathBuf)) {
        let (_guard, dir) = work_dir;
        let config = PackagerConfig::load(&dir, None).expect("defaults load");
        assert_eq!(config, PackagerConfig::default());
    }

    #[rstest]
    fn load_reads_default_file(work_dir: (TempDir, Utf8PathBuf)) {
        let (_guard, dir) = work_dir;
        fs::write(dir.join(DEFAULT_CONFIG_FILE), "source_extension = \"nut2\"\n")
            .expect("write config");

        let config = PackagerConfig::load(&dir, None).expect("config loads");
        assert_eq!(config.source_pattern(), "*.nut2");
    }

    #[rstest]
    fn load_rejects_missing_explicit_file(work_dir: (TempDir, Utf8PathBuf)) {
        let (_guard, dir) = work_dir;
        let err = PackagerConfig::load(&dir, Some(Utf8Path::new("custom.toml")))
            .expect_err("missing explicit file");
        assert!(matches!(err, ConfigurationError::ConfigFileNotFound { .. }));
    }

    #[rstest]
    fn load_reports_malformed_file(work_dir: (TempDir, Utf8PathBuf)) {
        let (_guard, dir) = work_dir;
        fs::write(dir.join(DEFAULT_CONFIG_FILE), "product_name = 3\n").expect("write config");

        let err = PackagerConfig::load(&dir, None).expect_err("malformed file");
        assert!(matches!(err, ConfigurationError::InvalidConfigFile { .. }));
    }

    #[rstest]
    fn overrides_replace_loaded_values() {
        let config = PackagerConfig::default()
            .with_overrides(Some("Magic GS".to_owned()), Some("info.nut".into()));

        assert_eq!(config.package_name().as_str(), "Magic-GS");
        assert_eq!(config.version_file, "info.nut");
    }

    #[rstest]
    fn absent_overrides_keep_loaded_values() {
        let config = PackagerConfig::default().with_overrides(None, None);
        assert_eq!(config, PackagerConfig::default());
    }
}
