//! Version marker discovery.
//!
//! The release number lives in a script file as a line such as
//! `SELF_VERSION <- 42`. The token and the assignment operator are
//! configurable; the value is a run of ASCII digits and is kept exactly as
//! written, so `007` names a `-v007` release.

use crate::error::ConfigurationError;
use camino::Utf8Path;
use regex::bytes::Regex;
use std::fmt;
use std::fs;

/// A release version, stored as the digits captured from the marker.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version(String);

impl Version {
    /// Create a version from a number, formatted in decimal.
    #[must_use]
    pub fn new(value: u64) -> Self {
        Self(value.to_string())
    }

    /// Create a version from a digit string, keeping leading zeros.
    ///
    /// Returns `None` unless `digits` is a non-empty run of ASCII digits.
    ///
    /// # Examples
    ///
    /// ```
    /// use gs_packager::version::Version;
    ///
    /// assert_eq!(Version::from_digits("007").map(|v| v.to_string()), Some("007".to_owned()));
    /// assert!(Version::from_digits("7a").is_none());
    /// ```
    #[must_use]
    pub fn from_digits(digits: &str) -> Option<Self> {
        (!digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
            .then(|| Self(digits.to_owned()))
    }

    /// Return the digits as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The `<token> <operator> <integer>` pattern that encodes the version.
///
/// Scanning works on raw bytes, so a version file with comments in a legacy
/// 8-bit encoding is still readable as long as the marker line is ASCII.
///
/// # Examples
///
/// ```
/// use gs_packager::version::{Version, VersionMarker};
///
/// let marker = VersionMarker::new("SELF_VERSION", "<-")?;
/// let version = marker.scan(b"SELF_VERSION <- 7\n");
/// assert_eq!(version, Some(Version::new(7)));
/// # Ok::<(), gs_packager::error::ConfigurationError>(())
/// ```
#[derive(Debug, Clone)]
pub struct VersionMarker {
    token: String,
    pattern: Regex,
}

impl VersionMarker {
    /// Compile a marker from a token and an assignment operator.
    ///
    /// Both parts are matched literally and must be separated from each
    /// other, and from the number, by at least one whitespace character.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidMarker`] if the pattern cannot be
    /// compiled.
    pub fn new(token: &str, operator: &str) -> Result<Self, ConfigurationError> {
        let source = format!(
            r"{}\s+{}\s+([0-9]+)",
            regex::escape(token),
            regex::escape(operator)
        );
        Ok(Self {
            token: token.to_owned(),
            pattern: Regex::new(&source)?,
        })
    }

    /// The marker token, e.g. `SELF_VERSION`.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Find the version in `contents`.
    ///
    /// Every line is scanned and a later match replaces an earlier one, so
    /// the last matching line wins. Returns `None` when nothing matches.
    #[must_use]
    pub fn scan(&self, contents: &[u8]) -> Option<Version> {
        contents
            .split(|byte| *byte == b'\n')
            .filter_map(|line| self.pattern.captures(line)?.get(1))
            .filter_map(|digits| std::str::from_utf8(digits.as_bytes()).ok())
            .filter_map(Version::from_digits)
            .next_back()
    }
}

/// Read `path` and extract the version encoded by `marker`.
///
/// # Errors
///
/// Returns [`ConfigurationError::UnreadableVersionFile`] if the file cannot
/// be read and [`ConfigurationError::VersionNotFound`] if no line matches.
pub fn extract_version(
    path: &Utf8Path,
    marker: &VersionMarker,
) -> Result<Version, ConfigurationError> {
    let contents = fs::read(path).map_err(|source| ConfigurationError::UnreadableVersionFile {
        path: path.to_owned(),
        source,
    })?;

    marker
        .scan(&contents)
        .ok_or_else(|| ConfigurationError::VersionNotFound {
            path: path.to_owned(),
            token: marker.token().to_owned(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn marker() -> VersionMarker {
        VersionMarker::new("SELF_VERSION", "<-").expect("marker compiles")
    }

    fn version_file(dir: &TempDir, contents: &[u8]) -> Utf8PathBuf {
        let path = Utf8PathBuf::try_from(dir.path().join("version.nut")).expect("utf8 path");
        fs::write(&path, contents).expect("write version file");
        path
    }

    #[rstest]
    #[case::plain("SELF_VERSION <- 42", "42")]
    #[case::tabs("SELF_VERSION\t<-\t3", "3")]
    #[case::prefixed("const SELF_VERSION <- 12;", "12")]
    #[case::zero("SELF_VERSION <- 0", "0")]
    #[case::leading_zeros("SELF_VERSION <- 007", "007")]
    #[case::beyond_u64("SELF_VERSION <- 20240101123000000000", "20240101123000000000")]
    fn scan_captures_the_digits(
        marker: VersionMarker,
        #[case] line: &str,
        #[case] expected: &str,
    ) {
        let version = marker.scan(line.as_bytes()).expect("version found");
        assert_eq!(version.as_str(), expected);
    }

    #[rstest]
    #[case::no_whitespace("SELF_VERSION<-42")]
    #[case::wrong_operator("SELF_VERSION = 42")]
    #[case::negative("SELF_VERSION <- -1")]
    #[case::other_token("OTHER_VERSION <- 5")]
    #[case::empty("")]
    fn scan_ignores_non_matching_lines(marker: VersionMarker, #[case] line: &str) {
        assert_eq!(marker.scan(line.as_bytes()), None);
    }

    #[rstest]
    fn last_matching_line_wins(marker: VersionMarker) {
        let contents = b"SELF_VERSION <- 1\n// comment\nSELF_VERSION <- 9\n";
        assert_eq!(marker.scan(contents), Some(Version::new(9)));
    }

    #[test]
    fn marker_parts_are_matched_literally() {
        let marker = VersionMarker::new("VER.SION", "==").expect("marker compiles");
        assert_eq!(marker.scan(b"VERXSION == 4"), None);
        assert_eq!(marker.scan(b"VER.SION == 4"), Some(Version::new(4)));
    }

    #[rstest]
    #[case::empty("")]
    #[case::sign("-1")]
    #[case::letters("4a")]
    fn from_digits_rejects_non_digits(#[case] digits: &str) {
        assert!(Version::from_digits(digits).is_none());
    }

    #[rstest]
    fn extract_version_reads_file(marker: VersionMarker) {
        let dir = TempDir::new().expect("temp dir");
        let path = version_file(&dir, b"SELF_VERSION <- 42\n");

        let version = extract_version(&path, &marker).expect("version found");
        assert_eq!(version.to_string(), "42");
    }

    #[rstest]
    fn extract_version_tolerates_non_utf8_comments(marker: VersionMarker) {
        let dir = TempDir::new().expect("temp dir");
        let path = version_file(&dir, b"// Auteur: Sylvain Devid\xe9al\nSELF_VERSION <- 42\n");

        let version = extract_version(&path, &marker).expect("version found");
        assert_eq!(version.as_str(), "42");
    }

    #[rstest]
    fn extract_version_handles_crlf_line_endings(marker: VersionMarker) {
        let dir = TempDir::new().expect("temp dir");
        let path = version_file(&dir, b"// header\r\nSELF_VERSION <- 5\r\n");

        let version = extract_version(&path, &marker).expect("version found");
        assert_eq!(version.as_str(), "5");
    }

    #[rstest]
    fn extract_version_reports_missing_marker(marker: VersionMarker) {
        let dir = TempDir::new().expect("temp dir");
        let path = version_file(&dir, b"// no version here\n");

        let err = extract_version(&path, &marker).expect_err("missing marker");
        assert!(matches!(err, ConfigurationError::VersionNotFound { ref token, .. } if token == "SELF_VERSION"));
    }

    #[rstest]
    fn extract_version_reports_missing_file(marker: VersionMarker) {
        let dir = TempDir::new().expect("temp dir");
        let path = Utf8PathBuf::try_from(dir.path().join("absent.nut")).expect("utf8 path");

        let err = extract_version(&path, &marker).expect_err("missing file");
        assert!(matches!(
            err,
            ConfigurationError::UnreadableVersionFile { .. }
        ));
    }
}
