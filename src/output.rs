//! Output formatting for the packager CLI.
//!
//! Progress and results are written to stderr so that stdout stays free for
//! scripting.

use crate::pipeline::{PackageOutcome, PackagePlan};
use std::io::Write;

/// Write one line to `stderr`, ignoring write failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort output; ignore write failures.
    }
}

/// Format the message printed after a successful run.
#[must_use]
pub fn success_message(outcome: &PackageOutcome) -> String {
    let plural = if outcome.staged_files == 1 { "file" } else { "files" };
    format!(
        "Created {} ({} {plural})",
        outcome.plan.archive_path, outcome.staged_files
    )
}

/// Format the warning printed when the staging directory survived a run.
#[must_use]
pub fn cleanup_warning(outcome: &PackageOutcome) -> Option<String> {
    outcome.cleanup_error.as_ref().map(|err| {
        format!(
            "warning: {err}; remove {} manually",
            outcome.plan.staging_dir
        )
    })
}

/// Format a resolved plan for `--dry-run`.
///
/// # Example
///
/// ```
/// use camino::Utf8PathBuf;
/// use gs_packager::naming::{PackageName, ReleaseName};
/// use gs_packager::output::dry_run_text;
/// use gs_packager::pipeline::PackagePlan;
/// use gs_packager::sources::SourceSet;
/// use gs_packager::version::Version;
///
/// let plan = PackagePlan {
///     release: ReleaseName::new(PackageName::from_product("MagicGS"), Version::new(42)),
///     staging_dir: Utf8PathBuf::from("MagicGS-v42"),
///     archive_path: Utf8PathBuf::from("MagicGS-v42.tar"),
///     sources: SourceSet {
///         files: vec![Utf8PathBuf::from("main.nut")],
///         trees: vec![Utf8PathBuf::from("lang")],
///     },
/// };
///
/// let text = dry_run_text(&plan);
/// assert!(text.contains("Dry run"));
/// assert!(text.contains("Version: 42"));
/// assert!(text.contains("main.nut"));
/// ```
#[must_use]
pub fn dry_run_text(plan: &PackagePlan) -> String {
    let mut lines = vec![
        "Dry run - no files will be modified".to_owned(),
        String::new(),
        format!("Package: {}", plan.release.package()),
        format!("Version: {}", plan.release.version()),
        format!("Staging directory: {}", plan.staging_dir),
        format!("Archive: {}", plan.archive_path),
        String::new(),
        "Files:".to_owned(),
    ];
    lines.extend(plan.sources.files.iter().map(|f| format!("  - {f}")));
    lines.push("Directories:".to_owned());
    lines.extend(plan.sources.trees.iter().map(|d| format!("  - {d}/")));
    lines.join("\n")
}
