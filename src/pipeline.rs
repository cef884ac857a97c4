//! Packaging pipeline orchestration.
//!
//! A run is strictly sequential: read the version, compute names, resolve
//! inputs, create the staging directory, copy files and trees, write the
//! archive, and remove the staging directory. Each step blocks until it
//! completes and the first fatal error aborts the run.

use crate::config::PackagerConfig;
use crate::error::{CleanupError, Result};
use crate::filesystem::PackageFs;
use crate::naming::ReleaseName;
use crate::sources::SourceSet;
use crate::stager::Stager;
use crate::version::extract_version;
use camino::{Utf8Path, Utf8PathBuf};

/// Where a packaging run reads its inputs and writes its outputs.
#[derive(Debug, Clone, Copy)]
pub struct PackageContext<'a> {
    /// Directory against which the version file and inputs are resolved.
    pub work_dir: &'a Utf8Path,
    /// Directory receiving the staging directory and the archive.
    pub output_dir: &'a Utf8Path,
    /// Settings for the run.
    pub config: &'a PackagerConfig,
}

/// Everything a run will do, resolved before the filesystem is touched.
#[derive(Debug, Clone)]
pub struct PackagePlan {
    /// Versioned release name.
    pub release: ReleaseName,
    /// Staging directory path.
    pub staging_dir: Utf8PathBuf,
    /// Archive path.
    pub archive_path: Utf8PathBuf,
    /// Inputs to copy.
    pub sources: SourceSet,
}

/// Result of a completed run.
#[derive(Debug)]
pub struct PackageOutcome {
    /// The plan that was executed.
    pub plan: PackagePlan,
    /// Number of files copied into the staging directory.
    pub staged_files: usize,
    /// Set when the staging directory could not be removed. The archive is
    /// still valid.
    pub cleanup_error: Option<CleanupError>,
}

/// Resolve the version, names, and inputs for a run.
///
/// # Errors
///
/// Returns a configuration error if the version cannot be found and a
/// staging error if an input is missing.
pub fn plan(context: &PackageContext<'_>) -> Result<PackagePlan> {
    let config = context.config;
    let marker = config.marker()?;
    let version_path = context.work_dir.join(&config.version_file);
    let version = extract_version(&version_path, &marker)?;
    log::info!(
        "found {} version {version} in {version_path}",
        config.product_name
    );

    let release = ReleaseName::new(config.package_name(), version);
    let sources = SourceSet::resolve(context.work_dir, config)?;
    if sources.is_empty() {
        log::warn!("{release} has no inputs; the archive will hold an empty directory");
    }

    Ok(PackagePlan {
        staging_dir: Stager::new(context.output_dir, &release)
            .staging_path()
            .to_owned(),
        archive_path: context.output_dir.join(release.archive_filename()),
        release,
        sources,
    })
}

/// Run the full packaging pipeline.
///
/// # Errors
///
/// Returns the first configuration, staging, or packaging error. A failure
/// to remove the staging directory afterwards is not an error; it is logged
/// and reported in [`PackageOutcome::cleanup_error`].
pub fn package(context: &PackageContext<'_>, fs: &dyn PackageFs) -> Result<PackageOutcome> {
    let plan = plan(context)?;
    execute(plan, fs)
}

/// Stage, archive, and clean up according to an existing plan.
///
/// # Errors
///
/// Returns the first staging or packaging error.
pub fn execute(plan: PackagePlan, fs: &dyn PackageFs) -> Result<PackageOutcome> {
    let stager = Stager::at(plan.staging_dir.clone());

    log::info!("staging {} in {}", plan.release, plan.staging_dir);
    stager.prepare(fs)?;
    let staged_files = stager.stage_all(fs, &plan.sources)?;

    log::info!("writing {}", plan.archive_path);
    fs.create_archive(&plan.staging_dir, &plan.archive_path)?;

    let cleanup_error = fs.remove_tree(&plan.staging_dir).err();
    if let Some(err) = &cleanup_error {
        log::warn!("{err}; archive {} is complete", plan.archive_path);
    }

    Ok(PackageOutcome {
        plan,
        staged_files,
        cleanup_error,
    })
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
