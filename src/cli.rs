//! CLI argument definitions for the release packager.
//!
//! This module defines the command-line interface using clap. It is separated
//! from the main entrypoint to keep the binary small and focused on
//! orchestration.

use camino::Utf8PathBuf;
use clap::Parser;
use log::LevelFilter;

/// Package a game-script release into a versioned tar archive.
#[derive(Parser, Debug, Clone)]
#[command(name = "gs-package")]
#[command(version, about)]
#[command(long_about = concat!(
    "Package a game-script release into a versioned tar archive.\n\n",
    "The version is read from the SELF_VERSION marker in version.nut. All .nut ",
    "files, readme.txt, license.txt, changelog.txt and the lang directory are ",
    "copied into <product>-v<version>/, archived as <product>-v<version>.tar, ",
    "and the staging directory is removed.\n\n",
    "Settings may be overridden in packager.toml in the working directory.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Package the script in the current directory:\n",
    "    $ gs-package\n\n",
    "  Package another checkout into a dist directory:\n",
    "    $ gs-package -C ../my-script -o dist\n\n",
    "  Show the resolved version and file set without writing anything:\n",
    "    $ gs-package --dry-run",
))]
pub struct Cli {
    /// Working directory holding the version file and release inputs.
    #[arg(short = 'C', long = "dir", value_name = "DIR", default_value = ".")]
    pub work_dir: Utf8PathBuf,

    /// Directory for the staging directory and archive, relative to --dir
    /// [default: working directory].
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<Utf8PathBuf>,

    /// Configuration file, relative to --dir [default: packager.toml when
    /// present].
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<Utf8PathBuf>,

    /// Override the product name used in release names.
    #[arg(long, value_name = "NAME")]
    pub product_name: Option<String>,

    /// Override the file holding the version marker.
    #[arg(long, value_name = "FILE")]
    pub version_file: Option<Utf8PathBuf>,

    /// Show the resolved release and exit without writing anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Increase log verbosity (repeatable: -v, -vv).
    #[arg(
        short,
        long = "verbose",
        action = clap::ArgAction::Count,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Suppress progress output (errors still shown).
    #[arg(short, long, conflicts_with = "verbosity")]
    pub quiet: bool,
}

impl Cli {
    /// Log level implied by `--quiet` and `--verbose`.
    ///
    /// # Examples
    ///
    /// ```
    /// use clap::Parser;
    /// use gs_packager::cli::Cli;
    /// use log::LevelFilter;
    ///
    /// let cli = Cli::parse_from(["gs-package", "-vv"]);
    /// assert_eq!(cli.log_level(), LevelFilter::Debug);
    /// ```
    #[must_use]
    pub fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Error;
        }
        match self.verbosity {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    /// Directory receiving the outputs.
    ///
    /// A relative `--output-dir` is resolved against `--dir`, the same base
    /// used for `--config`.
    #[must_use]
    pub fn output_dir(&self) -> Utf8PathBuf {
        match &self.output_dir {
            Some(dir) => self.work_dir.join(dir),
            None => self.work_dir.clone(),
        }
    }
}
