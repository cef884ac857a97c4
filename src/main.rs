//! `gs-package` CLI entrypoint.
//!
//! This binary packages the game script in the working directory into a
//! versioned tar archive and reports the result on stderr.

use clap::Parser;
use gs_packager::cli::Cli;
use gs_packager::config::PackagerConfig;
use gs_packager::error::Result;
use gs_packager::filesystem::{HostFs, PackageFs};
use gs_packager::output::{cleanup_warning, dry_run_text, success_message, write_stderr_line};
use gs_packager::pipeline::{PackageContext, package, plan};
use std::io::Write;

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &HostFs, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

/// Install `env_logger` at the CLI-selected level; `RUST_LOG` takes
/// precedence when set.
fn init_logging(cli: &Cli) {
    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .format_timestamp(None)
        .parse_default_env()
        .init();
}

fn run(cli: &Cli, fs: &dyn PackageFs, stderr: &mut dyn Write) -> Result<()> {
    let config = PackagerConfig::load(&cli.work_dir, cli.config.as_deref())?
        .with_overrides(cli.product_name.clone(), cli.version_file.clone());
    let output_dir = cli.output_dir();
    let context = PackageContext {
        work_dir: &cli.work_dir,
        output_dir: &output_dir,
        config: &config,
    };

    if cli.dry_run {
        let plan = plan(&context)?;
        write_stderr_line(stderr, dry_run_text(&plan));
        return Ok(());
    }

    let outcome = package(&context, fs)?;
    if let Some(warning) = cleanup_warning(&outcome) {
        write_stderr_line(stderr, warning);
    }
    if !cli.quiet {
        write_stderr_line(stderr, success_message(&outcome));
    }
    Ok(())
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, format!("error: {err}"));
            // Each variant already prints its inner error, so start below it.
            let mut source = std::error::Error::source(&err).and_then(|inner| inner.source());
            while let Some(cause) = source {
                write_stderr_line(stderr, format!("  caused by: {cause}"));
                source = cause.source();
            }
            1
        }
    }
}
