//! Command line interface for the ART bundler.
//!
//! Parses arguments, initialises logging, runs the [`Bundler`] and reports the
//! produced artifacts.

mod args;

pub use args::Args;

use crate::bundler::Bundler;
use crate::error::{CliError, Result};

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    init_logging(args.verbose);

    args.validate()
        .map_err(|reason| CliError::InvalidArguments { reason })?;
    let settings = args.into_settings()?;

    let artifacts = Bundler::new(settings).bundle().await?;
    for artifact in &artifacts {
        for path in &artifact.paths {
            println!(
                "{}: {} ({} bytes, sha256 {})",
                artifact.package_type,
                path.display(),
                artifact.size,
                artifact.checksum
            );
        }
    }
    Ok(0)
}

/// Logs to stderr at `info`, or `debug` with `--verbose`. `RUST_LOG` overrides both.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

