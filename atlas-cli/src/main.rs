use std::path::PathBuf;

use atlas_core::error::{AtlasError, ConfigError, StateError};
use clap::Parser;

mod commands;

#[derive(Parser, Debug)]
#[command(
    name = "atlas",
    version,
    about = "Track an incremental architecture survey of a repository"
)]
struct Cli {
    #[command(subcommand)]
    command: commands::Command,

    /// Repository root holding the survey (default: current directory)
    #[arg(short = 'C', long, default_value = ".", global = true)]
    dir: PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,
}

/// Classify an error into an exit code.
///
///   0  success
///   1  general error or rejected input
///   2  configuration error
///   3  survey not initialized
///   4  state document corrupted with no usable backup
fn classify_exit_code(err: &anyhow::Error) -> i32 {
    for cause in err.chain() {
        let state = cause
            .downcast_ref::<AtlasError>()
            .and_then(|e| match e {
                AtlasError::State(s) => Some(s),
                _ => None,
            })
            .or_else(|| cause.downcast_ref::<StateError>());
        match state {
            Some(StateError::NotInitialized(_)) => return 3,
            Some(StateError::Corrupted { .. }) => return 4,
            _ => {}
        }

        let is_config = matches!(cause.downcast_ref::<AtlasError>(), Some(AtlasError::Config(_)))
            || cause.downcast_ref::<ConfigError>().is_some();
        if is_config {
            return 2;
        }
    }
    1
}

fn main() {
    let cli = Cli::parse();

    let filter = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (_, 0) => "warn",
        (_, 1) => "info",
        (_, 2) => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();

    match commands::run(cli.command, &cli.dir) {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(classify_exit_code(&e));
        }
    }
}
