mod commands;
mod config;
mod context;
mod error;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::commands::Commands;
use crate::error::CliError;

#[derive(Parser)]
#[command(name = "changeset-actions")]
#[command(version = env!("CHANGESET_ACTIONS_VERSION"))]
#[command(about = "Detect changed packages, comment release plans and publish changesets", long_about = None)]
struct Cli {
    /// Repository root to operate on (default: current directory)
    #[arg(long = "path", short = 'C', global = true)]
    path: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let project_root = match resolve_start_path(cli.path) {
        Ok(path) => path,
        Err(e) => {
            print_error(&e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = cli.command.execute(&project_root) {
        if !e.is_reported() {
            print_error(&e);
        }
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

/// Console logging controlled by `RUST_LOG` (default: info), on stderr so
/// stdout stays free for workflow commands.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_start_path(path: Option<PathBuf>) -> Result<PathBuf, CliError> {
    match path {
        Some(p) => Ok(p),
        None => std::env::current_dir().map_err(CliError::CurrentDir),
    }
}

fn print_error(error: &CliError) {
    eprintln!("error: {error}");

    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        eprintln!("caused by: {cause}");
        source = std::error::Error::source(cause);
    }
}
