//! # ringside CLI entry point
//!
//! Parses arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ringside_cli::catalog::{run_catalog, CatalogArgs};
use ringside_cli::matches::{run_match, MatchArgs};
use ringside_cli::replay::{run_replay, ReplayArgs};

/// Ringside roster tools.
#[derive(Parser, Debug)]
#[command(name = "ringside", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the standard match types.
    Catalog(CatalogArgs),

    /// Offline match checks.
    Match(MatchArgs),

    /// Run a roster lifecycle script and check its expectations.
    Replay(ReplayArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Catalog(args) => run_catalog(&args),
        Commands::Match(args) => run_match(&args),
        Commands::Replay(args) => run_replay(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}
