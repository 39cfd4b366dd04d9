// SPDX-License-Identifier: Apache-2.0
//! # pave CLI entry point
//!
//! Parses command-line arguments, initializes tracing, and dispatches to
//! the server bootstrap. Configuration comes from the environment — see
//! `pave_api::config`.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pave_api::config::ApiConfig;

/// Pave — marketplace payment orchestration.
#[derive(Parser, Debug)]
#[command(name = "pave", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server.
    Serve,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins when set; otherwise the -v flags pick the level.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        })
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Serve => {
            let config = match ApiConfig::from_env() {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("configuration error: {e}");
                    return ExitCode::FAILURE;
                }
            };
            if let Err(e) = pave_api::bootstrap::serve(config).await {
                eprintln!("server error: {e:#}");
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
    }
}
