//! Remuxer CLI
//!
//! Keeps the streams you want from your media library's Matroska files,
//! without re-encoding.
//!
//! # Usage
//!
//! ```bash
//! remuxer mux --audio-lang jpn,eng --sub-lang eng -o out/ "Season 1/"
//! remuxer mux --subs episode01.ass episode01.mkv
//! remuxer inspect episode01.mkv
//! ```

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error};

use remuxer_cli::adapters::TracingLogAdapter;
use remuxer_cli::cli::{commands, Cli, Commands};

/// Main entry point for the remuxer CLI application
fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = TracingLogAdapter::init(&cli.log_level, cli.log_format) {
        eprintln!("error: {}", e);
        return ExitCode::FAILURE;
    }

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<bool> {
    remuxer_cli::init().context("Failed to initialize")?;
    debug!("starting remuxer {}", env!("CARGO_PKG_VERSION"));

    let config = cli.config.as_deref();
    match cli.command {
        Commands::Mux(args) => commands::mux(config, args),
        Commands::Inspect(args) => commands::inspect(config, args).map(|()| true),
    }
}
