//! CLI module for the remuxer
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::adapters::LogFormat;

pub mod args;
pub mod commands;

/// Remuxer CLI
///
/// Rewrites Matroska files keeping only the video, audio and subtitle
/// streams that match your language and content preferences.
#[derive(Parser, Debug)]
#[command(name = "remuxer")]
#[command(about = "Remuxer - trim media library files down to the streams you want")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level or filter directive (RUST_LOG takes precedence)
    #[arg(long, default_value = "info", env = "REMUXER_LOG", global = true)]
    pub log_level: String,

    /// Log line format
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    pub log_format: LogFormat,

    /// Config file (TOML, or legacy JSON by extension)
    #[arg(long, env = "REMUXER_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Remux files keeping the preferred streams
    Mux(args::MuxArgs),
    /// Show streams and the selection mux would make
    Inspect(args::InspectArgs),
}
