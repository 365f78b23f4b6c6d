//! Remuxer Library
//!
//! Rewrites Matroska files without re-encoding, keeping only the video,
//! audio and subtitle streams that match language and content preferences,
//! optionally merging subtitles from a second file.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod engine;
pub mod error;
pub mod ports;
pub mod streams;
pub mod utils;

// Re-export commonly used types
pub use domain::model::{MediaKind, SourceId, StreamInfo, StreamRef, Timebase};
pub use engine::{remux, ProgressReporter, RemuxOptions, RemuxStats};
pub use error::{RemuxError, RemuxResult, Severity};
pub use streams::{DualSourceCoordinator, OutputStreamMap, Selection, SelectionPolicy};

/// Initialize the remuxer library
pub fn init() -> RemuxResult<()> {
    ffmpeg_next::init().map_err(|e| RemuxError::FFmpegInit {
        message: e.to_string(),
    })?;
    ffmpeg_next::util::log::set_level(ffmpeg_next::util::log::Level::Error);

    Ok(())
}
