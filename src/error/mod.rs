//! Error handling module for the remuxer

use thiserror::Error;

/// How far an error reaches: the whole file, the file outcome only, a single
/// packet, or nothing beyond a warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Abort this file and release everything
    FatalToFile,
    /// Finish what can be finished, then report the file as failed
    RecoverableToFile,
    /// Patch or drop the packet and keep going
    RecoverableToPacket,
    /// Warning only
    Advisory,
}

/// Main error type for remux operations
#[derive(Error, Debug)]
pub enum RemuxError {
    /// Input file not found or inaccessible
    #[error("input file not found: {path}")]
    InputFileNotFound { path: String },

    /// Input file could not be opened as a container
    #[error("failed to open input file '{path}': {message}")]
    InputOpen { path: String, message: String },

    /// Input file was skipped during collection
    #[error("skipping '{path}': {reason}")]
    InputSkipped { path: String, reason: String },

    /// A required stream kind has no candidates
    #[error("no {kind} streams found")]
    MissingStreams { kind: &'static str },

    /// Output container could not be allocated or opened
    #[error("failed to allocate output context: {message}")]
    OutputAlloc { message: String },

    /// Output stream could not be created
    #[error("failed to allocate output stream: {message}")]
    StreamCreate { message: String },

    /// Output header rejected or file not writable
    #[error("failed to open output file for writing: {message}")]
    HeaderWrite { message: String },

    /// Output trailer could not be written
    #[error("failed to finalise output: {message}")]
    TrailerWrite { message: String },

    /// Output file already exists and deletion was not requested
    #[error("output file already exists: {path}")]
    OutputExists { path: String },

    /// Output folder is unusable
    #[error("output folder '{path}' is not a directory")]
    OutputFolder { path: String },

    /// A single packet was rejected by the output
    #[error("frame error: {message}")]
    PacketWrite { message: String },

    /// Configuration error
    #[error("configuration error: {message}")]
    Config { message: String },

    /// Invalid command line usage
    #[error("invalid arguments: {message}")]
    BadArgs { message: String },

    /// Batch stopped because a file failed and stop-on-first-error is set
    #[error("stopping after failure on '{path}'")]
    Aborted { path: String },

    /// FFmpeg initialization error
    #[error("failed to initialize FFmpeg: {message}")]
    FFmpegInit { message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// FFmpeg error
    #[error("FFmpeg error: {0}")]
    FFmpeg(#[from] ffmpeg_next::Error),

    /// TOML config parse error
    #[error("failed to parse TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON config parse error
    #[error("failed to parse JSON config: {0}")]
    Json(#[from] serde_json::Error),
}

impl RemuxError {
    /// Classify the error by how much work it invalidates
    pub fn severity(&self) -> Severity {
        match self {
            RemuxError::MissingStreams { .. } => Severity::RecoverableToFile,
            RemuxError::PacketWrite { .. } => Severity::RecoverableToPacket,
            RemuxError::InputSkipped { .. } => Severity::Advisory,
            _ => Severity::FatalToFile,
        }
    }
}

/// Result type alias for remux operations
pub type RemuxResult<T> = std::result::Result<T, RemuxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_classification() {
        assert_eq!(
            RemuxError::MissingStreams { kind: "audio" }.severity(),
            Severity::RecoverableToFile
        );
        assert_eq!(
            RemuxError::PacketWrite { message: "x".into() }.severity(),
            Severity::RecoverableToPacket
        );
        assert_eq!(
            RemuxError::HeaderWrite { message: "x".into() }.severity(),
            Severity::FatalToFile
        );
    }

    #[test]
    fn test_messages() {
        let err = RemuxError::MissingStreams { kind: "video" };
        assert_eq!(err.to_string(), "no video streams found");
        let err = RemuxError::OutputExists { path: "/out/a.mkv".into() };
        assert!(err.to_string().contains("/out/a.mkv"));
    }
}
