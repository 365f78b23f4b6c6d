// Adapters - External system implementations

pub mod fs_local;
pub mod libav;
pub mod terminal_prompt;
pub mod toml_config;
pub mod tracing_log;

// Re-export adapters
pub use fs_local::{CollectedInputs, LocalFsAdapter, OutputTarget};
pub use libav::{LibavSink, LibavSource};
pub use terminal_prompt::TerminalPrompt;
pub use toml_config::{FileConfig, TomlConfigAdapter};
pub use tracing_log::{LogFormat, TracingLogAdapter};
