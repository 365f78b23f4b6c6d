//! Configuration initialization and hierarchy management

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::adapters::{FileConfig, TomlConfigAdapter};
use crate::cli::args::{MuxArgs, SelectionArgs};
use crate::domain::rules::{normalize_languages, StreamFilter};
use crate::error::RemuxResult;
use crate::streams::SelectionPolicy;

/// Effective settings for a mux run
#[derive(Debug, Clone)]
pub struct MuxConfig {
    pub audio_languages: Vec<String>,
    pub subtitle_languages: Vec<String>,
    pub prefer_sdh_subtitles: bool,
    pub prefer_signs_and_songs: bool,
    pub prefer_text_subtitles: bool,
    pub prefer_one_stream: bool,
    pub show_progress: bool,
    pub stop_on_first_error: bool,
    pub delete_existing_output: bool,
    pub dry_run: bool,
    pub output_folder: Option<PathBuf>,
    pub extra_subs_folder: Option<PathBuf>,
    /// Explicit subtitle source; only set from the command line
    pub manual_subs: Option<PathBuf>,
    /// Seconds
    pub subtitle_delay: f64,
}

impl Default for MuxConfig {
    fn default() -> Self {
        Self {
            audio_languages: vec!["eng".to_string()],
            subtitle_languages: vec!["eng".to_string()],
            prefer_sdh_subtitles: false,
            prefer_signs_and_songs: false,
            prefer_text_subtitles: true,
            prefer_one_stream: true,
            show_progress: true,
            stop_on_first_error: false,
            delete_existing_output: false,
            dry_run: false,
            output_folder: None,
            extra_subs_folder: None,
            manual_subs: None,
            subtitle_delay: 0.0,
        }
    }
}

impl MuxConfig {
    /// Overlay settings named in a config file
    pub fn apply_file(&mut self, file: &FileConfig) {
        if let Some(langs) = &file.audio_languages {
            self.audio_languages = normalize_languages(langs, "audio_languages");
        }
        if let Some(langs) = &file.subtitle_languages {
            self.subtitle_languages = normalize_languages(langs, "subtitle_languages");
        }

        let flags = [
            (file.prefer_sdh_subtitles, &mut self.prefer_sdh_subtitles),
            (file.prefer_signs_and_songs, &mut self.prefer_signs_and_songs),
            (file.prefer_text_subtitles, &mut self.prefer_text_subtitles),
            (file.prefer_one_stream, &mut self.prefer_one_stream),
            (file.show_progress, &mut self.show_progress),
            (file.stop_on_first_error, &mut self.stop_on_first_error),
            (file.delete_existing_output, &mut self.delete_existing_output),
            (file.dry_run, &mut self.dry_run),
        ];
        for (value, slot) in flags {
            if let Some(value) = value {
                *slot = value;
            }
        }

        if file.output_folder.is_some() {
            self.output_folder = file.output_folder.clone();
        }
        if file.extra_subs_folder.is_some() {
            self.extra_subs_folder = file.extra_subs_folder.clone();
        }
        if let Some(delay) = file.subtitle_delay {
            self.subtitle_delay = delay;
        }
    }

    /// Overlay stream preference flags from the command line (or their env vars)
    pub fn apply_selection_args(&mut self, args: &SelectionArgs) {
        if !args.audio_languages.is_empty() {
            self.audio_languages = normalize_languages(&args.audio_languages, "--audio-lang");
        }
        if !args.subtitle_languages.is_empty() {
            self.subtitle_languages = normalize_languages(&args.subtitle_languages, "--sub-lang");
        }
        if args.sdh {
            self.prefer_sdh_subtitles = true;
        }
        if args.signs {
            self.prefer_signs_and_songs = true;
        }
        if args.image_subs {
            self.prefer_text_subtitles = false;
        }
        if args.all_streams {
            self.prefer_one_stream = false;
        }
    }

    /// Overlay everything the mux command accepts
    pub fn apply_mux_args(&mut self, args: &MuxArgs) {
        self.apply_selection_args(&args.selection);

        if args.output_folder.is_some() {
            self.output_folder = args.output_folder.clone();
        }
        if args.extra_subs.is_some() {
            self.extra_subs_folder = args.extra_subs.clone();
        }
        if args.subs.is_some() {
            self.manual_subs = args.subs.clone();
        }
        if let Some(delay) = args.subtitle_delay {
            self.subtitle_delay = delay;
        }
        if args.no_progress {
            self.show_progress = false;
        }
        if args.stop_on_error {
            self.stop_on_first_error = true;
        }
        if args.delete_existing {
            self.delete_existing_output = true;
        }
        if args.dry_run {
            self.dry_run = true;
        }
    }

    pub fn selection_policy(&self) -> SelectionPolicy {
        SelectionPolicy {
            audio_languages: self.audio_languages.clone(),
            subtitle_languages: self.subtitle_languages.clone(),
            filter: StreamFilter {
                prefer_sdh: self.prefer_sdh_subtitles,
                prefer_signs_and_songs: self.prefer_signs_and_songs,
                prefer_text: self.prefer_text_subtitles,
            },
            one_stream: self.prefer_one_stream,
        }
    }
}

/// Read the config file: `explicit` must load, a discovered default may be absent
pub fn load_file_config(explicit: Option<&Path>) -> RemuxResult<FileConfig> {
    if let Some(path) = explicit {
        info!("loading configuration from '{}'", path.display());
        return TomlConfigAdapter::load(path);
    }

    match TomlConfigAdapter::discover() {
        Some(path) => {
            info!("loading configuration from '{}'", path.display());
            TomlConfigAdapter::load(&path)
        }
        None => {
            debug!("no config file found; using defaults");
            Ok(FileConfig::default())
        }
    }
}

/// Build the mux configuration following precedence: CLI > Env > File > Defaults.
/// Environment values reach us through clap's `env` attributes on the arguments.
pub fn initialize_mux_config(config_path: Option<&Path>, args: &MuxArgs) -> RemuxResult<MuxConfig> {
    let file = load_file_config(config_path)?;
    let mut config = MuxConfig::default();
    config.apply_file(&file);
    config.apply_mux_args(args);
    debug!("effective configuration: {:?}", config);
    Ok(config)
}

/// Selection settings for inspect, which never prompts
pub fn initialize_inspect_policy(config_path: Option<&Path>, args: &SelectionArgs) -> RemuxResult<SelectionPolicy> {
    let file = load_file_config(config_path)?;
    let mut config = MuxConfig::default();
    config.apply_file(&file);
    config.apply_selection_args(args);
    config.prefer_one_stream = false;
    Ok(config.selection_policy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    use crate::cli::{Cli, Commands};

    fn mux_args(argv: &[&str]) -> MuxArgs {
        let mut full = vec!["remuxer", "mux"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).unwrap().command {
            Commands::Mux(args) => args,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_defaults() {
        let config = MuxConfig::default();
        let policy = config.selection_policy();
        assert_eq!(policy.audio_languages, vec!["eng"]);
        assert!(policy.filter.prefer_text);
        assert!(policy.one_stream);
        assert!(config.show_progress);
        assert_eq!(config.subtitle_delay, 0.0);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let file = TomlConfigAdapter::parse_toml(
            "[remuxer]\naudio_languages = [\"jpn\", \"english\"]\nprefer_one_stream = false\nsubtitle_delay = 2.0\n",
        )
        .unwrap();
        let mut config = MuxConfig::default();
        config.apply_file(&file);

        assert_eq!(config.audio_languages, vec!["jpn"]);
        assert_eq!(config.subtitle_languages, vec!["eng"]);
        assert!(!config.prefer_one_stream);
        assert_eq!(config.subtitle_delay, 2.0);
    }

    #[test]
    fn test_cli_overrides_file() {
        let file = TomlConfigAdapter::parse_toml(
            "[remuxer]\naudio_languages = [\"jpn\"]\nsubtitle_delay = 2.0\noutput_folder = \"from-file\"\n",
        )
        .unwrap();
        let args = mux_args(&[
            "in.mkv",
            "--audio-lang",
            "ger",
            "--subtitle-delay",
            "-1",
            "--output-folder",
            "from-cli",
            "--image-subs",
            "--no-progress",
        ]);

        let mut config = MuxConfig::default();
        config.apply_file(&file);
        config.apply_mux_args(&args);

        assert_eq!(config.audio_languages, vec!["ger"]);
        assert_eq!(config.subtitle_delay, -1.0);
        assert_eq!(config.output_folder, Some(PathBuf::from("from-cli")));
        assert!(!config.prefer_text_subtitles);
        assert!(!config.show_progress);
    }

    #[test]
    fn test_absent_flags_keep_file_values() {
        let file = TomlConfigAdapter::parse_toml("[remuxer]\ndry_run = true\nshow_progress = false\n").unwrap();
        let args = mux_args(&["in.mkv"]);

        let mut config = MuxConfig::default();
        config.apply_file(&file);
        config.apply_mux_args(&args);

        assert!(config.dry_run);
        assert!(!config.show_progress);
    }
}
