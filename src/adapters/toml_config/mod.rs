// TOML config adapter - Configuration management using TOML (or legacy JSON) files

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{RemuxError, RemuxResult};

/// Settings read from a config file. Every field is optional so a file may
/// override only what it names.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    #[serde(alias = "preferred-audio-languages")]
    pub audio_languages: Option<Vec<String>>,
    #[serde(alias = "preferred-subtitle-languages")]
    pub subtitle_languages: Option<Vec<String>>,
    #[serde(alias = "prefer-sdh-subtitles")]
    pub prefer_sdh_subtitles: Option<bool>,
    #[serde(alias = "prefer-signs-and-songs-subs")]
    pub prefer_signs_and_songs: Option<bool>,
    #[serde(alias = "prefer-text-subtitles")]
    pub prefer_text_subtitles: Option<bool>,
    #[serde(alias = "prefer-one-stream")]
    pub prefer_one_stream: Option<bool>,
    #[serde(alias = "show-progress")]
    pub show_progress: Option<bool>,
    #[serde(alias = "stop-on-first-error")]
    pub stop_on_first_error: Option<bool>,
    #[serde(alias = "delete-existing-output")]
    pub delete_existing_output: Option<bool>,
    #[serde(alias = "dry-run")]
    pub dry_run: Option<bool>,
    #[serde(alias = "output-folder")]
    pub output_folder: Option<PathBuf>,
    #[serde(alias = "extra-subs-folder")]
    pub extra_subs_folder: Option<PathBuf>,
    #[serde(alias = "subtitle-delay")]
    pub subtitle_delay: Option<f64>,
    #[serde(alias = "log-level")]
    pub log_level: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct TomlDocument {
    #[serde(default)]
    remuxer: FileConfig,
}

#[derive(Debug, Default, Deserialize)]
struct JsonDocument {
    #[serde(default)]
    options: FileConfig,
}

/// TOML configuration adapter
pub struct TomlConfigAdapter;

impl TomlConfigAdapter {
    /// Load a config file; `.json` files use the legacy `{"options": {...}}` layout
    pub fn load(path: &Path) -> RemuxResult<FileConfig> {
        let content = std::fs::read_to_string(path).map_err(|e| RemuxError::Config {
            message: format!("cannot read '{}': {}", path.display(), e),
        })?;

        let is_json = path
            .extension()
            .map(|e| e.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let config = if is_json {
            Self::parse_json(&content)?
        } else {
            Self::parse_toml(&content)?
        };
        debug!("loaded config from '{}'", path.display());
        Ok(config)
    }

    pub fn parse_toml(content: &str) -> RemuxResult<FileConfig> {
        let document: TomlDocument = toml::from_str(content)?;
        Ok(document.remuxer)
    }

    pub fn parse_json(content: &str) -> RemuxResult<FileConfig> {
        let document: JsonDocument = serde_json::from_str(content)?;
        Ok(document.options)
    }

    /// Candidate locations in search order: the user config directory, then the working directory
    pub fn default_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();
        let config_dir = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")));
        if let Some(dir) = config_dir {
            paths.push(dir.join("remuxer").join("config.toml"));
        }
        paths.extend(
            ["remuxer-config.toml", ".remuxer-config.toml", "remuxer-config.json", ".remuxer-config.json"]
                .iter()
                .map(PathBuf::from),
        );
        paths
    }

    /// First existing file among `default_paths`
    pub fn discover() -> Option<PathBuf> {
        Self::default_paths().into_iter().find(|p| p.is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_toml_section() {
        let config = TomlConfigAdapter::parse_toml(
            r#"
            [remuxer]
            audio_languages = ["jpn", "eng"]
            prefer_sdh_subtitles = true
            subtitle_delay = -1.5
            output_folder = "out"
            "#,
        )
        .unwrap();

        assert_eq!(config.audio_languages, Some(vec!["jpn".to_string(), "eng".to_string()]));
        assert_eq!(config.prefer_sdh_subtitles, Some(true));
        assert_eq!(config.subtitle_delay, Some(-1.5));
        assert_eq!(config.output_folder, Some(PathBuf::from("out")));
        assert_eq!(config.subtitle_languages, None);
    }

    #[test]
    fn test_parse_toml_without_section() {
        let config = TomlConfigAdapter::parse_toml("").unwrap();
        assert_eq!(config, FileConfig::default());
    }

    #[test]
    fn test_parse_json_legacy_keys() {
        let config = TomlConfigAdapter::parse_json(
            r#"{"options": {"preferred-subtitle-languages": ["ger"], "prefer-signs-and-songs-subs": true, "dry-run": true}}"#,
        )
        .unwrap();

        assert_eq!(config.subtitle_languages, Some(vec!["ger".to_string()]));
        assert_eq!(config.prefer_signs_and_songs, Some(true));
        assert_eq!(config.dry_run, Some(true));
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let result = TomlConfigAdapter::parse_toml("[remuxer]\nshow_progress = \"maybe\"");
        assert!(matches!(result, Err(RemuxError::Toml(_))));
    }

    #[test]
    fn test_default_paths_end_in_working_directory() {
        let paths = TomlConfigAdapter::default_paths();
        assert_eq!(paths.last(), Some(&PathBuf::from(".remuxer-config.json")));
        assert!(paths.contains(&PathBuf::from("remuxer-config.toml")));
    }

    #[test]
    fn test_load_by_extension() {
        let dir = TempDir::new().unwrap();
        let toml_path = dir.path().join("config.toml");
        std::fs::write(&toml_path, "[remuxer]\nshow_progress = false\n").unwrap();
        let json_path = dir.path().join("config.json");
        std::fs::write(&json_path, r#"{"options": {"show-progress": true}}"#).unwrap();

        assert_eq!(TomlConfigAdapter::load(&toml_path).unwrap().show_progress, Some(false));
        assert_eq!(TomlConfigAdapter::load(&json_path).unwrap().show_progress, Some(true));
        assert!(matches!(
            TomlConfigAdapter::load(&dir.path().join("missing.toml")),
            Err(RemuxError::Config { .. })
        ));
    }
}
