use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::platform;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Root of the narration assets; tracks live at
    /// `{audio_dir}/{lang}/{station_id}.mp3`.
    #[serde(default = "default_audio_dir")]
    pub audio_dir: PathBuf,
    /// Station catalog file. Falls back to the built-in catalog when absent.
    #[serde(default = "default_stations_file")]
    pub stations_file: PathBuf,
    /// Persisted preferences (theme, font size, auto-advance, visited set).
    #[serde(default = "default_prefs_file")]
    pub prefs_file: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Speed multipliers cycled by the speed control, in order.
    #[serde(default = "default_speeds")]
    pub speeds: Vec<f32>,
    /// Seek step for the rewind/forward controls.
    #[serde(default = "default_seek_step_secs")]
    pub seek_step_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Ring the terminal bell on control interactions.
    #[serde(default = "default_terminal_bell")]
    pub terminal_bell: bool,
    /// Override language auto-detection with a fixed code (`pl`, `en`, …).
    #[serde(default)]
    pub language: Option<String>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            audio_dir: default_audio_dir(),
            stations_file: default_stations_file(),
            prefs_file: default_prefs_file(),
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            speeds: default_speeds(),
            seek_step_secs: default_seek_step_secs(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            terminal_bell: default_terminal_bell(),
            language: None,
        }
    }
}

fn default_audio_dir() -> PathBuf {
    PathBuf::from("audio")
}

fn default_stations_file() -> PathBuf {
    platform::config_dir().join("stations.toml")
}

fn default_prefs_file() -> PathBuf {
    platform::data_dir().join("prefs.json")
}

fn default_speeds() -> Vec<f32> {
    vec![1.0, 1.25, 1.5]
}

fn default_seek_step_secs() -> u64 {
    10
}

fn default_terminal_bell() -> bool {
    true
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.playback.speeds, vec![1.0, 1.25, 1.5]);
        assert_eq!(config.playback.seek_step_secs, 10);
        assert!(config.ui.terminal_bell);
        assert!(config.ui.language.is_none());
        assert_eq!(config.paths.audio_dir, PathBuf::from("audio"));
        assert!(config.paths.stations_file.ends_with("audiotour/stations.toml"));
    }

    #[test]
    fn partial_file_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [playback]
            speeds = [1.0, 2.0]
            "#,
        )
        .unwrap();
        assert_eq!(config.playback.speeds, vec![1.0, 2.0]);
        assert_eq!(config.playback.seek_step_secs, 10);
        assert!(config.ui.terminal_bell);
    }

    #[test]
    fn malformed_file_is_an_error() {
        assert!(toml::from_str::<Config>("playback = \"fast\"").is_err());
    }
}
