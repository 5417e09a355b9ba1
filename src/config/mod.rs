// Configuration management for streamtune
// Handles loading/saving settings, with sensible defaults when config is missing

use crate::error::{StreamError, StreamResult};
use crate::library::HISTORY_LIMIT;
use anyhow::Result;
use dirs::{config_dir, data_dir};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub player: PlayerConfig,
    pub playback: PlaybackConfig,
    pub resolver: ResolverConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub binary: String,
    pub extra_args: Vec<String>,
    pub initial_volume: u32, // 0 to 100
    pub volume_step: i32,
    pub terminate_grace_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    pub tick_interval_ms: u64,
    pub input_poll_ms: u64,
    pub render_interval_ms: u64,
    pub shuffle: bool,
    pub repeat: bool,
    pub fallback_duration_secs: u64, // progress bar scale when a track has no duration
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub api_key: Option<String>,
    pub search_results: usize,
    pub radio_results: usize,
    pub ytdlp_binary: String,
    pub resolve_streams: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub history_limit: usize,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            binary: "mpv".to_string(),
            extra_args: Vec::new(),
            initial_volume: 70,
            volume_step: 5,
            terminate_grace_ms: 2000,
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000,
            input_poll_ms: 100,
            render_interval_ms: 500,
            shuffle: false,
            repeat: false,
            fallback_duration_secs: 300,
        }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            search_results: 1,
            radio_results: 5,
            ytdlp_binary: "yt-dlp".to_string(),
            resolve_streams: false,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("streamtune"),
            history_limit: 100,
        }
    }
}

impl PlaybackConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    pub fn input_poll(&self) -> Duration {
        Duration::from_millis(self.input_poll_ms.max(1))
    }

    pub fn render_interval(&self) -> Duration {
        Duration::from_millis(self.render_interval_ms.max(1))
    }
}

impl ResolverConfig {
    /// Config file key wins over the environment
    pub fn effective_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| std::env::var("YOUTUBE_API_KEY").ok())
            .filter(|key| !key.trim().is_empty())
    }
}

impl Config {
    /// Load from the default location, writing defaults on first run
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = fs::read_to_string(config_path)?;
            let config: Config = toml::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(config_path)?;
            Ok(config)
        }
    }

    /// Values the playback engine can't work with
    pub fn validate(&self) -> StreamResult<()> {
        if self.player.binary.trim().is_empty() {
            return Err(StreamError::Config("player.binary is empty".to_string()));
        }
        if self.player.initial_volume > 100 {
            return Err(StreamError::Config(format!(
                "player.initial_volume must be 0-100, got {}",
                self.player.initial_volume
            )));
        }
        if self.player.volume_step <= 0 {
            return Err(StreamError::Config("player.volume_step must be positive".to_string()));
        }
        if self.resolver.search_results == 0 || self.resolver.radio_results == 0 {
            return Err(StreamError::Config(
                "resolver result counts must be at least 1".to_string(),
            ));
        }
        let tick = self.playback.tick_interval_ms;
        if tick == 0 || tick % 1000 != 0 {
            // The clock credits whole seconds per tick
            return Err(StreamError::Config(format!(
                "playback.tick_interval_ms must be a positive multiple of 1000, got {}",
                tick
            )));
        }
        if self.storage.history_limit == 0 || self.storage.history_limit > HISTORY_LIMIT {
            return Err(StreamError::Config(format!(
                "storage.history_limit must be 1-{}, got {}",
                HISTORY_LIMIT, self.storage.history_limit
            )));
        }
        Ok(())
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(config_path, content)?;

        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("streamtune");

        Ok(config_dir.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.player.binary, "mpv");
        assert_eq!(config.storage.history_limit, 100);
        assert_eq!(config.resolver.radio_results, 5);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[playback]\nshuffle = true\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert!(config.playback.shuffle);
        assert_eq!(config.playback.tick_interval_ms, 1000);
        assert_eq!(config.player.volume_step, 5);
    }

    #[test]
    fn test_out_of_range_values_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[player]\ninitial_volume = 150\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("initial_volume"));
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_sub_second_tick_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        fs::write(&path, "[playback]\ntick_interval_ms = 250\n").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("tick_interval_ms"));

        fs::write(&path, "[playback]\ntick_interval_ms = 1500\n").unwrap();
        assert!(Config::load_from(&path).is_err());

        fs::write(&path, "[playback]\ntick_interval_ms = 2000\n").unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.playback.tick_interval(), Duration::from_secs(2));
    }

    #[test]
    fn test_history_limit_above_cap_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        fs::write(&path, "[storage]\nhistory_limit = 500\n").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("history_limit"));

        fs::write(&path, "[storage]\nhistory_limit = 100\n").unwrap();
        assert!(Config::load_from(&path).is_ok());
    }

    #[test]
    fn test_config_key_beats_env() {
        let resolver = ResolverConfig {
            api_key: Some("from-config".to_string()),
            ..Default::default()
        };
        assert_eq!(resolver.effective_api_key().as_deref(), Some("from-config"));
    }
}
