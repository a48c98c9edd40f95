//! Configuration management for vidlist
//!
//! This module handles loading and managing application configuration
//! from config files and environment variables.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::utils::error::{IntoPlayerError, PlayerError, Result};

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Playback engine configuration
    pub engine: EngineConfig,

    /// Playback defaults
    pub playback: PlaybackConfig,

    /// Media file discovery
    pub library: LibraryConfig,

    /// General application settings
    pub general: GeneralConfig,
}

/// Playback engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Path or name of the mpv executable
    pub mpv_path: String,

    /// Extra arguments passed to mpv verbatim
    pub extra_args: Vec<String>,

    /// How long to wait for the IPC socket to appear
    pub connect_timeout_ms: u64,

    /// Start the video window fullscreen
    pub fullscreen: bool,
}

/// Playback defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Initial volume in percent (0 - 100)
    pub volume: u8,

    /// Start with shuffle enabled
    pub shuffle: bool,

    /// Start playing as soon as files are queued at startup
    pub autoplay: bool,
}

/// Media file discovery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Accepted file extensions, without the dot
    pub extensions: Vec<String>,
}

/// General application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            mpv_path: "mpv".to_string(),
            extra_args: Vec::new(),
            connect_timeout_ms: 3000,
            fullscreen: false,
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            volume: 50,
            shuffle: false,
            autoplay: false,
        }
    }
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            extensions: ["mp4", "avi", "mkv", "mov", "wmv", "flv", "webm"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from various sources
    ///
    /// Configuration is loaded in the following order (later sources override earlier):
    /// 1. Default values
    /// 2. System config file (/etc/vidlist/config.toml on Linux)
    /// 3. User config file (~/.config/vidlist/config.toml on Linux)
    /// 4. Environment variables (VIDLIST_* prefix)
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        if let Some(system_path) = Self::system_config_path() {
            if system_path.exists() {
                config = Self::read_file(&system_path)?;
            }
        }

        if let Some(user_path) = Self::user_config_path() {
            if user_path.exists() {
                config = Self::read_file(&user_path)?;
            }
        }

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from one explicit file, then apply environment overrides
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = Self::read_file(path)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to user config file
    pub fn save(&self) -> Result<()> {
        let path = Self::user_config_path()
            .ok_or_else(|| PlayerError::Config("Cannot determine user config path".to_string()))?;
        self.save_to(&path)
    }

    /// Save configuration to the given path, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .config_err("Failed to create config directory")?;
        }

        let toml = toml::to_string_pretty(self)
            .config_err("Failed to serialize config")?;

        std::fs::write(path, toml)
            .config_err("Failed to write config file")?;

        Ok(())
    }

    /// Parse a TOML file; sections missing from the file keep their defaults
    fn read_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .config_err("Failed to read config file")?;

        toml::from_str(&contents)
            .config_err("Failed to parse config file")
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(mpv_path) = std::env::var("VIDLIST_MPV_PATH") {
            self.engine.mpv_path = mpv_path;
        }

        if let Ok(volume) = std::env::var("VIDLIST_VOLUME") {
            self.playback.volume = volume.parse()
                .map_err(|_| PlayerError::Config("Invalid VIDLIST_VOLUME".to_string()))?;
        }

        if let Ok(shuffle) = std::env::var("VIDLIST_SHUFFLE") {
            self.playback.shuffle = shuffle.parse()
                .map_err(|_| PlayerError::Config("Invalid VIDLIST_SHUFFLE".to_string()))?;
        }

        if let Ok(log_level) = std::env::var("VIDLIST_LOG_LEVEL") {
            self.general.log_level = log_level;
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.playback.volume > 100 {
            return Err(PlayerError::Config("Volume must be between 0 and 100".to_string()));
        }

        if self.engine.mpv_path.trim().is_empty() {
            return Err(PlayerError::Config("mpv path must not be empty".to_string()));
        }

        if self.engine.connect_timeout_ms == 0 {
            return Err(PlayerError::Config("Connect timeout must be non-zero".to_string()));
        }

        if self.library.extensions.is_empty() {
            return Err(PlayerError::Config("At least one media extension is required".to_string()));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.general.log_level.as_str()) {
            return Err(PlayerError::Config(format!(
                "Invalid log level '{}', must be one of: {:?}",
                self.general.log_level,
                valid_log_levels
            )));
        }

        Ok(())
    }

    /// Get system config file path
    fn system_config_path() -> Option<PathBuf> {
        #[cfg(target_os = "linux")]
        return Some(PathBuf::from("/etc/vidlist/config.toml"));

        #[cfg(target_os = "windows")]
        return std::env::var("PROGRAMDATA").ok()
            .map(|p| PathBuf::from(p).join("Vidlist").join("config.toml"));

        #[cfg(target_os = "macos")]
        return Some(PathBuf::from("/Library/Application Support/Vidlist/config.toml"));

        #[allow(unreachable_code)]
        None
    }

    /// Get user config file path
    pub fn user_config_path() -> Option<PathBuf> {
        #[cfg(target_os = "linux")]
        return dirs::config_dir()
            .map(|p| p.join("vidlist").join("config.toml"));

        #[cfg(any(target_os = "windows", target_os = "macos"))]
        return dirs::config_dir()
            .map(|p| p.join("Vidlist").join("config.toml"));

        #[allow(unreachable_code)]
        None
    }
}
