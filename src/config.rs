//! Configuration management for notify-me.
//!
//! Loads config from YAML files in standard locations. Every field has a
//! default, so an absent or partial file is fine.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const DEFAULT_SOUND_URL: &str =
    "https://raw.githubusercontent.com/mamad-1999/notify-me/refs/heads/master/alarm.wav";
const SOUND_DIR: &str = ".notify-me";
const SOUND_FILE_NAME: &str = "alarm.wav";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SoundConfig {
    pub url: String,
    /// Where the downloaded sound is cached. Defaults to ~/.notify-me/alarm.wav.
    pub path: Option<PathBuf>,
    pub timeout_secs: u64,
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SOUND_URL.into(),
            path: None,
            timeout_secs: 60,
        }
    }
}

impl SoundConfig {
    /// Configured path, or the default under the home directory.
    pub fn resolve_path(&self) -> Option<PathBuf> {
        match &self.path {
            Some(path) => Some(expand_home(path)),
            None => dirs::home_dir().map(|h| h.join(SOUND_DIR).join(SOUND_FILE_NAME)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationBackend {
    /// Shell out to `notify-send` (or the configured command).
    Command,
    /// Talk to the notification daemon over D-Bus.
    Dbus,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub backend: NotificationBackend,
    pub command: String,
    pub title: String,
    pub icon: String,
    pub timeout_ms: u32,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            backend: NotificationBackend::Command,
            command: "notify-send".into(),
            title: "Alarm".into(),
            icon: "alarm-clock".into(),
            timeout_ms: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackBackend {
    /// Shell out to `aplay` (or the configured command).
    Command,
    /// Decode and play in-process.
    Rodio,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    pub backend: PlaybackBackend,
    pub command: String,
    pub volume: f32,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            backend: PlaybackBackend::Command,
            command: "aplay".into(),
            volume: 1.0,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sound: SoundConfig,
    pub notification: NotificationConfig,
    pub playback: PlaybackConfig,
}

impl Config {
    /// Load configuration from YAML file.
    ///
    /// Searches standard locations if no path is provided:
    /// 1. ./notify-me.yaml
    /// 2. ~/.config/notify-me/config.yaml
    /// 3. /etc/notify-me/config.yaml
    pub fn load(path: Option<&Path>) -> Self {
        let resolved = path.map(PathBuf::from).or_else(|| {
            search_paths(std::env::current_dir().ok(), dirs::home_dir())
                .into_iter()
                .find(|p| p.exists())
        });

        let Some(config_path) = resolved else {
            info!("No config file found, using defaults");
            return Self::default();
        };

        match std::fs::read_to_string(&config_path) {
            Ok(contents) => match Self::from_yaml(&contents) {
                Ok(config) => {
                    info!("Loaded config from {}", config_path.display());
                    config
                }
                Err(e) => {
                    warn!("Failed to parse {}: {e}, using defaults", config_path.display());
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read {}: {e}, using defaults", config_path.display());
                Self::default()
            }
        }
    }

    pub fn from_yaml(contents: &str) -> Result<Self, serde_yml::Error> {
        serde_yml::from_str(contents)
    }
}

/// Config locations in lookup order, first existing one wins.
fn search_paths(cwd: Option<PathBuf>, home: Option<PathBuf>) -> Vec<PathBuf> {
    [
        cwd.map(|d| d.join("notify-me.yaml")),
        home.map(|h| h.join(".config/notify-me/config.yaml")),
        Some(PathBuf::from("/etc/notify-me/config.yaml")),
    ]
    .into_iter()
    .flatten()
    .collect()
}

fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => dirs::home_dir().map_or_else(|| path.to_path_buf(), |h| h.join(rest)),
        Err(_) => path.to_path_buf(),
    }
}
