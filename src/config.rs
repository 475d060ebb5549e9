//! Application configuration stored as TOML
//!
//! Looked up at `$JOYMIDI_CONFIG` or `<config dir>/joymidi/config.toml`. A
//! file with the defaults is written on first start so users have something
//! to edit.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::controller::CollectorSettings;

const CONFIG_DIR: &str = "joymidi";
const CONFIG_FILE: &str = "config.toml";
pub const CONFIG_ENV: &str = "JOYMIDI_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No configuration directory available on this platform")]
    NoConfigDir,

    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub midi: MidiConfig,
    pub input: InputConfig,
    pub logging: LoggingConfig,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct MidiConfig {
    /// Client name announced to the MIDI system
    pub client_name: String,

    /// Case-insensitive fragment of the output port name. Unset means the
    /// port is picked interactively at startup.
    pub output_port: Option<String>,
}

impl Default for MidiConfig {
    fn default() -> Self {
        Self {
            client_name: "joymidi".to_string(),
            output_port: None,
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    /// Longest wait for input before the loop checks for Ctrl-C
    pub poll_interval_ms: u64,

    /// Stick deadzone as a fraction (0.0-1.0), 0.0 passes raw values
    pub joystick_deadzone: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 100,
            joystick_deadzone: 0.0,
        }
    }
}

impl From<&InputConfig> for CollectorSettings {
    fn from(input: &InputConfig) -> Self {
        Self {
            poll_interval_ms: input.poll_interval_ms,
            joystick_deadzone: input.joystick_deadzone.clamp(0.0, 0.99),
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Parsed level, falling back to INFO on unknown names
    pub fn tracing_level(&self) -> tracing::Level {
        self.level.parse().unwrap_or(tracing::Level::INFO)
    }
}

/// Result of [`Config::load_or_create`]
#[derive(Clone, Debug, PartialEq)]
pub struct LoadedConfig {
    pub config: Config,

    /// The file did not exist and was just written with the defaults
    pub created: bool,
}

impl Config {
    /// `$JOYMIDI_CONFIG` if set, otherwise the platform config directory
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Ok(PathBuf::from(path));
        }
        let mut path = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        path.push(CONFIG_DIR);
        path.push(CONFIG_FILE);
        Ok(path)
    }

    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub async fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source: std::io::Error| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }
        let content = toml::to_string_pretty(self)?;
        tokio::fs::write(path, content).await.map_err(io_err)?;
        Ok(())
    }

    /// Loads `path`, writing and returning the defaults if it does not exist yet.
    ///
    /// Called before the subscriber is installed; callers report `created`.
    pub async fn load_or_create(path: &Path) -> Result<LoadedConfig, ConfigError> {
        let exists = tokio::fs::try_exists(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        if exists {
            let config = Self::load(path).await?;
            return Ok(LoadedConfig {
                config,
                created: false,
            });
        }

        let config = Self::default();
        config.save(path).await?;
        Ok(LoadedConfig {
            config,
            created: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);

        let loaded = Config::load_or_create(&path).await.unwrap();
        assert!(loaded.created);
        assert_eq!(loaded.config, Config::default());
        assert!(path.exists());

        let reloaded = Config::load(&path).await.unwrap();
        assert_eq!(reloaded, loaded.config);
    }

    #[tokio::test]
    async fn existing_file_is_not_reported_as_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);

        assert!(Config::load_or_create(&path).await.unwrap().created);
        let second = Config::load_or_create(&path).await.unwrap();
        assert!(!second.created);
        assert_eq!(second.config, Config::default());
    }

    #[tokio::test]
    async fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        tokio::fs::write(&path, "[midi]\noutput_port = \"loopMIDI\"\n")
            .await
            .unwrap();

        let LoadedConfig { config, created } = Config::load_or_create(&path).await.unwrap();
        assert!(!created);
        assert_eq!(config.midi.output_port.as_deref(), Some("loopMIDI"));
        assert_eq!(config.midi.client_name, "joymidi");
        assert_eq!(config.input.poll_interval_ms, 100);
        assert_eq!(config.logging.level, "info");
    }

    #[tokio::test]
    async fn invalid_toml_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        tokio::fs::write(&path, "[input]\npoll_interval_ms = \"soon\"\n")
            .await
            .unwrap();

        let err = Config::load(&path).await.unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn logging_level_falls_back_to_info() {
        let logging = LoggingConfig {
            level: "debug".to_string(),
        };
        assert_eq!(logging.tracing_level(), tracing::Level::DEBUG);

        let logging = LoggingConfig {
            level: "chatty".to_string(),
        };
        assert_eq!(logging.tracing_level(), tracing::Level::INFO);
    }

    #[test]
    fn deadzone_is_clamped_for_collector() {
        let input = InputConfig {
            poll_interval_ms: 20,
            joystick_deadzone: 2.0,
        };
        let settings = CollectorSettings::from(&input);
        assert_eq!(settings.poll_interval_ms, 20);
        assert_eq!(settings.joystick_deadzone, 0.99);
    }
}
