//! Configuration file handling for digit-pad.
//!
//! Loads configuration from `~/.config/digit-pad/config.toml` or a custom path.
//! The API environment is resolved once here and handed to the client; nothing
//! else reads it.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::surface::{SurfaceOptions, DEFAULT_SURFACE_SIZE};

/// Environment variable that overrides `api.environment`.
pub const ENVIRONMENT_ENV: &str = "DIGIT_PAD_ENV";

/// Development backend.
pub const LOCAL_API_URL: &str = "http://localhost:8000";

/// Hosted backend.
pub const DEPLOYED_API_URL: &str = "https://handmade-mnist-backend.onrender.com";

/// Configuration file structure for digit-pad.
/// Loaded from ~/.config/digit-pad/config.toml (or custom path via --config).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub surface: SurfaceConfig,
    #[serde(default)]
    pub preview: PreviewConfig,
}

/// Which backend to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Local,
    Deployed,
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(Environment::Local),
            "deployed" => Ok(Environment::Deployed),
            other => Err(ConfigError::InvalidEnvironment(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default = "default_local_url")]
    pub local_url: String,
    #[serde(default = "default_deployed_url")]
    pub deployed_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            local_url: default_local_url(),
            deployed_url: default_deployed_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiConfig {
    /// Base URL for the selected environment.
    pub fn base_url(&self) -> &str {
        match self.environment {
            Environment::Local => &self.local_url,
            Environment::Deployed => &self.deployed_url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SurfaceConfig {
    #[serde(default = "default_surface_size")]
    pub size: u32,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            size: default_surface_size(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl SurfaceConfig {
    pub fn options(&self) -> SurfaceOptions {
        SurfaceOptions::default()
            .with_size(self.size)
            .with_debounce(Duration::from_millis(self.debounce_ms))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PreviewConfig {
    #[serde(default = "default_display_size")]
    pub display_size: u32,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            display_size: default_display_size(),
        }
    }
}

fn default_local_url() -> String {
    LOCAL_API_URL.to_string()
}

fn default_deployed_url() -> String {
    DEPLOYED_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_surface_size() -> u32 {
    DEFAULT_SURFACE_SIZE
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_display_size() -> u32 {
    crate::renderer::DEFAULT_DISPLAY_SIZE
}

impl Config {
    /// Load configuration from a file path.
    ///
    /// With `None`, reads the default path and falls back to defaults if it
    /// doesn't exist. An explicit path must exist. Either way, a file that
    /// exists but cannot be parsed is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (default_path(), false),
        };

        if !path.exists() {
            if explicit {
                return Err(ConfigError::NotFound { path });
            }
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
            path: path.clone(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.clone(),
            source: e,
        })
    }

    /// Apply the `DIGIT_PAD_ENV` override, if set.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(value) = std::env::var(ENVIRONMENT_ENV) {
            self.api.environment = value.parse()?;
            log::debug!("API environment from {}: {:?}", ENVIRONMENT_ENV, self.api.environment);
        }
        Ok(())
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::SerializeError)
    }

    /// Write this configuration to `path`, creating parent directories.
    /// Refuses to overwrite an existing file.
    pub fn write_new(&self, path: &Path) -> Result<(), ConfigError> {
        if path.exists() {
            return Err(ConfigError::AlreadyExists {
                path: path.to_path_buf(),
            });
        }
        let content = self.to_toml()?;
        let io_err = |e| ConfigError::IoError {
            path: path.to_path_buf(),
            source: e,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(path, content).map_err(io_err)
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    SerializeError(toml::ser::Error),
    NotFound {
        path: PathBuf,
    },
    AlreadyExists {
        path: PathBuf,
    },
    InvalidEnvironment(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError { path, source } => {
                write!(
                    f,
                    "Failed to read config file '{}': {}",
                    path.display(),
                    source
                )
            }
            ConfigError::ParseError { path, source } => {
                write!(
                    f,
                    "Failed to parse config file '{}': {}",
                    path.display(),
                    source
                )
            }
            ConfigError::SerializeError(source) => {
                write!(f, "Failed to serialize config: {}", source)
            }
            ConfigError::NotFound { path } => {
                write!(f, "Config file '{}' does not exist", path.display())
            }
            ConfigError::AlreadyExists { path } => {
                write!(f, "Config file '{}' already exists", path.display())
            }
            ConfigError::InvalidEnvironment(value) => {
                write!(
                    f,
                    "Unknown API environment '{}'. Expected 'local' or 'deployed'",
                    value
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::IoError { source, .. } => Some(source),
            ConfigError::ParseError { source, .. } => Some(source),
            ConfigError::SerializeError(source) => Some(source),
            _ => None,
        }
    }
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("digit-pad").join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/digit-pad/config.toml")
        })
}
