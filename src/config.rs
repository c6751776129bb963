use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use mealprep_core::{SmartFillLimits, DEFAULT_SHARE_BASE_URL};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Source of a configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    fn set(&mut self, value: T, source: ConfigSource) {
        self.value = value;
        self.source = source;
    }
}

/// Smart fill bucket sizes
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct SmartFillConfig {
    pub breakfast: usize,
    pub main: usize,
}

impl Default for SmartFillConfig {
    fn default() -> Self {
        let limits = SmartFillLimits::default();
        Self {
            breakfast: limits.breakfast,
            main: limits.main,
        }
    }
}

impl From<SmartFillConfig> for SmartFillLimits {
    fn from(config: SmartFillConfig) -> Self {
        SmartFillLimits {
            breakfast: config.breakfast,
            main: config.main,
        }
    }
}

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Recipe backend base URL
    pub api_base_url: ConfigValue<String>,
    /// Bearer token for the recipe backend
    #[serde(skip_serializing)]
    pub api_token: Option<ConfigValue<String>>,
    /// Where the CLI keeps its state file
    pub data_dir: ConfigValue<PathBuf>,
    /// Prefix for public menu links
    pub share_base_url: ConfigValue<String>,
    /// Offline catalog (JSON); used instead of the backend when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_file: Option<ConfigValue<PathBuf>>,
    pub request_timeout_secs: ConfigValue<u64>,
    pub smart_fill: SmartFillConfig,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
}

/// Internal struct for deserializing config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    api_base_url: Option<String>,
    api_token: Option<String>,
    data_dir: Option<PathBuf>,
    share_base_url: Option<String>,
    catalog_file: Option<PathBuf>,
    request_timeout_secs: Option<u64>,
    smart_fill: Option<SmartFillConfig>,
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self {
            api_base_url: ConfigValue::new(DEFAULT_API_BASE_URL.to_string(), ConfigSource::Default),
            api_token: None,
            data_dir: ConfigValue::new(Self::default_data_dir(), ConfigSource::Default),
            share_base_url: ConfigValue::new(
                DEFAULT_SHARE_BASE_URL.to_string(),
                ConfigSource::Default,
            ),
            catalog_file: None,
            request_timeout_secs: ConfigValue::new(
                DEFAULT_REQUEST_TIMEOUT_SECS,
                ConfigSource::Default,
            ),
            smart_fill: SmartFillConfig::default(),
            config_file: None,
        };

        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            // Relative paths are taken from the config file's directory
            let resolve = |p: PathBuf| {
                if p.is_relative() {
                    path.parent().map(|dir| dir.join(&p)).unwrap_or(p)
                } else {
                    p
                }
            };

            if let Some(url) = file_config.api_base_url {
                config.api_base_url.set(url, ConfigSource::File);
            }
            if let Some(token) = file_config.api_token {
                config.api_token = Some(ConfigValue::new(token, ConfigSource::File));
            }
            if let Some(dir) = file_config.data_dir {
                config.data_dir.set(resolve(dir), ConfigSource::File);
            }
            if let Some(url) = file_config.share_base_url {
                config.share_base_url.set(url, ConfigSource::File);
            }
            if let Some(file) = file_config.catalog_file {
                config.catalog_file = Some(ConfigValue::new(resolve(file), ConfigSource::File));
            }
            if let Some(secs) = file_config.request_timeout_secs {
                config.request_timeout_secs.set(secs, ConfigSource::File);
            }
            if let Some(smart_fill) = file_config.smart_fill {
                config.smart_fill = smart_fill;
            }

            config.config_file = Some(path.clone());
        }

        // Apply environment variable overrides
        if let Ok(url) = std::env::var("MEALPREP_API_URL") {
            config.api_base_url.set(url, ConfigSource::Environment);
        }
        if let Ok(token) = std::env::var("MEALPREP_API_TOKEN") {
            config.api_token = Some(ConfigValue::new(token, ConfigSource::Environment));
        }
        if let Ok(dir) = std::env::var("MEALPREP_DATA_DIR") {
            config
                .data_dir
                .set(PathBuf::from(dir), ConfigSource::Environment);
        }
        if let Ok(url) = std::env::var("MEALPREP_SHARE_URL") {
            config.share_base_url.set(url, ConfigSource::Environment);
        }
        if let Ok(file) = std::env::var("MEALPREP_CATALOG_FILE") {
            config.catalog_file = Some(ConfigValue::new(
                PathBuf::from(file),
                ConfigSource::Environment,
            ));
        }
        if let Ok(secs) = std::env::var("MEALPREP_REQUEST_TIMEOUT") {
            let secs = secs.trim().parse::<u64>().map_err(|_| {
                ConfigError::InvalidValue(
                    "MEALPREP_REQUEST_TIMEOUT".to_string(),
                    format!("'{}' is not a number of seconds", secs),
                )
            })?;
            config
                .request_timeout_secs
                .set(secs, ConfigSource::Environment);
        }

        // reqwest treats a zero timeout as expiring at once
        if config.request_timeout_secs.value == 0 {
            return Err(ConfigError::InvalidValue(
                "request_timeout_secs".to_string(),
                "must be at least 1 second".to_string(),
            ));
        }

        Ok(config)
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/mealprep/
    /// - macOS: ~/Library/Application Support/mealprep/
    /// - Windows: %APPDATA%/mealprep/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mealprep")
    }

    /// Default data directory (platform-specific):
    /// - Linux: ~/.local/share/mealprep/
    /// - macOS: ~/Library/Application Support/mealprep/
    /// - Windows: %APPDATA%/mealprep/
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mealprep")
    }

    /// Default config file path (platform-specific config dir + config.yaml)
    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
    InvalidValue(String, String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
            ConfigError::InvalidValue(key, reason) => {
                write!(f, "Invalid value for {}: {}", key, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
