//! Configuration persisted across sessions.
//!
//! A config file is optional. Every field has a default, so the companion
//! runs out of the box and a partial TOML file only overrides what it
//! names.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::completion::{
    DEFAULT_API_KEY_ENV, DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_TEMPERATURE,
    HttpCompletionClient,
};
use crate::error::{ConfigError, CoreError, Result};

/// Resolve a path relative to a base directory. Absolute paths pass
/// through untouched.
fn resolve_path(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObsidianaConfig {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub model: ModelConfig,
}

/// Where the companion keeps its data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path of the JSON store document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Keep everything in memory. Nothing is written to disk.
    #[serde(default)]
    pub ephemeral: bool,
}

impl StoreConfig {
    /// The configured path, or the platform data directory.
    pub fn resolved_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(default_store_path)
    }
}

fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("obsidiana")
        .join("store.json")
}

/// Completion provider settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            temperature: default_temperature(),
        }
    }
}

impl ModelConfig {
    /// Build the HTTP client these settings describe. The key is read from
    /// `api_key_env` at call time.
    pub fn client(&self) -> HttpCompletionClient {
        HttpCompletionClient::from_env(self.model.clone(), &self.api_key_env)
            .with_endpoint(self.api_url.clone())
            .with_temperature(self.temperature)
    }
}

fn default_api_url() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_api_key_env() -> String {
    DEFAULT_API_KEY_ENV.to_string()
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

/// Candidate config locations, in precedence order.
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    // Project-specific config
    paths.push(PathBuf::from("obsidiana.toml"));

    // User config directory
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("obsidiana").join("config.toml"));
    }

    // Home directory fallback
    if let Some(home_dir) = dirs::home_dir() {
        paths.push(home_dir.join(".obsidiana").join("config.toml"));
    }

    paths
}

/// Where `config save` writes when no path is given.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("obsidiana")
        .join("config.toml")
}

/// Load configuration from a TOML file.
pub async fn load_config(path: &Path) -> Result<ObsidianaConfig> {
    let content =
        tokio::fs::read_to_string(path)
            .await
            .map_err(|e| CoreError::ConfigurationError {
                config_path: path.display().to_string(),
                field: "file".to_string(),
                expected: "readable TOML file".to_string(),
                cause: Box::new(ConfigError::Io(e.to_string())),
            })?;

    let mut config: ObsidianaConfig =
        toml::from_str(&content).map_err(|e| CoreError::ConfigurationError {
            config_path: path.display().to_string(),
            field: "content".to_string(),
            expected: "valid TOML configuration".to_string(),
            cause: Box::new(ConfigError::TomlParse(e.to_string())),
        })?;

    // Resolve the store path relative to the config file's directory
    let base_dir = path.parent().unwrap_or(Path::new("."));
    if let Some(ref store_path) = config.store.path {
        config.store.path = Some(resolve_path(base_dir, store_path));
    }

    Ok(config)
}

/// Save configuration to a TOML file.
pub async fn save_config(config: &ObsidianaConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| CoreError::ConfigurationError {
                config_path: parent.display().to_string(),
                field: "directory".to_string(),
                expected: "writable directory".to_string(),
                cause: Box::new(ConfigError::Io(e.to_string())),
            })?;
    }

    let content =
        toml::to_string_pretty(config).map_err(|e| CoreError::ConfigurationError {
            config_path: path.display().to_string(),
            field: "serialization".to_string(),
            expected: "serializable config structure".to_string(),
            cause: Box::new(ConfigError::TomlSerialize(e.to_string())),
        })?;

    tokio::fs::write(path, content)
        .await
        .map_err(|e| CoreError::ConfigurationError {
            config_path: path.display().to_string(),
            field: "file".to_string(),
            expected: "writable file location".to_string(),
            cause: Box::new(ConfigError::Io(e.to_string())),
        })?;

    Ok(())
}

/// First config file found in the standard locations, or the defaults when
/// none exists.
pub async fn load_from_standard_locations() -> Result<ObsidianaConfig> {
    for path in config_paths() {
        if path.exists() {
            tracing::debug!(path = %path.display(), "loading configuration");
            return load_config(&path).await;
        }
    }
    Ok(ObsidianaConfig::default())
}
