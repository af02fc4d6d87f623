//! Configuration file management for tscribe.
//!
//! This module handles loading and saving application configuration from TOML files.
//! Configuration is stored in the user's config directory and created with defaults
//! the first time any command needs it.

use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Fixed text returned by the stub transcription endpoint.
pub const DEFAULT_MOCK_TRANSCRIPTION: &str =
    "This is a mock transcription. Replace this with actual transcription service integration.";

/// Audio recording configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AudioConfig {
    /// Audio device to use. Options:
    /// - "default" for system default device
    /// - numeric index (0, 1, 2, etc.) from `tscribe list-devices`
    /// - device name from `tscribe list-devices`
    #[serde(default = "default_device")]
    pub device: String,
    /// Requested sample rate in Hz. The device's native rate wins if it differs.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    /// Reference level in dBFS for 100% meter display (typical: -20 to -6 dBFS)
    #[serde(default = "default_reference_level_db")]
    pub reference_level_db: i8,
}

fn default_device() -> String {
    "default".to_string()
}

fn default_sample_rate() -> u32 {
    16000
}

fn default_reference_level_db() -> i8 {
    -20
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            device: default_device(),
            sample_rate: default_sample_rate(),
            reference_level_db: default_reference_level_db(),
        }
    }
}

/// Settings for submitting clips to the transcription endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientConfig {
    /// Full URL of the transcription endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    "http://127.0.0.1:3000/api/transcribe".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Settings for the stub transcription service (`tscribe serve`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    /// Socket address to listen on
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Simulated processing time before answering, in milliseconds
    #[serde(default = "default_processing_delay_ms")]
    pub processing_delay_ms: u64,
    /// Largest accepted request body in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    /// Text returned for every transcription request
    #[serde(default = "default_mock_transcription")]
    pub mock_transcription: String,
}

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_processing_delay_ms() -> u64 {
    2000
}

fn default_max_upload_bytes() -> usize {
    25 * 1024 * 1024
}

fn default_mock_transcription() -> String {
    DEFAULT_MOCK_TRANSCRIPTION.to_string()
}

impl ServerConfig {
    pub fn processing_delay(&self) -> Duration {
        Duration::from_millis(self.processing_delay_ms)
    }

    /// Parses the configured bind address.
    ///
    /// # Errors
    /// - If `bind` is not a valid `host:port` socket address
    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        self.bind
            .parse()
            .map_err(|e| anyhow!("Invalid server bind address '{}': {e}", self.bind))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            processing_delay_ms: default_processing_delay_ms(),
            max_upload_bytes: default_max_upload_bytes(),
            mock_transcription: default_mock_transcription(),
        }
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TscribeConfig {
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl TscribeConfig {
    /// Loads configuration from the user's config directory.
    ///
    /// Writes a default configuration file first if none exists yet.
    ///
    /// # Errors
    /// - If the config directory cannot be determined or created
    /// - If the config file cannot be read or written
    /// - If the TOML is malformed or fails validation
    pub fn load() -> anyhow::Result<Self> {
        let config_path = get_config_path()?;
        if !config_path.exists() {
            let config = Self::default();
            config.save_to(&config_path)?;
            tracing::info!("Created default configuration at {}", config_path.display());
            return Ok(config);
        }
        Self::load_from(&config_path)
    }

    /// Loads and validates configuration from an explicit path.
    ///
    /// # Errors
    /// - If the file cannot be read
    /// - If the TOML is malformed or fails validation
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: TscribeConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to an explicit path, creating parent directories.
    ///
    /// # Errors
    /// - If the directory cannot be created
    /// - If the file cannot be written
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        tracing::debug!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Checks values that serde alone cannot reject.
    ///
    /// # Errors
    /// - If the sample rate is zero
    /// - If the client endpoint is not a valid URL
    /// - If the server bind address is not a valid socket address
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.audio.sample_rate == 0 {
            return Err(anyhow!("audio.sample_rate must be greater than zero"));
        }
        reqwest::Url::parse(&self.client.endpoint)
            .map_err(|e| anyhow!("Invalid client endpoint '{}': {e}", self.client.endpoint))?;
        self.server.bind_addr()?;
        Ok(())
    }
}

/// Returns the directory holding the tscribe config file.
///
/// # Errors
/// - If the home directory cannot be determined
pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))?;
    Ok(home.join(".config").join("tscribe"))
}

/// Retrieves the path to the config file.
///
/// # Errors
/// - If the home directory cannot be determined
pub fn get_config_path() -> anyhow::Result<PathBuf> {
    Ok(get_config_dir()?.join("tscribe.toml"))
}
