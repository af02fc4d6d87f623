//! Configuration management for tscribe.
//!
//! Loads and saves the TOML configuration covering audio capture, the
//! transcription client and the stub transcription server.

pub mod file;

pub use file::{get_config_path, AudioConfig, ClientConfig, ServerConfig, TscribeConfig};
