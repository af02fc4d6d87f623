//! Application command handlers for tscribe.
//!
//! # Commands
//! - `app`: Terminal app with the record and upload pages (default)
//! - `upload`: Submit one audio file without the terminal app
//! - `serve`: Run the stub transcription endpoint
//! - `config`: Open configuration file in user's preferred editor
//! - `list_devices`: List available audio input devices
//! - `logs`: Display recent log entries

pub mod app;
pub mod config;
pub mod list_devices;
pub mod logs;
pub mod serve;
pub mod upload;

pub use app::handle_app;
pub use config::handle_config;
pub use list_devices::handle_list_devices;
pub use logs::handle_logs;
pub use serve::handle_serve;
pub use upload::handle_upload;

use crate::config::TscribeConfig;
use crate::transcription::TranscriptionClient;

/// Builds the client for the configured endpoint, or for `endpoint` when given.
///
/// # Errors
/// - If the override is not a valid URL
/// - If the HTTP client cannot be built
fn build_client(
    config: &TscribeConfig,
    endpoint: Option<String>,
) -> anyhow::Result<TranscriptionClient> {
    let endpoint = match endpoint {
        Some(endpoint) => {
            reqwest::Url::parse(&endpoint)
                .map_err(|e| anyhow::anyhow!("Invalid endpoint '{endpoint}': {e}"))?;
            endpoint
        }
        None => config.client.endpoint.clone(),
    };
    let client = TranscriptionClient::new(endpoint, config.client.timeout())?;
    tracing::info!("Transcription endpoint: {}", client.endpoint());
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_override_wins() {
        let config = TscribeConfig::default();
        let client = build_client(&config, Some("http://10.0.0.2:8080/api/transcribe".to_string()))
            .unwrap();
        assert_eq!(client.endpoint(), "http://10.0.0.2:8080/api/transcribe");

        let client = build_client(&config, None).unwrap();
        assert_eq!(client.endpoint(), config.client.endpoint);
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let err = build_client(&TscribeConfig::default(), Some("not a url".to_string())).unwrap_err();
        assert!(err.to_string().contains("Invalid endpoint"));
    }
}
