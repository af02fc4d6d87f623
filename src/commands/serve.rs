//! Runs the stub transcription endpoint.

use crate::config::TscribeConfig;
use crate::server;

/// Serves `POST /api/transcribe` until Ctrl-C.
///
/// `bind` and `delay_ms` override the `[server]` section of the config file.
///
/// # Errors
/// - If the configuration cannot be loaded
/// - If the address is invalid or cannot be bound
pub async fn handle_serve(bind: Option<String>, delay_ms: Option<u64>) -> Result<(), anyhow::Error> {
    tracing::info!("=== tscribe serve ===");

    let mut config_data = TscribeConfig::load()
        .map_err(|e| anyhow::anyhow!("Configuration error: {e:#}"))?;

    if let Some(bind) = bind {
        config_data.server.bind = bind;
    }
    if let Some(delay_ms) = delay_ms {
        config_data.server.processing_delay_ms = delay_ms;
    }

    server::serve(&config_data.server).await
}
