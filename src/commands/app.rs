//! Terminal app with the record and upload pages.
//!
//! Supports stopping a recording from outside via the SIGUSR1 signal, e.g.
//! `pkill -USR1 tscribe` bound to a global hotkey.

use crate::config::{get_config_path, TscribeConfig};
use crate::output::OutputTarget;
use crate::recording::AudioRecorder;
use crate::ui::{App, ErrorScreen, Page, RecordPage};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Runs the terminal app and delivers the last transcription on exit.
///
/// # Errors
/// - If the configuration cannot be loaded (shown on an error screen first)
/// - If the terminal cannot be initialized
/// - If the transcription cannot be written to the output target
pub async fn handle_app(
    page: Page,
    endpoint: Option<String>,
    output: OutputTarget,
) -> Result<(), anyhow::Error> {
    tracing::info!("=== tscribe app started ===");

    let config_data = match TscribeConfig::load() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("Failed to load configuration: {err:#}");
            let location = get_config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "~/.config/tscribe/tscribe.toml".to_string());
            let mut error_screen = ErrorScreen::new()?;
            error_screen.show_error(
                "Configuration Error",
                &format!("{err:#}\n\nPlease check {location} and try again."),
            )?;
            error_screen.cleanup()?;
            return Err(anyhow::anyhow!("Configuration error: {err}"));
        }
    };

    tracing::info!(
        "Configuration loaded: device={}, sample_rate={}Hz, reference_level={}dBFS",
        config_data.audio.device,
        config_data.audio.sample_rate,
        config_data.audio.reference_level_db
    );

    let client = super::build_client(&config_data, endpoint)?;
    let recorder = AudioRecorder::new(config_data.audio.sample_rate, config_data.audio.device.clone());
    let record_page = RecordPage::new(recorder, config_data.audio.reference_level_db);

    let stop_requested = Arc::new(AtomicBool::new(false));
    #[cfg(unix)]
    signal_hook::flag::register(signal_hook::consts::SIGUSR1, Arc::clone(&stop_requested))
        .map_err(|e| anyhow::anyhow!("Failed to register signal handler: {e}"))?;

    let mut app = App::new(client, record_page, page)
        .map_err(|e| anyhow::anyhow!("Failed to initialize UI: {e}"))?;
    let result = app.run(stop_requested).await;
    app.cleanup()
        .map_err(|e| anyhow::anyhow!("Cleanup failed: {e}"))?;
    drop(app);

    match result? {
        Some(text) => output.deliver(&text)?,
        None => tracing::debug!("Exited without a transcription"),
    }

    tracing::info!("=== tscribe app exited ===");
    Ok(())
}
