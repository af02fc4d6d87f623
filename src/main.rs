mod app;
mod commands;
mod config;
mod logging;
mod output;
mod recording;
mod server;
mod transcription;
mod ui;

use std::process;

#[tokio::main]
async fn main() {
    if let Err(e) = app::run().await {
        tracing::error!("Fatal error: {e:#}");
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
