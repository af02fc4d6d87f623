//! Transcription of an audio file without the terminal app.

use crate::config::TscribeConfig;
use crate::output::OutputTarget;
use crate::transcription::upload::{mime_type_for, supported_formats_label};
use crate::transcription::{AudioUpload, TranscriptionError};
use cliclack::{input, intro, spinner};
use console::style;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// How often a pending request checks whether Ctrl-C was pressed.
const CANCEL_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// The user aborted the upload with Ctrl-C or Esc.
#[derive(Debug, thiserror::Error)]
#[error("Upload cancelled")]
pub struct UploadCancelled;

/// Whether `error` comes from the user aborting the upload.
pub fn is_cancelled(error: &anyhow::Error) -> bool {
    error.downcast_ref::<UploadCancelled>().is_some()
}

/// Submits one audio file and delivers the transcription to `output`.
///
/// Prompts for the path when `file` is not given. Ctrl-C while the request
/// is pending abandons it and returns [`UploadCancelled`].
///
/// # Errors
/// - If the configuration cannot be loaded
/// - If the file is not a supported audio file or cannot be read
/// - If the transcription request fails
pub async fn handle_upload(
    file: Option<PathBuf>,
    endpoint: Option<String>,
    output: OutputTarget,
) -> Result<(), anyhow::Error> {
    tracing::info!("=== tscribe upload ===");

    let interrupted = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&interrupted);
    ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))
        .map_err(|e| anyhow::anyhow!("Failed to set Ctrl-C handler: {e}"))?;

    let config_data = TscribeConfig::load()
        .map_err(|e| anyhow::anyhow!("Configuration error: {e:#}"))?;
    let client = super::build_client(&config_data, endpoint)?;

    let path = match file {
        Some(path) => path,
        None => prompt_for_path()?,
    };

    let upload = read_upload(&path)?;
    tracing::info!("Uploading {} ({} bytes)", path.display(), upload.size());

    let progress = spinner();
    progress.start("Transcribing audio...");

    match until_cancelled(client.transcribe(upload), &interrupted).await {
        Some(Ok(response)) => {
            progress.stop("Transcription completed!");
            output.deliver(&response.transcription)?;
            Ok(())
        }
        Some(Err(e)) => {
            progress.error(e.to_string());
            Err(anyhow::anyhow!("Transcription failed: {e}"))
        }
        None => {
            tracing::info!("Upload cancelled while waiting for the transcription");
            progress.error("Upload cancelled");
            Err(UploadCancelled.into())
        }
    }
}

/// Loads `path` as an upload, naming the file and the accepted formats on rejection.
fn read_upload(path: &Path) -> anyhow::Result<AudioUpload> {
    AudioUpload::from_path(path).map_err(|e| match e {
        TranscriptionError::NotAudio => anyhow::anyhow!(
            "{e}: {} (supported: {})",
            path.display(),
            supported_formats_label()
        ),
        other => anyhow::anyhow!("{other}"),
    })
}

/// Runs `future` until it finishes or `cancelled` is set, whichever comes first.
async fn until_cancelled<F: Future>(future: F, cancelled: &AtomicBool) -> Option<F::Output> {
    let interrupted = async {
        while !cancelled.load(Ordering::SeqCst) {
            tokio::time::sleep(CANCEL_POLL_INTERVAL).await;
        }
    };

    tokio::select! {
        output = future => Some(output),
        () = interrupted => None,
    }
}

fn prompt_for_path() -> anyhow::Result<PathBuf> {
    intro(style(" upload ").on_white().black())?;
    let value: String = input("Path to an audio file:")
        .placeholder("./meeting.mp3")
        .validate(|value: &String| {
            if mime_type_for(Path::new(value.trim())).is_some() {
                Ok(())
            } else {
                Err(format!(
                    "Please upload an audio file ({})",
                    supported_formats_label()
                ))
            }
        })
        .interact()
        .map_err(prompt_error)?;
    Ok(PathBuf::from(value.trim()))
}

/// cliclack reports Ctrl-C and Esc as `Interrupted`.
fn prompt_error(error: io::Error) -> anyhow::Error {
    if error.kind() == io::ErrorKind::Interrupted {
        UploadCancelled.into()
    } else {
        anyhow::anyhow!("Failed to read the file path: {error}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_file_named_cancelled_is_not_a_cancellation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cancelled_meeting.pdf");
        std::fs::write(&path, b"%PDF-1.4").unwrap();

        let err = read_upload(&path).unwrap_err();

        assert!(err.to_string().contains("cancelled_meeting.pdf"));
        assert!(err.to_string().starts_with("Please upload an audio file"));
        assert!(!is_cancelled(&err));
    }

    #[test]
    fn test_interrupted_prompt_is_a_cancellation() {
        let err = prompt_error(io::Error::new(io::ErrorKind::Interrupted, "ctrl-c"));
        assert!(is_cancelled(&err));

        let err = prompt_error(io::Error::other("terminal closed"));
        assert!(!is_cancelled(&err));
    }

    #[tokio::test]
    async fn test_ctrl_c_abandons_pending_request() {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            flag.store(true, Ordering::SeqCst);
        });

        let result = tokio::time::timeout(
            Duration::from_secs(5),
            until_cancelled(std::future::pending::<()>(), &cancelled),
        )
        .await
        .expect("cancellation should end the wait");

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_finished_request_is_returned() {
        let cancelled = AtomicBool::new(false);
        assert_eq!(until_cancelled(async { 7 }, &cancelled).await, Some(7));
    }
}
