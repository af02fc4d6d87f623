//! HTTP client for the transcription endpoint.
//!
//! Submits audio as `multipart/form-data` with a single file part named `audio`
//! and decodes the JSON response.

use super::error::TranscriptionError;
use super::response::{ErrorBody, TranscriptionResponse};
use super::upload::AudioUpload;
use std::time::Duration;

/// Name of the multipart field carrying the audio file.
pub const AUDIO_FIELD: &str = "audio";

/// Client bound to one transcription endpoint.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct TranscriptionClient {
    http: reqwest::Client,
    endpoint: String,
}

impl TranscriptionClient {
    /// Creates a client for `endpoint` with a per-request timeout.
    ///
    /// # Errors
    /// - If the HTTP client cannot be built (e.g. TLS backend initialization fails)
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {e}"))?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Submits an audio file and returns the endpoint's transcription.
    ///
    /// # Errors
    /// - `Connect` / `Timeout` for network failures
    /// - `Status` for non-2xx responses or a body reporting `success: false`
    /// - `InvalidResponse` if the body is not a transcription response
    pub async fn transcribe(
        &self,
        upload: AudioUpload,
    ) -> Result<TranscriptionResponse, TranscriptionError> {
        let file_name = upload.file_name.clone();
        let size = upload.size();

        let file_part = reqwest::multipart::Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str(&upload.mime_type)
            .map_err(|e| TranscriptionError::Request(format!("Invalid MIME type: {e}")))?;
        let form = reqwest::multipart::Form::new().part(AUDIO_FIELD, file_part);

        tracing::debug!(
            "Transcription request:\n  URL: {}\n  Method: POST\n  File: {} ({} bytes)",
            self.endpoint,
            file_name,
            size
        );

        let response = self
            .http
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Transcription request failed: {e}");
                TranscriptionError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or(body);
            tracing::warn!("Transcription endpoint returned {}: {}", status, detail);
            return Err(TranscriptionError::Status(status.as_u16()));
        }

        let transcription: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| TranscriptionError::InvalidResponse(e.to_string()))?;

        if !transcription.success {
            tracing::warn!("Transcription endpoint reported success=false");
            return Err(TranscriptionError::Status(status.as_u16()));
        }

        tracing::debug!(
            "Transcription response: {} characters, metadata: {:?}",
            transcription.transcription.len(),
            transcription.metadata
        );

        Ok(transcription)
    }
}
