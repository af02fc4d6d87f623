//! Errors raised while preparing or submitting a transcription request.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranscriptionError {
    /// The selected file is not one of the accepted audio formats.
    #[error("Please upload an audio file")]
    NotAudio,

    #[error("Failed to read audio file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to encode recording: {0}")]
    Encode(String),

    #[error("Failed to connect to the transcription server. Is it running?")]
    Connect,

    #[error("The transcription server did not respond in time")]
    Timeout,

    /// The endpoint answered with a non-success status, or reported `success: false`.
    #[error("Failed to transcribe audio")]
    Status(u16),

    #[error("Failed to parse transcription response: {0}")]
    InvalidResponse(String),

    #[error("Transcription request failed: {0}")]
    Request(String),

    #[error("Transcription task failed: {0}")]
    Task(String),
}

impl From<reqwest::Error> for TranscriptionError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() {
            Self::Connect
        } else if e.is_timeout() {
            Self::Timeout
        } else if e.is_decode() {
            Self::InvalidResponse(e.to_string())
        } else {
            Self::Request(e.to_string())
        }
    }
}
