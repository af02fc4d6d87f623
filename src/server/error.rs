//! Error responses of the transcription endpoint.

use crate::transcription::ErrorBody;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No audio file provided")]
    MissingAudio,

    /// The body exceeded `server.max_upload_bytes`.
    #[error("Audio file too large")]
    TooLarge(String),

    /// The request body could not be read as a multipart form.
    #[error("Failed to process audio file")]
    Processing(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingAudio => StatusCode::BAD_REQUEST,
            Self::TooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Processing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::MissingAudio => tracing::info!("Rejected request without an audio part"),
            Self::TooLarge(detail) => tracing::warn!("Rejected oversized upload: {}", detail),
            Self::Processing(detail) => tracing::error!("Transcription error: {}", detail),
        }
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
