//! `POST /api/transcribe` handler.
//!
//! Accepts a multipart form with an `audio` file part, waits for the
//! configured processing delay and answers with the mock transcription.

use super::error::ApiError;
use super::ServerState;
use crate::transcription::client::AUDIO_FIELD;
use crate::transcription::{FileMetadata, TranscriptionResponse};
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use std::io::Cursor;

/// File name reported for parts uploaded without one.
const UNNAMED_PART: &str = "blob";

/// A received audio part.
struct ReceivedAudio {
    file_name: String,
    content_type: String,
    bytes: Vec<u8>,
}

pub async fn transcribe(
    State(state): State<ServerState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<TranscriptionResponse>, ApiError> {
    let mut multipart = multipart.map_err(|e| multipart_error(e.status(), e.body_text()))?;
    let audio = read_audio_part(&mut multipart)
        .await?
        .ok_or(ApiError::MissingAudio)?;

    tracing::info!(
        "Received {} ({} bytes, type '{}')",
        audio.file_name,
        audio.bytes.len(),
        audio.content_type
    );

    tokio::time::sleep(state.processing_delay).await;

    let metadata = FileMetadata {
        duration: wav_duration(&audio.bytes),
        file_name: audio.file_name,
        file_size: audio.bytes.len() as u64,
        file_type: audio.content_type,
    };

    Ok(Json(TranscriptionResponse {
        success: true,
        transcription: state.mock_transcription.to_string(),
        metadata: Some(metadata),
    }))
}

/// Returns the first part named `audio`, skipping any other fields.
async fn read_audio_part(multipart: &mut Multipart) -> Result<Option<ReceivedAudio>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e.status(), e.body_text()))?
    {
        if field.name() != Some(AUDIO_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or(UNNAMED_PART).to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e.status(), e.body_text()))?;
        return Ok(Some(ReceivedAudio {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        }));
    }
    Ok(None)
}

/// Keeps the body limit's 413; every other multipart failure is a processing error.
fn multipart_error(status: StatusCode, detail: String) -> ApiError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::TooLarge(detail)
    } else {
        ApiError::Processing(detail)
    }
}

/// Duration of a WAV payload formatted like "1.50s", or `None` for other formats.
pub fn wav_duration(bytes: &[u8]) -> Option<String> {
    let reader = hound::WavReader::new(Cursor::new(bytes)).ok()?;
    let sample_rate = reader.spec().sample_rate;
    if sample_rate == 0 {
        return None;
    }
    let seconds = reader.duration() as f64 / sample_rate as f64;
    Some(format!("{seconds:.2}s"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::RecordedClip;

    #[test]
    fn test_wav_duration_of_recorded_clip() {
        let bytes = RecordedClip::new(vec![0; 24000], 16000).to_wav_bytes().unwrap();
        assert_eq!(wav_duration(&bytes).as_deref(), Some("1.50s"));
    }

    #[test]
    fn test_wav_duration_ignores_other_formats() {
        assert_eq!(wav_duration(b"ID3\x03\x00 not a wav"), None);
        assert_eq!(wav_duration(&[]), None);
    }

    #[test]
    fn test_multipart_error_keeps_payload_too_large() {
        let err = multipart_error(StatusCode::PAYLOAD_TOO_LARGE, "length limit exceeded".into());
        assert!(matches!(err, ApiError::TooLarge(_)));
        assert_eq!(err.status(), StatusCode::PAYLOAD_TOO_LARGE);

        let err = multipart_error(StatusCode::BAD_REQUEST, "malformed".into());
        assert!(matches!(err, ApiError::Processing(_)));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
