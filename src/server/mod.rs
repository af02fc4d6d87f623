//! Stub transcription service.
//!
//! Serves `POST /api/transcribe`, which accepts an uploaded audio file, waits
//! for a configurable processing delay and answers with a fixed mock
//! transcription. No speech recognition happens here.

pub mod error;
pub mod handler;

use crate::config::ServerConfig;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;
use std::time::Duration;

/// Shared state handed to every request.
#[derive(Debug, Clone)]
pub struct ServerState {
    pub mock_transcription: Arc<str>,
    pub processing_delay: Duration,
}

impl ServerState {
    pub fn new(mock_transcription: &str, processing_delay: Duration) -> Self {
        Self {
            mock_transcription: Arc::from(mock_transcription),
            processing_delay,
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(&config.mock_transcription, config.processing_delay())
    }
}

/// Builds the service routes.
pub fn router(state: ServerState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/api/transcribe", post(handler::transcribe))
        .route("/api/health", get(health))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Binds the configured address and serves until Ctrl-C.
///
/// # Errors
/// - If the bind address is invalid or already in use
/// - If the server stops with an I/O error
pub async fn serve(config: &ServerConfig) -> anyhow::Result<()> {
    let addr = config.bind_addr()?;
    let app = router(ServerState::from_config(config), config.max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind {addr}: {e}"))?;

    tracing::info!(
        "Transcription endpoint listening on http://{}/api/transcribe (delay {}ms)",
        listener.local_addr()?,
        config.processing_delay_ms
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Transcription endpoint stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}

/// Serves the stub on an ephemeral local port with no processing delay.
///
/// Returns the base URL, e.g. `http://127.0.0.1:49152`.
#[cfg(test)]
pub(crate) async fn spawn_test_server(mock_transcription: &str) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(ServerState::new(mock_transcription, Duration::ZERO), 1024 * 1024);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::RecordedClip;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    const BOUNDARY: &str = "tscribe-test-boundary";

    fn multipart_body(parts: &[(&str, Option<&str>, Option<&str>, &[u8])]) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, file_name, content_type, data) in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            let mut disposition = format!("Content-Disposition: form-data; name=\"{name}\"");
            if let Some(file_name) = file_name {
                disposition.push_str(&format!("; filename=\"{file_name}\""));
            }
            body.extend_from_slice(disposition.as_bytes());
            body.extend_from_slice(b"\r\n");
            if let Some(content_type) = content_type {
                body.extend_from_slice(format!("Content-Type: {content_type}\r\n").as_bytes());
            }
            body.extend_from_slice(b"\r\n");
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn multipart_request(body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/transcribe")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn test_router(delay: Duration) -> Router {
        router(ServerState::new("mock", delay), 1024 * 1024)
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_transcribe_returns_mock_with_metadata() {
        let wav = RecordedClip::new(vec![0; 16000], 16000).to_wav_bytes().unwrap();
        let body = multipart_body(&[
            ("note", None, None, &b"ignored"[..]),
            ("audio", Some("recording.wav"), Some("audio/wav"), &wav[..]),
        ]);

        let response = test_router(Duration::ZERO)
            .oneshot(multipart_request(body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["transcription"], "mock");
        assert_eq!(json["metadata"]["fileName"], "recording.wav");
        assert_eq!(json["metadata"]["fileSize"], wav.len() as u64);
        assert_eq!(json["metadata"]["fileType"], "audio/wav");
        assert_eq!(json["metadata"]["duration"], "1.00s");
    }

    #[tokio::test]
    async fn test_part_without_filename_or_type() {
        let body = multipart_body(&[("audio", None, None, &b"raw bytes"[..])]);

        let response = test_router(Duration::ZERO)
            .oneshot(multipart_request(body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["metadata"]["fileName"], "blob");
        assert_eq!(json["metadata"]["fileType"], "");
        assert_eq!(json["metadata"]["fileSize"], 9);
        assert!(json["metadata"].get("duration").is_none());
    }

    #[tokio::test]
    async fn test_missing_audio_part_is_bad_request() {
        let body = multipart_body(&[("file", Some("a.wav"), Some("audio/wav"), &b"data"[..])]);

        let response = test_router(Duration::ZERO)
            .oneshot(multipart_request(body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["error"], "No audio file provided");
    }

    #[tokio::test]
    async fn test_non_multipart_body_is_server_error() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/transcribe")
            .header("content-type", "application/json")
            .body(Body::from("{}"))
            .unwrap();

        let response = test_router(Duration::ZERO).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = json_body(response).await;
        assert_eq!(json["error"], "Failed to process audio file");
    }

    #[tokio::test]
    async fn test_upload_over_body_limit_is_payload_too_large() {
        let audio = vec![0u8; 4096];
        let body = multipart_body(&[("audio", Some("big.wav"), Some("audio/wav"), &audio[..])]);

        let response = router(ServerState::new("mock", Duration::ZERO), 1024)
            .oneshot(multipart_request(body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let json = json_body(response).await;
        assert_eq!(json["error"], "Audio file too large");
    }

    #[tokio::test]
    async fn test_processing_delay_is_applied() {
        let body = multipart_body(&[("audio", Some("a.mp3"), Some("audio/mpeg"), &b"x"[..])]);
        let started = std::time::Instant::now();

        let response = test_router(Duration::from_millis(100))
            .oneshot(multipart_request(body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(started.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::builder()
            .uri("/api/health")
            .body(Body::empty())
            .unwrap();

        let response = test_router(Duration::ZERO).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[test]
    fn test_state_from_config() {
        let config = ServerConfig::default();
        let state = ServerState::from_config(&config);
        assert_eq!(state.processing_delay, Duration::from_millis(2000));
        assert_eq!(&*state.mock_transcription, config.mock_transcription);
    }
}
