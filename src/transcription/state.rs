//! Submission state shared by the record and upload pages.
//!
//! Both pages submit audio the same way: mark the page as transcribing,
//! clear any previous error, run the request in the background and store
//! either the transcription or the error message once it completes.

use super::client::TranscriptionClient;
use super::error::TranscriptionError;
use super::response::TranscriptionResponse;
use super::upload::AudioUpload;
use tokio::task::JoinHandle;

type PendingRequest = JoinHandle<Result<TranscriptionResponse, TranscriptionError>>;

/// Result of a completed submission, returned once by [`TranscriptionState::poll`].
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    Completed(String),
    Failed(String),
}

#[derive(Debug, Default)]
pub struct TranscriptionState {
    is_transcribing: bool,
    transcription: Option<String>,
    error: Option<String>,
    pending: Option<PendingRequest>,
}

impl TranscriptionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_transcribing(&self) -> bool {
        self.is_transcribing
    }

    pub fn transcription(&self) -> Option<&str> {
        self.transcription.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Records an error raised outside a submission (e.g. microphone failure).
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Drops any transcription and error. An in-flight request keeps running.
    pub fn clear(&mut self) {
        self.transcription = None;
        self.error = None;
    }

    /// Marks the start of a submission.
    ///
    /// Returns false if a submission is already in flight.
    pub fn begin(&mut self) -> bool {
        if self.is_transcribing {
            return false;
        }
        self.is_transcribing = true;
        self.error = None;
        true
    }

    /// Applies a finished request to the state.
    pub fn finish(
        &mut self,
        result: Result<TranscriptionResponse, TranscriptionError>,
    ) -> SubmissionOutcome {
        self.is_transcribing = false;
        match result {
            Ok(response) => {
                tracing::info!("Transcription received ({} characters)", response.transcription.len());
                self.transcription = Some(response.transcription.clone());
                SubmissionOutcome::Completed(response.transcription)
            }
            Err(e) => {
                let message = e.to_string();
                tracing::warn!("Transcription failed: {}", message);
                self.error = Some(message.clone());
                SubmissionOutcome::Failed(message)
            }
        }
    }

    /// Starts submitting `upload` in the background.
    ///
    /// Returns false without sending anything if a submission is already in flight.
    pub fn submit(&mut self, client: &TranscriptionClient, upload: AudioUpload) -> bool {
        if !self.begin() {
            return false;
        }
        let client = client.clone();
        self.pending = Some(tokio::spawn(async move { client.transcribe(upload).await }));
        true
    }

    /// Collects the outcome of the background request once it has finished.
    pub async fn poll(&mut self) -> Option<SubmissionOutcome> {
        if !self.pending.as_ref().is_some_and(|h| h.is_finished()) {
            return None;
        }
        self.wait().await
    }

    /// Waits for the background request to finish, if one is running.
    pub async fn wait(&mut self) -> Option<SubmissionOutcome> {
        let handle = self.pending.take()?;
        let result = match handle.await {
            Ok(result) => result,
            Err(e) => Err(TranscriptionError::Task(e.to_string())),
        };
        Some(self.finish(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::RecordedClip;
    use crate::server::spawn_test_server;
    use std::time::Duration;

    fn response(text: &str) -> TranscriptionResponse {
        TranscriptionResponse {
            success: true,
            transcription: text.to_string(),
            metadata: None,
        }
    }

    #[test]
    fn test_begin_refuses_while_transcribing() {
        let mut state = TranscriptionState::new();
        state.set_error("old");

        assert!(state.begin());
        assert!(state.is_transcribing());
        assert!(state.error().is_none());
        assert!(!state.begin());
    }

    #[test]
    fn test_finish_success_stores_text() {
        let mut state = TranscriptionState::new();
        state.begin();

        let outcome = state.finish(Ok(response("hello")));

        assert_eq!(outcome, SubmissionOutcome::Completed("hello".to_string()));
        assert!(!state.is_transcribing());
        assert_eq!(state.transcription(), Some("hello"));
    }

    #[test]
    fn test_finish_failure_keeps_previous_transcription() {
        let mut state = TranscriptionState::new();
        state.begin();
        state.finish(Ok(response("first")));
        state.begin();

        let outcome = state.finish(Err(TranscriptionError::Status(500)));

        assert_eq!(
            outcome,
            SubmissionOutcome::Failed("Failed to transcribe audio".to_string())
        );
        assert_eq!(state.error(), Some("Failed to transcribe audio"));
        assert_eq!(state.transcription(), Some("first"));
    }

    #[test]
    fn test_clear_drops_results() {
        let mut state = TranscriptionState::new();
        state.begin();
        state.finish(Ok(response("text")));
        state.set_error("oops");

        state.clear();

        assert!(state.transcription().is_none());
        assert!(state.error().is_none());
    }

    #[tokio::test]
    async fn test_submit_and_wait_against_stub_server() {
        let base = spawn_test_server("from server").await;
        let client =
            TranscriptionClient::new(format!("{base}/api/transcribe"), Duration::from_secs(5))
                .unwrap();
        let upload = AudioUpload::recording(&RecordedClip::new(vec![1; 160], 16000)).unwrap();

        let mut state = TranscriptionState::new();
        assert!(state.submit(&client, upload.clone()));
        assert!(state.is_transcribing());
        assert!(!state.submit(&client, upload));

        let outcome = state.wait().await;

        assert_eq!(outcome, Some(SubmissionOutcome::Completed("from server".to_string())));
        assert_eq!(state.transcription(), Some("from server"));
        assert!(state.poll().await.is_none());
    }

    #[tokio::test]
    async fn test_poll_collects_finished_request() {
        let base = spawn_test_server("polled").await;
        let client =
            TranscriptionClient::new(format!("{base}/api/transcribe"), Duration::from_secs(5))
                .unwrap();
        let upload = AudioUpload::recording(&RecordedClip::new(vec![1; 160], 16000)).unwrap();

        let mut state = TranscriptionState::new();
        assert!(state.submit(&client, upload));

        let mut outcome = None;
        for _ in 0..200 {
            outcome = state.poll().await;
            if outcome.is_some() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        assert_eq!(outcome, Some(SubmissionOutcome::Completed("polled".to_string())));
        assert!(!state.is_transcribing());
    }
}
