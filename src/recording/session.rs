//! State of the record page, independent of the terminal.

use super::audio::RecordedClip;
use super::status::RecorderStatus;
use crate::transcription::TranscriptionState;

/// Error shown when the input device cannot be opened.
pub const MICROPHONE_UNAVAILABLE: &str = "Microphone access denied or not available";

/// Recorder status, the captured clip and the submission state for one page.
#[derive(Debug, Default)]
pub struct RecordSession {
    status: RecorderStatus,
    clip: Option<RecordedClip>,
    pub transcription: TranscriptionState,
}

impl RecordSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> RecorderStatus {
        self.status
    }

    pub fn clip(&self) -> Option<&RecordedClip> {
        self.clip.as_ref()
    }

    /// A new recording can start only when no clip is held and nothing is being captured.
    pub fn can_start(&self) -> bool {
        self.clip.is_none()
            && !matches!(
                self.status,
                RecorderStatus::Recording | RecorderStatus::AcquiringMedia
            )
    }

    pub fn can_stop(&self) -> bool {
        self.status.is_recording()
    }

    pub fn can_send(&self) -> bool {
        self.clip.is_some() && !self.transcription.is_transcribing()
    }

    pub fn can_reset(&self) -> bool {
        self.clip.is_some()
    }

    pub fn begin_acquire(&mut self) {
        self.status = RecorderStatus::AcquiringMedia;
        self.transcription.clear_error();
    }

    pub fn media_acquired(&mut self) {
        self.status = RecorderStatus::Recording;
    }

    pub fn media_failed(&mut self) {
        self.status = RecorderStatus::Failed;
        self.transcription.set_error(MICROPHONE_UNAVAILABLE);
    }

    pub fn stopped(&mut self, clip: Option<RecordedClip>) {
        self.status = RecorderStatus::Stopped;
        self.clip = clip;
    }

    pub fn reset(&mut self) {
        self.clip = None;
        self.transcription.clear();
        self.status = RecorderStatus::Idle;
    }

    /// One-line status for the page, in order of precedence.
    pub fn status_message(&self) -> String {
        if let Some(error) = self.transcription.error() {
            return error.to_string();
        }
        let message = if self.status == RecorderStatus::Recording {
            "Recording in progress..."
        } else if self.status == RecorderStatus::Idle {
            "Press Space to start recording"
        } else if self.transcription.is_transcribing() {
            "Transcribing your audio..."
        } else if self.transcription.transcription().is_some() {
            "Transcription complete"
        } else {
            "Ready to record"
        };
        message.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcription::{TranscriptionError, TranscriptionResponse};

    fn clip() -> RecordedClip {
        RecordedClip::new(vec![0; 160], 16000)
    }

    fn recorded_session() -> RecordSession {
        let mut session = RecordSession::new();
        session.begin_acquire();
        session.media_acquired();
        session.stopped(Some(clip()));
        session
    }

    #[test]
    fn test_fresh_session_is_idle() {
        let session = RecordSession::new();
        assert_eq!(session.status(), RecorderStatus::Idle);
        assert!(session.can_start());
        assert!(!session.can_stop());
        assert!(!session.can_send());
        assert!(!session.can_reset());
        assert_eq!(session.status_message(), "Press Space to start recording");
    }

    #[test]
    fn test_recording_lifecycle() {
        let mut session = RecordSession::new();

        session.begin_acquire();
        assert_eq!(session.status(), RecorderStatus::AcquiringMedia);
        assert!(!session.can_start());
        assert_eq!(session.status_message(), "Ready to record");

        session.media_acquired();
        assert!(session.can_stop());
        assert!(!session.can_start());
        assert_eq!(session.status_message(), "Recording in progress...");

        session.stopped(Some(clip()));
        assert_eq!(session.status(), RecorderStatus::Stopped);
        assert!(session.can_send());
        assert!(session.can_reset());
        assert!(!session.can_start());
        assert_eq!(session.status_message(), "Ready to record");
    }

    #[test]
    fn test_stop_without_samples_allows_new_recording() {
        let mut session = RecordSession::new();
        session.begin_acquire();
        session.media_acquired();
        session.stopped(None);

        assert!(session.can_start());
        assert!(!session.can_send());
    }

    #[test]
    fn test_microphone_failure_sets_error() {
        let mut session = RecordSession::new();
        session.begin_acquire();
        session.media_failed();

        assert_eq!(session.status(), RecorderStatus::Failed);
        assert_eq!(session.status_message(), MICROPHONE_UNAVAILABLE);
        assert!(session.can_start());

        session.begin_acquire();
        assert_eq!(session.status_message(), "Ready to record");
    }

    #[test]
    fn test_transcribing_and_complete_messages() {
        let mut session = recorded_session();

        assert!(session.transcription.begin());
        assert!(!session.can_send());
        assert_eq!(session.status_message(), "Transcribing your audio...");

        session.transcription.finish(Ok(TranscriptionResponse {
            success: true,
            transcription: "hello".to_string(),
            metadata: None,
        }));
        assert_eq!(session.status_message(), "Transcription complete");
        assert!(session.can_send());
    }

    #[test]
    fn test_error_takes_precedence_over_everything() {
        let mut session = recorded_session();
        session.transcription.begin();
        session.transcription.finish(Err(TranscriptionError::Connect));

        assert_eq!(
            session.status_message(),
            "Failed to connect to the transcription server. Is it running?"
        );
    }

    #[test]
    fn test_reset_clears_clip_and_results() {
        let mut session = recorded_session();
        session.transcription.begin();
        session.transcription.finish(Ok(TranscriptionResponse {
            success: true,
            transcription: "hello".to_string(),
            metadata: None,
        }));

        session.reset();

        assert_eq!(session.status(), RecorderStatus::Idle);
        assert!(session.clip().is_none());
        assert!(session.transcription.transcription().is_none());
        assert!(session.can_start());
    }
}
