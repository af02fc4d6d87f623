//! Recorder status shown on the record page.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of the microphone recorder, tracked for UI feedback only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecorderStatus {
    /// Nothing recorded yet, or the clip was reset
    #[default]
    Idle,
    /// Capturing audio from the microphone
    Recording,
    /// Recording finished; a clip may be available
    Stopped,
    /// Opening the input device
    AcquiringMedia,
    /// The input device could not be opened
    Failed,
}

impl RecorderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Recording => "recording",
            Self::Stopped => "stopped",
            Self::AcquiringMedia => "acquiring_media",
            Self::Failed => "failed",
        }
    }

    pub fn is_recording(&self) -> bool {
        matches!(self, Self::Recording)
    }
}

impl fmt::Display for RecorderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_names_match_display() {
        for status in [
            RecorderStatus::Idle,
            RecorderStatus::Recording,
            RecorderStatus::Stopped,
            RecorderStatus::AcquiringMedia,
            RecorderStatus::Failed,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{status}\""));
        }
    }

    #[test]
    fn test_default_is_idle() {
        assert_eq!(RecorderStatus::default(), RecorderStatus::Idle);
        assert!(!RecorderStatus::Idle.is_recording());
        assert!(RecorderStatus::Recording.is_recording());
    }
}
