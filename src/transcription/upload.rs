//! Audio payloads submitted to the transcription endpoint.

use super::error::TranscriptionError;
use crate::recording::RecordedClip;
use std::path::Path;

/// File name used for clips recorded in the app.
pub const RECORDING_FILE_NAME: &str = "recording.wav";

/// Accepted upload extensions and the MIME type sent for each.
pub const SUPPORTED_FORMATS: &[(&str, &str)] = &[
    ("mp3", "audio/mpeg"),
    ("wav", "audio/wav"),
    ("m4a", "audio/mp4"),
    ("ogg", "audio/ogg"),
];

/// One audio file ready to be sent as the `audio` form part.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioUpload {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub mime_type: String,
}

impl AudioUpload {
    /// Wraps a recorded clip as `recording.wav`.
    ///
    /// # Errors
    /// - If the clip cannot be encoded as WAV
    pub fn recording(clip: &RecordedClip) -> Result<Self, TranscriptionError> {
        let bytes = clip
            .to_wav_bytes()
            .map_err(|e| TranscriptionError::Encode(e.to_string()))?;
        Ok(Self {
            bytes,
            file_name: RECORDING_FILE_NAME.to_string(),
            mime_type: "audio/wav".to_string(),
        })
    }

    /// Reads an audio file from disk.
    ///
    /// The format check happens before the file is read, so unsupported files
    /// are rejected without touching their contents.
    ///
    /// # Errors
    /// - `NotAudio` if the extension is not one of the supported formats
    /// - `Read` if the file cannot be read
    pub fn from_path(path: &Path) -> Result<Self, TranscriptionError> {
        let mime_type = mime_type_for(path).ok_or(TranscriptionError::NotAudio)?;
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "audio".to_string());

        tracing::debug!(
            "Prepared upload {} ({} bytes, {})",
            file_name,
            bytes.len(),
            mime_type
        );

        Ok(Self {
            bytes,
            file_name,
            mime_type: mime_type.to_string(),
        })
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Looks up the MIME type for a path by its (case-insensitive) extension.
pub fn mime_type_for(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    SUPPORTED_FORMATS
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, mime)| *mime)
}

/// Human-readable list of supported formats, e.g. "MP3, WAV, M4A, OGG".
pub fn supported_formats_label() -> String {
    SUPPORTED_FORMATS
        .iter()
        .map(|(ext, _)| ext.to_ascii_uppercase())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_type_lookup_is_case_insensitive() {
        assert_eq!(mime_type_for(Path::new("a/b/voice.MP3")), Some("audio/mpeg"));
        assert_eq!(mime_type_for(Path::new("memo.m4a")), Some("audio/mp4"));
        assert_eq!(mime_type_for(Path::new("notes.txt")), None);
        assert_eq!(mime_type_for(Path::new("no_extension")), None);
    }

    #[test]
    fn test_supported_formats_label() {
        assert_eq!(supported_formats_label(), "MP3, WAV, M4A, OGG");
    }

    #[test]
    fn test_from_path_rejects_non_audio_before_reading() {
        let err = AudioUpload::from_path(Path::new("/definitely/missing/file.pdf")).unwrap_err();
        assert!(matches!(err, TranscriptionError::NotAudio));
        assert_eq!(err.to_string(), "Please upload an audio file");
    }

    #[test]
    fn test_from_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memo.ogg");
        std::fs::write(&path, b"OggS....").unwrap();

        let upload = AudioUpload::from_path(&path).unwrap();
        assert_eq!(upload.file_name, "memo.ogg");
        assert_eq!(upload.mime_type, "audio/ogg");
        assert_eq!(upload.size(), 8);
    }

    #[test]
    fn test_from_path_missing_audio_file() {
        let err = AudioUpload::from_path(Path::new("/definitely/missing/file.wav")).unwrap_err();
        assert!(matches!(err, TranscriptionError::Read(_)));
    }

    #[test]
    fn test_recording_upload_is_wav() {
        let clip = RecordedClip::new(vec![0; 16], 16000);
        let upload = AudioUpload::recording(&clip).unwrap();
        assert_eq!(upload.file_name, RECORDING_FILE_NAME);
        assert_eq!(upload.mime_type, "audio/wav");
        assert_eq!(&upload.bytes[8..12], b"WAVE");
    }
}
