//! JSON bodies exchanged with the transcription endpoint.
//!
//! The same types are serialized by the stub server and deserialized by the client.

use serde::{Deserialize, Serialize};

/// Successful transcription response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptionResponse {
    pub success: bool,
    pub transcription: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<FileMetadata>,
}

/// Details about the uploaded file echoed back by the endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata {
    pub file_name: String,
    pub file_size: u64,
    pub file_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

/// Error body returned with non-2xx responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_uses_camel_case_and_omits_missing_duration() {
        let response = TranscriptionResponse {
            success: true,
            transcription: "hello".to_string(),
            metadata: Some(FileMetadata {
                file_name: "recording.wav".to_string(),
                file_size: 44,
                file_type: "audio/wav".to_string(),
                duration: None,
            }),
        };

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["metadata"]["fileName"], "recording.wav");
        assert_eq!(value["metadata"]["fileSize"], 44);
        assert_eq!(value["metadata"]["fileType"], "audio/wav");
        assert!(value["metadata"].get("duration").is_none());
    }

    #[test]
    fn test_response_without_metadata_parses() {
        let response: TranscriptionResponse =
            serde_json::from_str(r#"{"success":true,"transcription":"hi"}"#).unwrap();
        assert_eq!(response.transcription, "hi");
        assert!(response.metadata.is_none());
    }
}
