//! Transcription requests for recorded or uploaded audio.
//!
//! Audio is submitted to a single HTTP endpoint (by default the stub served by
//! `tscribe serve`). This module holds the wire types, the client, and the
//! submission state shared by the record and upload pages.

pub mod client;
pub mod error;
pub mod response;
pub mod state;
pub mod upload;

pub use client::TranscriptionClient;
pub use error::TranscriptionError;
pub use response::{ErrorBody, FileMetadata, TranscriptionResponse};
pub use state::{SubmissionOutcome, TranscriptionState};
pub use upload::AudioUpload;
