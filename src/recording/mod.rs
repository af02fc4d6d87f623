//! Audio recording feature for tscribe.
//!
//! Provides audio capture, level metering, clip playback and the recorder
//! state tracked by the record page.

pub mod audio;
pub mod meter;
pub mod playback;
pub mod session;
pub mod status;

pub use audio::{AudioRecorder, RecordedClip};
pub use session::RecordSession;
pub use status::RecorderStatus;
