//! Audio infrastructure adapters
//!
//! Records from the default input device with cpal, stores recordings as WAV
//! files and plays them back with rodio.

mod cpal_service;
mod playback;
mod recording;
mod wav;

use std::path::PathBuf;

pub use cpal_service::CpalAudioService;
pub use playback::RodioPlayback;
pub use recording::CpalRecordingSession;
pub use wav::{remix_channels, write_wav};

/// Directory used for recordings when none is configured
pub fn default_recordings_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sound-memo")
        .join("recordings")
}
