//! Audio service port interfaces
//!
//! The audio service owns permissions, devices and files. The recorder only
//! sequences calls into it and keeps the handles it returns.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::recorder::PermissionState;
use crate::domain::recording::{AudioMode, QualityPreset, RecordingLocation};

/// Errors reported by the audio service
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AudioError {
    #[error("Microphone permission denied")]
    PermissionDenied,

    #[error("Recording device unavailable: {0}")]
    DeviceError(String),

    #[error("Audio resource error: {0}")]
    ResourceError(String),
}

/// Port for the platform audio service
#[async_trait]
pub trait AudioService: Send + Sync {
    /// Current microphone permission, without prompting.
    fn query_permission(&self) -> PermissionState;

    /// Ask for microphone permission and return the resulting state.
    async fn request_permission(&self) -> Result<PermissionState, AudioError>;

    /// Apply the audio mode used for the next recording.
    async fn configure_mode(&self, mode: AudioMode) -> Result<(), AudioError>;

    /// Start a new recording.
    ///
    /// # Errors
    /// `DeviceError` if the input device is missing, busy or not allowed by the
    /// current mode.
    async fn begin_recording(
        &self,
        preset: QualityPreset,
    ) -> Result<Box<dyn RecordingSession>, AudioError>;

    /// Load a finished recording for playback.
    async fn create_playback(
        &self,
        location: &RecordingLocation,
    ) -> Result<Box<dyn PlaybackSession>, AudioError>;
}

/// Handle to an active recording
#[async_trait]
pub trait RecordingSession: Send + Sync {
    /// Stop capturing and release the input device.
    ///
    /// The location becomes available once this succeeds. A failure that
    /// leaves [`is_released`](Self::is_released) false can be retried.
    async fn stop_and_release(&mut self) -> Result<(), AudioError>;

    /// Whether the input device has been given back, even if storing failed
    fn is_released(&self) -> bool;

    /// Where the finished recording was stored
    fn location(&self) -> Option<RecordingLocation>;
}

/// Handle to a loaded recording
#[async_trait]
pub trait PlaybackSession: Send + Sync {
    /// Rewind to offset 0 and start playing.
    async fn play_from_start(&mut self) -> Result<(), AudioError>;

    /// Stop playing and free the output resources.
    async fn release(&mut self) -> Result<(), AudioError>;

    fn is_playing(&self) -> bool;
}
