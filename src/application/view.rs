//! Renderable snapshot of the recorder controls

use crate::domain::recorder::RecorderStatus;
use crate::domain::recording::RecordingLocation;

pub const START_RECORDING_LABEL: &str = "Start Recording";
pub const STOP_RECORDING_LABEL: &str = "Stop Recording";
pub const PLAY_LAST_LABEL: &str = "Play the last sound";

/// What the UI shows after each controller change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControllerView {
    pub status: RecorderStatus,
    pub last_location: Option<RecordingLocation>,
    /// Recordings stored since the controller was created
    pub recordings_completed: u64,
    pub playback_loaded: bool,
    pub disposed: bool,
}

impl ControllerView {
    /// Label of the start/stop toggle button
    pub fn toggle_label(&self) -> &'static str {
        match self.status {
            RecorderStatus::Idle => START_RECORDING_LABEL,
            RecorderStatus::Recording => STOP_RECORDING_LABEL,
        }
    }

    /// The play button only exists once something was recorded
    pub fn play_visible(&self) -> bool {
        !self.disposed && self.last_location.is_some()
    }
}
