//! Audio session mode

/// Mode applied to the audio service before a recording starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioMode {
    /// Whether the input device may be opened for recording
    pub allows_recording: bool,
    /// Whether a recording can be played back while another one is running
    pub playback_during_recording: bool,
}

impl AudioMode {
    /// Mode used by the recorder when a recording starts
    pub const fn recording(playback_during_recording: bool) -> Self {
        Self {
            allows_recording: true,
            playback_during_recording,
        }
    }
}

impl Default for AudioMode {
    fn default() -> Self {
        Self {
            allows_recording: false,
            playback_during_recording: true,
        }
    }
}
