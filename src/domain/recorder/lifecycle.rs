//! Recorder lifecycle state machine

use std::fmt;
use thiserror::Error;

/// Record states of the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RecorderStatus {
    #[default]
    Idle,
    Recording,
}

impl RecorderStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Recording => "recording",
        }
    }
}

impl fmt::Display for RecorderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when an invalid state transition is attempted
#[derive(Debug, Clone, Error)]
#[error("Invalid state transition: cannot {action} while {current_state}")]
pub struct InvalidStateTransition {
    pub current_state: RecorderStatus,
    pub action: &'static str,
}

/// Recorder lifecycle entity.
///
/// State machine:
///   IDLE -> RECORDING (begin_recording)
///   RECORDING -> IDLE (finish_recording)
///   RECORDING -> IDLE (abandon_recording, nothing to play)
///
/// Playback is an overlay tracked separately; it does not change the record
/// state.
#[derive(Debug, Default)]
pub struct RecorderLifecycle {
    status: RecorderStatus,
    recordings_completed: u64,
}

impl RecorderLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> RecorderStatus {
        self.status
    }

    pub fn is_idle(&self) -> bool {
        self.status == RecorderStatus::Idle
    }

    pub fn is_recording(&self) -> bool {
        self.status == RecorderStatus::Recording
    }

    /// Number of recordings stopped successfully so far
    pub fn recordings_completed(&self) -> u64 {
        self.recordings_completed
    }

    /// Transition from IDLE to RECORDING
    pub fn begin_recording(&mut self) -> Result<(), InvalidStateTransition> {
        self.require(RecorderStatus::Idle, "start recording")?;
        self.status = RecorderStatus::Recording;
        Ok(())
    }

    /// Transition from RECORDING to IDLE after a successful stop
    pub fn finish_recording(&mut self) -> Result<(), InvalidStateTransition> {
        self.require(RecorderStatus::Recording, "stop recording")?;
        self.status = RecorderStatus::Idle;
        self.recordings_completed += 1;
        Ok(())
    }

    /// Transition from RECORDING back to IDLE without a finished recording
    pub fn abandon_recording(&mut self) -> Result<(), InvalidStateTransition> {
        self.require(RecorderStatus::Recording, "abandon recording")?;
        self.status = RecorderStatus::Idle;
        Ok(())
    }

    fn require(
        &self,
        expected: RecorderStatus,
        action: &'static str,
    ) -> Result<(), InvalidStateTransition> {
        if self.status != expected {
            return Err(InvalidStateTransition {
                current_state: self.status,
                action,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_lifecycle_is_idle_without_recordings() {
        let lifecycle = RecorderLifecycle::new();
        assert!(lifecycle.is_idle());
        assert_eq!(lifecycle.recordings_completed(), 0);
    }

    #[test]
    fn begin_then_finish_counts_recording() {
        let mut lifecycle = RecorderLifecycle::new();
        lifecycle.begin_recording().unwrap();
        assert!(lifecycle.is_recording());
        assert_eq!(lifecycle.recordings_completed(), 0);

        lifecycle.finish_recording().unwrap();
        assert!(lifecycle.is_idle());
        assert_eq!(lifecycle.recordings_completed(), 1);
    }

    #[test]
    fn begin_while_recording_fails() {
        let mut lifecycle = RecorderLifecycle::new();
        lifecycle.begin_recording().unwrap();

        let err = lifecycle.begin_recording().unwrap_err();
        assert_eq!(err.current_state, RecorderStatus::Recording);
        assert_eq!(err.action, "start recording");
    }

    #[test]
    fn finish_while_idle_fails() {
        let mut lifecycle = RecorderLifecycle::new();

        let err = lifecycle.finish_recording().unwrap_err();
        assert_eq!(err.current_state, RecorderStatus::Idle);
        assert!(err.to_string().contains("stop recording"));
    }

    #[test]
    fn abandon_does_not_count_as_finished() {
        let mut lifecycle = RecorderLifecycle::new();
        lifecycle.begin_recording().unwrap();
        lifecycle.abandon_recording().unwrap();
        assert!(lifecycle.is_idle());
        assert_eq!(lifecycle.recordings_completed(), 0);
    }

    #[test]
    fn status_display() {
        assert_eq!(RecorderStatus::Idle.to_string(), "idle");
        assert_eq!(RecorderStatus::Recording.to_string(), "recording");
    }
}
