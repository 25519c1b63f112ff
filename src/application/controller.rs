//! Recorder controller use case
//!
//! Owns the recording and playback handles returned by the audio service and
//! exposes the three user operations plus teardown. Operations never return
//! errors: failures are logged at the operation boundary and reported as an
//! [`OperationOutcome`].

use thiserror::Error;
use tokio::sync::{watch, Mutex, MutexGuard};
use tracing::{debug, error, info, warn};

use crate::domain::recorder::{InvalidStateTransition, RecorderLifecycle, RecorderStatus};
use crate::domain::recording::{AudioMode, QualityPreset, RecordingLocation};

use super::ports::{AudioError, AudioService, PlaybackSession, RecordingSession};
use super::view::ControllerView;

/// Result of a controller operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationOutcome {
    /// The operation ran and state changed
    Completed,
    /// The operation ran, failed and was logged
    Failed,
    /// The operation does not apply to the current state
    Ignored,
    /// Another operation was still in flight
    Busy,
}

/// Errors caught at the controller boundary
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error(transparent)]
    Audio(#[from] AudioError),

    #[error(transparent)]
    InvalidState(#[from] InvalidStateTransition),

    #[error("Recording stopped but reported no location")]
    MissingLocation,
}

/// Settings applied when a recording starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecorderConfig {
    pub preset: QualityPreset,
    pub playback_during_recording: bool,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            preset: QualityPreset::High,
            playback_during_recording: true,
        }
    }
}

struct ControllerState {
    lifecycle: RecorderLifecycle,
    recording: Option<Box<dyn RecordingSession>>,
    last_location: Option<RecordingLocation>,
    playback: Option<Box<dyn PlaybackSession>>,
    disposed: bool,
}

impl ControllerState {
    fn new() -> Self {
        Self {
            lifecycle: RecorderLifecycle::new(),
            recording: None,
            last_location: None,
            playback: None,
            disposed: false,
        }
    }

    fn view(&self) -> ControllerView {
        ControllerView {
            status: self.lifecycle.status(),
            last_location: self.last_location.clone(),
            recordings_completed: self.lifecycle.recordings_completed(),
            playback_loaded: self.playback.is_some(),
            disposed: self.disposed,
        }
    }
}

/// Record/stop/play controller over an [`AudioService`].
///
/// State machine:
///   IDLE -> RECORDING (start)
///   RECORDING -> IDLE (stop, stores the recording location)
///   any -> playing overlay (play, once a location exists)
///
/// Only one operation runs at a time; an operation invoked while another is
/// in flight returns [`OperationOutcome::Busy`].
pub struct RecorderController<S: AudioService> {
    service: S,
    config: RecorderConfig,
    state: Mutex<ControllerState>,
    view_tx: watch::Sender<ControllerView>,
}

impl<S: AudioService> RecorderController<S> {
    pub fn new(service: S, config: RecorderConfig) -> Self {
        let state = ControllerState::new();
        let (view_tx, _) = watch::channel(state.view());

        Self {
            service,
            config,
            state: Mutex::new(state),
            view_tx,
        }
    }

    /// Latest published view
    pub fn view(&self) -> ControllerView {
        self.view_tx.borrow().clone()
    }

    pub fn status(&self) -> RecorderStatus {
        self.view_tx.borrow().status
    }

    /// Receive a new view after every state change
    pub fn subscribe(&self) -> watch::Receiver<ControllerView> {
        self.view_tx.subscribe()
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Whether the current playback session is producing sound
    pub async fn is_playing(&self) -> bool {
        self.state
            .lock()
            .await
            .playback
            .as_ref()
            .is_some_and(|playback| playback.is_playing())
    }

    /// Start a new recording (only from idle)
    pub async fn start(&self) -> OperationOutcome {
        info!(preset = %self.config.preset, "Start recording requested");
        let Some(mut state) = self.enter("start") else {
            return OperationOutcome::Busy;
        };
        if state.disposed {
            warn!("Start ignored: recorder already disposed");
            return OperationOutcome::Ignored;
        }
        if !state.lifecycle.is_idle() {
            warn!("Start ignored: a recording is already active");
            return OperationOutcome::Ignored;
        }

        match self.try_start(&mut state).await {
            Ok(()) => {
                info!("Recording started");
                self.publish(&state);
                OperationOutcome::Completed
            }
            Err(e) => {
                error!(error = %e, "Failed to start recording");
                OperationOutcome::Failed
            }
        }
    }

    /// Stop the active recording and remember where it was stored
    pub async fn stop(&self) -> OperationOutcome {
        info!("Stop recording requested");
        let Some(mut state) = self.enter("stop") else {
            return OperationOutcome::Busy;
        };
        if state.recording.is_none() {
            debug!("Stop ignored: nothing is recording");
            return OperationOutcome::Ignored;
        }

        let result = self.try_stop(&mut state).await;
        // A failed stop may still have changed state (session discarded)
        self.publish(&state);

        match result {
            Ok(location) => {
                info!(location = %location, "Recording stopped and stored");
                OperationOutcome::Completed
            }
            Err(e) => {
                error!(error = %e, "Failed to stop recording");
                OperationOutcome::Failed
            }
        }
    }

    /// Play the last stored recording from the beginning
    pub async fn play(&self) -> OperationOutcome {
        info!("Play requested");
        let Some(mut state) = self.enter("play") else {
            return OperationOutcome::Busy;
        };
        if state.disposed {
            warn!("Play ignored: recorder already disposed");
            return OperationOutcome::Ignored;
        }
        let Some(location) = state.last_location.clone() else {
            warn!("Play ignored: nothing has been recorded yet");
            return OperationOutcome::Ignored;
        };

        let result = self.try_play(&mut state, &location).await;
        self.publish(&state);

        match result {
            Ok(()) => {
                info!(location = %location, "Playing recorded sound");
                OperationOutcome::Completed
            }
            Err(e) => {
                error!(error = %e, location = %location, "Failed to play recording");
                OperationOutcome::Failed
            }
        }
    }

    /// Release everything the controller still owns.
    ///
    /// Runs once; later calls, and operations after it, are ignored. Waits for
    /// an in-flight operation to finish instead of rejecting.
    pub async fn dispose(&self) -> OperationOutcome {
        let mut state = self.state.lock().await;
        if state.disposed {
            return OperationOutcome::Ignored;
        }
        info!("Disposing recorder");
        state.disposed = true;

        let mut outcome = OperationOutcome::Completed;

        if let Some(mut session) = state.recording.take() {
            info!("Releasing active recording on teardown");
            match session.stop_and_release().await {
                Ok(()) => {
                    if let Some(location) = session.location() {
                        info!(location = %location, "Recording stored on teardown");
                        state.last_location = Some(location);
                        let _ = state.lifecycle.finish_recording();
                    } else {
                        let _ = state.lifecycle.abandon_recording();
                    }
                }
                Err(e) => {
                    error!(error = %e, "Failed to release recording on teardown");
                    let _ = state.lifecycle.abandon_recording();
                    outcome = OperationOutcome::Failed;
                }
            }
        }

        if let Some(mut playback) = state.playback.take() {
            if let Err(e) = playback.release().await {
                warn!(error = %e, "Failed to release playback on teardown");
            }
        }

        self.publish(&state);
        outcome
    }

    async fn try_start(&self, state: &mut ControllerState) -> Result<(), ControllerError> {
        let mut permission = self.service.query_permission();
        if !permission.is_granted() {
            info!(%permission, "Requesting microphone permission");
            permission = self.service.request_permission().await?;
        }
        debug!(%permission, "Microphone permission");
        if !permission.is_granted() {
            return Err(AudioError::PermissionDenied.into());
        }

        self.service
            .configure_mode(AudioMode::recording(self.config.playback_during_recording))
            .await?;

        let session = self.service.begin_recording(self.config.preset).await?;
        state.lifecycle.begin_recording()?;
        state.recording = Some(session);
        Ok(())
    }

    async fn try_stop(
        &self,
        state: &mut ControllerState,
    ) -> Result<RecordingLocation, ControllerError> {
        if let Some(session) = state.recording.as_mut() {
            if let Err(e) = session.stop_and_release().await {
                if session.is_released() {
                    warn!("Recording released without a stored file, discarding session");
                    state.recording = None;
                    state.lifecycle.abandon_recording()?;
                }
                // Otherwise the session stays owned so a retry or teardown can release it
                return Err(e.into());
            }
        }

        let location = state.recording.take().and_then(|session| session.location());
        match location {
            Some(location) => {
                state.lifecycle.finish_recording()?;
                state.last_location = Some(location.clone());
                Ok(location)
            }
            None => {
                state.lifecycle.abandon_recording()?;
                Err(ControllerError::MissingLocation)
            }
        }
    }

    async fn try_play(
        &self,
        state: &mut ControllerState,
        location: &RecordingLocation,
    ) -> Result<(), ControllerError> {
        if let Some(mut previous) = state.playback.take() {
            debug!("Releasing previous playback");
            if let Err(e) = previous.release().await {
                warn!(error = %e, "Failed to release previous playback");
            }
        }

        let mut playback = self.service.create_playback(location).await?;
        if let Err(e) = playback.play_from_start().await {
            let _ = playback.release().await;
            return Err(e.into());
        }
        state.playback = Some(playback);
        Ok(())
    }

    fn enter(&self, operation: &'static str) -> Option<MutexGuard<'_, ControllerState>> {
        match self.state.try_lock() {
            Ok(guard) => Some(guard),
            Err(_) => {
                warn!(operation, "Rejected: another operation is still in flight");
                None
            }
        }
    }

    fn publish(&self, state: &ControllerState) {
        self.view_tx.send_replace(state.view());
    }
}

impl<S: AudioService> Drop for RecorderController<S> {
    fn drop(&mut self) {
        let state = self.state.get_mut();
        if state.disposed {
            return;
        }
        state.disposed = true;

        let Some(mut session) = state.recording.take() else {
            return;
        };

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                warn!("Recorder dropped while recording, releasing in background");
                handle.spawn(async move {
                    if let Err(e) = session.stop_and_release().await {
                        error!(error = %e, "Failed to release recording after drop");
                    }
                });
            }
            Err(_) => {
                warn!("Recorder dropped outside a runtime, recording session dropped unreleased");
            }
        }
    }
}
