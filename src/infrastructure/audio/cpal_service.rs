//! Audio service for the local machine
//!
//! Permission is modelled on top of device availability: desktop hosts do not
//! prompt, so a present default input device counts as granted.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use cpal::traits::HostTrait;
use tracing::{debug, info};

use super::playback::RodioPlayback;
use super::recording::CpalRecordingSession;
use crate::application::ports::{AudioError, AudioService, PlaybackSession, RecordingSession};
use crate::domain::recorder::PermissionState;
use crate::domain::recording::{AudioMode, QualityPreset, RecordingLocation};

/// cpal/rodio implementation of the audio service
pub struct CpalAudioService {
    recordings_dir: PathBuf,
    permission: StdMutex<PermissionState>,
    mode: StdMutex<AudioMode>,
    recording_active: Arc<AtomicBool>,
}

impl CpalAudioService {
    pub fn new(recordings_dir: PathBuf) -> Self {
        Self {
            recordings_dir,
            permission: StdMutex::new(PermissionState::Undetermined),
            mode: StdMutex::new(AudioMode::default()),
            recording_active: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn recordings_dir(&self) -> &PathBuf {
        &self.recordings_dir
    }

    fn current_mode(&self) -> AudioMode {
        *self.mode.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn next_recording_path(&self) -> PathBuf {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        self.recordings_dir
            .join(format!("recording-{}.wav", millis))
    }
}

#[async_trait]
impl AudioService for CpalAudioService {
    fn query_permission(&self) -> PermissionState {
        *self.permission.lock().unwrap_or_else(|e| e.into_inner())
    }

    async fn request_permission(&self) -> Result<PermissionState, AudioError> {
        let has_input = tokio::task::spawn_blocking(|| {
            cpal::default_host().default_input_device().is_some()
        })
        .await
        .map_err(|e| AudioError::DeviceError(format!("Device probe failed: {}", e)))?;

        let state = if has_input {
            PermissionState::Granted
        } else {
            PermissionState::Denied
        };
        debug!(permission = %state, "Microphone permission resolved");

        *self.permission.lock().unwrap_or_else(|e| e.into_inner()) = state;
        Ok(state)
    }

    async fn configure_mode(&self, mode: AudioMode) -> Result<(), AudioError> {
        debug!(
            allows_recording = mode.allows_recording,
            playback_during_recording = mode.playback_during_recording,
            "Audio mode configured"
        );
        *self.mode.lock().unwrap_or_else(|e| e.into_inner()) = mode;
        Ok(())
    }

    async fn begin_recording(
        &self,
        preset: QualityPreset,
    ) -> Result<Box<dyn RecordingSession>, AudioError> {
        if !self.current_mode().allows_recording {
            return Err(AudioError::DeviceError(
                "Audio mode does not allow recording".to_string(),
            ));
        }
        if self.recording_active.swap(true, Ordering::SeqCst) {
            return Err(AudioError::DeviceError(
                "Another recording is already active".to_string(),
            ));
        }

        let started = async {
            tokio::fs::create_dir_all(&self.recordings_dir)
                .await
                .map_err(|e| {
                    AudioError::DeviceError(format!(
                        "Cannot create {}: {}",
                        self.recordings_dir.display(),
                        e
                    ))
                })?;
            let path = self.next_recording_path();
            CpalRecordingSession::start(preset, path, Arc::clone(&self.recording_active)).await
        }
        .await;

        match started {
            Ok(session) => {
                info!(preset = %preset, "Recording started");
                Ok(Box::new(session))
            }
            Err(e) => {
                self.recording_active.store(false, Ordering::SeqCst);
                Err(e)
            }
        }
    }

    async fn create_playback(
        &self,
        location: &RecordingLocation,
    ) -> Result<Box<dyn PlaybackSession>, AudioError> {
        if self.recording_active.load(Ordering::SeqCst)
            && !self.current_mode().playback_during_recording
        {
            return Err(AudioError::ResourceError(
                "Playback is not allowed while recording".to_string(),
            ));
        }

        let path = location.to_path().ok_or_else(|| {
            AudioError::ResourceError(format!("Not a local recording: {}", location))
        })?;
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Err(AudioError::ResourceError(format!(
                "Recording not found: {}",
                path.display()
            )));
        }

        let playback = RodioPlayback::open(path).await?;
        Ok(Box::new(playback))
    }
}
