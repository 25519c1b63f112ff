//! Recorder controller behaviour through the public API

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use sound_memo::application::ports::{
    AudioError, AudioService, PlaybackSession, RecordingSession,
};
use sound_memo::application::{OperationOutcome, RecorderConfig, RecorderController};
use sound_memo::domain::recorder::{PermissionState, RecorderStatus};
use sound_memo::domain::recording::{AudioMode, QualityPreset, RecordingLocation};

#[derive(Default)]
struct Counters {
    active_recordings: AtomicUsize,
    max_active_recordings: AtomicUsize,
    begins: AtomicUsize,
    stop_and_release: AtomicUsize,
    permission_requests: AtomicUsize,
    playbacks_created: AtomicUsize,
}

struct ScriptedService {
    counters: Arc<Counters>,
    permission: Mutex<PermissionState>,
    grant: bool,
    presets: Mutex<Vec<QualityPreset>>,
}

impl ScriptedService {
    fn new(permission: PermissionState, grant: bool) -> Self {
        Self {
            counters: Arc::new(Counters::default()),
            permission: Mutex::new(permission),
            grant,
            presets: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl AudioService for ScriptedService {
    fn query_permission(&self) -> PermissionState {
        *self.permission.lock().unwrap()
    }

    async fn request_permission(&self) -> Result<PermissionState, AudioError> {
        self.counters
            .permission_requests
            .fetch_add(1, Ordering::SeqCst);
        let state = if self.grant {
            PermissionState::Granted
        } else {
            PermissionState::Denied
        };
        *self.permission.lock().unwrap() = state;
        Ok(state)
    }

    async fn configure_mode(&self, mode: AudioMode) -> Result<(), AudioError> {
        assert!(mode.allows_recording);
        Ok(())
    }

    async fn begin_recording(
        &self,
        preset: QualityPreset,
    ) -> Result<Box<dyn RecordingSession>, AudioError> {
        self.presets.lock().unwrap().push(preset);
        let n = self.counters.begins.fetch_add(1, Ordering::SeqCst) + 1;
        let active = self
            .counters
            .active_recordings
            .fetch_add(1, Ordering::SeqCst)
            + 1;
        self.counters
            .max_active_recordings
            .fetch_max(active, Ordering::SeqCst);

        Ok(Box::new(ScriptedRecording {
            counters: Arc::clone(&self.counters),
            uri: format!("file:///memos/{}.wav", n),
            released: false,
        }))
    }

    async fn create_playback(
        &self,
        location: &RecordingLocation,
    ) -> Result<Box<dyn PlaybackSession>, AudioError> {
        assert!(!location.as_str().is_empty());
        self.counters
            .playbacks_created
            .fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(ScriptedPlayback { playing: false }))
    }
}

struct ScriptedRecording {
    counters: Arc<Counters>,
    uri: String,
    released: bool,
}

#[async_trait]
impl RecordingSession for ScriptedRecording {
    async fn stop_and_release(&mut self) -> Result<(), AudioError> {
        assert!(!self.released, "session released twice");
        self.counters
            .stop_and_release
            .fetch_add(1, Ordering::SeqCst);
        self.counters
            .active_recordings
            .fetch_sub(1, Ordering::SeqCst);
        self.released = true;
        Ok(())
    }

    fn is_released(&self) -> bool {
        self.released
    }

    fn location(&self) -> Option<RecordingLocation> {
        self.released
            .then(|| RecordingLocation::new(self.uri.clone()).unwrap())
    }
}

struct ScriptedPlayback {
    playing: bool,
}

#[async_trait]
impl PlaybackSession for ScriptedPlayback {
    async fn play_from_start(&mut self) -> Result<(), AudioError> {
        self.playing = true;
        Ok(())
    }

    async fn release(&mut self) -> Result<(), AudioError> {
        self.playing = false;
        Ok(())
    }

    fn is_playing(&self) -> bool {
        self.playing
    }
}

fn granted_controller() -> (RecorderController<ScriptedService>, Arc<Counters>) {
    let service = ScriptedService::new(PermissionState::Granted, true);
    let counters = Arc::clone(&service.counters);
    (
        RecorderController::new(service, RecorderConfig::default()),
        counters,
    )
}

#[derive(Debug, Clone, Copy)]
enum Op {
    Start,
    Stop,
    Play,
}

const OPS: [Op; 3] = [Op::Start, Op::Stop, Op::Play];

fn sequences(len: usize) -> Vec<Vec<Op>> {
    (0..len).fold(vec![Vec::new()], |acc, _| {
        acc.into_iter()
            .flat_map(|seq| {
                OPS.iter().map(move |op| {
                    let mut next = seq.clone();
                    next.push(*op);
                    next
                })
            })
            .collect()
    })
}

#[tokio::test]
async fn every_sequence_keeps_invariants() {
    for seq in sequences(5) {
        let (ctrl, counters) = granted_controller();
        let mut stopped_once = false;

        for op in &seq {
            let outcome = match op {
                Op::Start => ctrl.start().await,
                Op::Stop => ctrl.stop().await,
                Op::Play => ctrl.play().await,
            };

            match op {
                Op::Stop if outcome == OperationOutcome::Completed => stopped_once = true,
                Op::Play => {
                    let expected = if stopped_once {
                        OperationOutcome::Completed
                    } else {
                        OperationOutcome::Ignored
                    };
                    assert_eq!(outcome, expected, "play after {:?}", seq);
                }
                _ => {}
            }

            let view = ctrl.view();
            assert_eq!(view.play_visible(), stopped_once, "sequence {:?}", seq);
            assert!(counters.active_recordings.load(Ordering::SeqCst) <= 1);
        }

        assert!(counters.max_active_recordings.load(Ordering::SeqCst) <= 1);
        ctrl.dispose().await;
        assert_eq!(counters.active_recordings.load(Ordering::SeqCst), 0);
        assert_eq!(
            counters.stop_and_release.load(Ordering::SeqCst),
            counters.begins.load(Ordering::SeqCst),
            "every session released exactly once for {:?}",
            seq
        );
    }
}

#[tokio::test]
async fn start_stop_yields_non_empty_location() {
    let (ctrl, _) = granted_controller();

    ctrl.start().await;
    ctrl.stop().await;

    let location = ctrl.view().last_location.expect("location after stop");
    assert!(!location.as_str().is_empty());
}

#[tokio::test]
async fn stop_in_idle_changes_nothing() {
    let (ctrl, counters) = granted_controller();
    let before = ctrl.view();

    assert_eq!(ctrl.stop().await, OperationOutcome::Ignored);

    assert_eq!(ctrl.view(), before);
    assert_eq!(counters.stop_and_release.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn permission_denied_scenario() {
    let service = ScriptedService::new(PermissionState::Undetermined, false);
    let counters = Arc::clone(&service.counters);
    let ctrl = RecorderController::new(service, RecorderConfig::default());

    assert_eq!(ctrl.start().await, OperationOutcome::Failed);

    assert_eq!(counters.permission_requests.load(Ordering::SeqCst), 1);
    assert_eq!(counters.begins.load(Ordering::SeqCst), 0);
    assert_eq!(ctrl.status(), RecorderStatus::Idle);
    assert_eq!(ctrl.view().toggle_label(), "Start Recording");
    assert!(!ctrl.view().play_visible());
}

#[tokio::test]
async fn configured_preset_is_used() {
    let service = ScriptedService::new(PermissionState::Granted, true);
    let ctrl = RecorderController::new(
        service,
        RecorderConfig {
            preset: QualityPreset::Low,
            playback_during_recording: false,
        },
    );

    ctrl.start().await;

    assert_eq!(
        *ctrl.service().presets.lock().unwrap(),
        vec![QualityPreset::Low]
    );
    ctrl.dispose().await;
}

#[tokio::test]
async fn dispose_while_recording_stops_exactly_once() {
    let (ctrl, counters) = granted_controller();
    ctrl.start().await;

    assert_eq!(ctrl.dispose().await, OperationOutcome::Completed);
    assert_eq!(ctrl.dispose().await, OperationOutcome::Ignored);

    assert_eq!(counters.stop_and_release.load(Ordering::SeqCst), 1);
    assert_eq!(ctrl.start().await, OperationOutcome::Ignored);
    assert_eq!(counters.begins.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn play_while_recording_replays_previous_take() {
    let (ctrl, counters) = granted_controller();
    ctrl.start().await;
    ctrl.stop().await;
    ctrl.start().await;

    assert_eq!(ctrl.play().await, OperationOutcome::Completed);
    assert!(ctrl.is_playing().await);
    assert_eq!(
        ctrl.view().last_location.map(|l| l.as_str().to_string()),
        Some("file:///memos/1.wav".to_string())
    );
    assert_eq!(counters.playbacks_created.load(Ordering::SeqCst), 1);

    ctrl.dispose().await;
    assert!(!ctrl.is_playing().await);
}
