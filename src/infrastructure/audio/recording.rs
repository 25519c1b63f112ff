//! Recording session backed by a cpal input stream
//!
//! cpal::Stream is not Send, so the stream lives on a dedicated thread that
//! keeps it open until the session asks it to stop.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc as std_mpsc;
use std::sync::{Arc, Mutex as StdMutex};
use std::thread::JoinHandle;

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, SampleRate, StreamConfig, SupportedStreamConfigRange};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use super::wav::{remix_channels, write_wav};
use crate::application::ports::{AudioError, RecordingSession};
use crate::domain::recording::{QualityPreset, RecordingLocation};

/// Shape of the samples the device actually delivers
#[derive(Debug, Clone, Copy)]
struct CaptureFormat {
    sample_rate: u32,
    channels: u16,
}

struct CaptureThread {
    stop_tx: std_mpsc::Sender<()>,
    handle: JoinHandle<()>,
}

/// Active recording from the default input device
pub struct CpalRecordingSession {
    path: PathBuf,
    preset: QualityPreset,
    format: CaptureFormat,
    /// Interleaved samples at the device rate and channel count
    samples: Arc<StdMutex<Vec<i16>>>,
    capture: Option<CaptureThread>,
    /// Shared with the audio service; cleared once the device is released
    device_in_use: Arc<AtomicBool>,
    /// Set once nothing is left to stop or write
    released: bool,
    location: Option<RecordingLocation>,
}

impl CpalRecordingSession {
    /// Open the input stream and start capturing.
    pub(super) async fn start(
        preset: QualityPreset,
        path: PathBuf,
        device_in_use: Arc<AtomicBool>,
    ) -> Result<Self, AudioError> {
        let samples = Arc::new(StdMutex::new(Vec::new()));
        let buffer = Arc::clone(&samples);
        let (ready_tx, ready_rx) = oneshot::channel();
        let (stop_tx, stop_rx) = std_mpsc::channel::<()>();

        let handle = std::thread::Builder::new()
            .name("sound-memo-capture".to_string())
            .spawn(move || {
                let stream = match open_input_stream(preset, buffer) {
                    Ok((stream, format)) => {
                        let _ = ready_tx.send(Ok(format));
                        stream
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };

                // Returns on stop or when the session is dropped
                let _ = stop_rx.recv();
                drop(stream);
            })
            .map_err(|e| {
                AudioError::DeviceError(format!("Failed to spawn capture thread: {}", e))
            })?;

        let format = ready_rx
            .await
            .map_err(|_| AudioError::DeviceError("Capture thread exited early".to_string()))??;

        info!(
            path = %path.display(),
            sample_rate = format.sample_rate,
            channels = format.channels,
            "Audio capture started"
        );

        Ok(Self {
            path,
            preset,
            format,
            samples,
            capture: Some(CaptureThread { stop_tx, handle }),
            device_in_use,
            released: false,
            location: None,
        })
    }

    async fn stop_capture(&mut self) -> Result<(), AudioError> {
        let Some(capture) = self.capture.take() else {
            return Ok(());
        };

        let _ = capture.stop_tx.send(());
        let joined = tokio::task::spawn_blocking(move || capture.handle.join())
            .await
            .map_err(|e| AudioError::ResourceError(format!("Task join error: {}", e)))?;
        self.device_in_use.store(false, Ordering::SeqCst);

        if joined.is_err() {
            return Err(AudioError::ResourceError(
                "Capture thread panicked".to_string(),
            ));
        }
        debug!("Audio capture stopped");
        Ok(())
    }
}

#[async_trait]
impl RecordingSession for CpalRecordingSession {
    async fn stop_and_release(&mut self) -> Result<(), AudioError> {
        if self.released {
            return Err(AudioError::ResourceError(
                "Recording already released".to_string(),
            ));
        }

        self.stop_capture().await?;

        let samples = {
            let mut buffer = self.samples.lock().unwrap_or_else(|e| e.into_inner());
            std::mem::take(&mut *buffer)
        };
        if samples.is_empty() {
            // Nothing was captured and the device is closed; not retryable
            self.released = true;
            return Err(AudioError::ResourceError(
                "No audio data captured".to_string(),
            ));
        }

        let path = self.path.clone();
        let format = self.format;
        let channels = self.preset.channels();
        let written = tokio::task::spawn_blocking(move || {
            let pcm = remix_channels(&samples, format.channels, channels);
            write_wav(&path, &pcm, format.sample_rate, channels).map_err(|e| (e, samples))
        })
        .await
        .map_err(|e| AudioError::ResourceError(format!("Encode task error: {}", e)))?;

        if let Err((e, samples)) = written {
            // Keep the audio so a retry can write it again
            *self.samples.lock().unwrap_or_else(|e| e.into_inner()) = samples;
            return Err(e);
        }

        info!(path = %self.path.display(), "Recording written");
        self.released = true;
        let location = RecordingLocation::from_path(&self.path)
            .map_err(|e| AudioError::ResourceError(e.to_string()))?;
        self.location = Some(location);
        Ok(())
    }

    fn is_released(&self) -> bool {
        self.released
    }

    fn location(&self) -> Option<RecordingLocation> {
        self.location.clone()
    }
}

impl Drop for CpalRecordingSession {
    fn drop(&mut self) {
        if let Some(capture) = self.capture.take() {
            warn!("Recording session dropped without being stopped");
            let _ = capture.stop_tx.send(());
            self.device_in_use.store(false, Ordering::SeqCst);
        }
    }
}

fn open_input_stream(
    preset: QualityPreset,
    buffer: Arc<StdMutex<Vec<i16>>>,
) -> Result<(cpal::Stream, CaptureFormat), AudioError> {
    let host = cpal::default_host();
    let device = host
        .default_input_device()
        .ok_or_else(|| AudioError::DeviceError("No input device available".to_string()))?;

    let (config, sample_format) = select_input_config(&device, preset)?;
    let format = CaptureFormat {
        sample_rate: config.sample_rate.0,
        channels: config.channels,
    };

    let on_error = |err: cpal::StreamError| tracing::error!("Audio stream error: {}", err);

    let stream = match sample_format {
        SampleFormat::I16 => device.build_input_stream(
            &config,
            move |data: &[i16], _: &cpal::InputCallbackInfo| {
                if let Ok(mut samples) = buffer.lock() {
                    samples.extend_from_slice(data);
                }
            },
            on_error,
            None,
        ),
        SampleFormat::F32 => device.build_input_stream(
            &config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                if let Ok(mut samples) = buffer.lock() {
                    samples.extend(data.iter().map(|&s| (s.clamp(-1.0, 1.0) * 32767.0) as i16));
                }
            },
            on_error,
            None,
        ),
        other => {
            return Err(AudioError::DeviceError(format!(
                "Unsupported sample format: {:?}",
                other
            )))
        }
    }
    .map_err(|e| AudioError::DeviceError(e.to_string()))?;

    stream
        .play()
        .map_err(|e| AudioError::DeviceError(e.to_string()))?;

    Ok((stream, format))
}

/// Pick the input config closest to the preset.
///
/// Ranges that contain the preset rate win, then the closest channel count.
fn select_input_config(
    device: &cpal::Device,
    preset: QualityPreset,
) -> Result<(StreamConfig, SampleFormat), AudioError> {
    let target_rate = preset.sample_rate();
    let target_channels = preset.channels();

    let ranges = device
        .supported_input_configs()
        .map_err(|e| AudioError::DeviceError(format!("Failed to get configs: {}", e)))?
        .filter(|range| matches!(range.sample_format(), SampleFormat::I16 | SampleFormat::F32));

    let score = |range: &SupportedStreamConfigRange| {
        let includes_rate =
            range.min_sample_rate().0 <= target_rate && range.max_sample_rate().0 >= target_rate;
        let channel_distance = range.channels().abs_diff(target_channels);
        (!includes_rate, channel_distance)
    };

    let best = ranges
        .min_by_key(|range| score(range))
        .ok_or_else(|| AudioError::DeviceError("No suitable input config found".to_string()))?;

    let sample_rate = target_rate.clamp(best.min_sample_rate().0, best.max_sample_rate().0);
    let config = StreamConfig {
        channels: best.channels(),
        sample_rate: SampleRate(sample_rate),
        buffer_size: cpal::BufferSize::Default,
    };

    Ok((config, best.sample_format()))
}
