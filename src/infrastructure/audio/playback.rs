//! Playback session backed by rodio
//!
//! The rodio output stream is not Send either, so it is owned by a playback
//! thread that takes commands over a channel and reports whether the sink
//! still has sound queued.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc as std_mpsc;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use tokio::sync::oneshot;
use tracing::debug;

use crate::application::ports::{AudioError, PlaybackSession};

/// How often the playback thread refreshes the playing flag
const POLL_INTERVAL: Duration = Duration::from_millis(50);

enum PlaybackCommand {
    PlayFromStart(oneshot::Sender<Result<(), AudioError>>),
    Release,
}

/// A loaded recording on the default output device
pub struct RodioPlayback {
    commands: std_mpsc::Sender<PlaybackCommand>,
    playing: Arc<AtomicBool>,
    released: bool,
}

impl RodioPlayback {
    /// Open the output device and check that the file decodes.
    pub async fn open(path: PathBuf) -> Result<Self, AudioError> {
        let (ready_tx, ready_rx) = oneshot::channel();
        let (commands, command_rx) = std_mpsc::channel();
        let playing = Arc::new(AtomicBool::new(false));
        let playing_flag = Arc::clone(&playing);

        std::thread::Builder::new()
            .name("sound-memo-playback".to_string())
            .spawn(move || {
                let (_stream, handle) = match OutputStream::try_default() {
                    Ok(output) => output,
                    Err(e) => {
                        let _ = ready_tx.send(Err(AudioError::ResourceError(format!(
                            "Audio output not available: {}",
                            e
                        ))));
                        return;
                    }
                };
                if let Err(e) = decode(&path) {
                    let _ = ready_tx.send(Err(e));
                    return;
                }
                let _ = ready_tx.send(Ok(()));

                run_playback_loop(&handle, &path, command_rx, &playing_flag);
            })
            .map_err(|e| {
                AudioError::ResourceError(format!("Failed to spawn playback thread: {}", e))
            })?;

        ready_rx.await.map_err(|_| {
            AudioError::ResourceError("Playback thread exited early".to_string())
        })??;

        Ok(Self {
            commands,
            playing,
            released: false,
        })
    }
}

#[async_trait]
impl PlaybackSession for RodioPlayback {
    async fn play_from_start(&mut self) -> Result<(), AudioError> {
        if self.released {
            return Err(AudioError::ResourceError(
                "Playback already released".to_string(),
            ));
        }

        let (reply_tx, reply_rx) = oneshot::channel();
        self.commands
            .send(PlaybackCommand::PlayFromStart(reply_tx))
            .map_err(|_| AudioError::ResourceError("Playback thread is gone".to_string()))?;

        reply_rx
            .await
            .map_err(|_| AudioError::ResourceError("Playback thread is gone".to_string()))??;
        self.playing.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn release(&mut self) -> Result<(), AudioError> {
        if !self.released {
            self.released = true;
            self.playing.store(false, Ordering::SeqCst);
            // The thread may already have exited; nothing left to free then
            let _ = self.commands.send(PlaybackCommand::Release);
        }
        Ok(())
    }

    fn is_playing(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }
}

impl Drop for RodioPlayback {
    fn drop(&mut self) {
        if !self.released {
            let _ = self.commands.send(PlaybackCommand::Release);
        }
    }
}

fn run_playback_loop(
    handle: &OutputStreamHandle,
    path: &Path,
    commands: std_mpsc::Receiver<PlaybackCommand>,
    playing: &AtomicBool,
) {
    let mut sink: Option<Sink> = None;

    loop {
        match commands.recv_timeout(POLL_INTERVAL) {
            Ok(PlaybackCommand::PlayFromStart(reply)) => {
                // Dropping the old sink stops it
                sink = None;
                let result = start_sink(handle, path).map(|new_sink| {
                    sink = Some(new_sink);
                });
                let _ = reply.send(result);
            }
            Ok(PlaybackCommand::Release) | Err(std_mpsc::RecvTimeoutError::Disconnected) => {
                break;
            }
            Err(std_mpsc::RecvTimeoutError::Timeout) => {}
        }

        let busy = sink.as_ref().is_some_and(|s| !s.empty());
        playing.store(busy, Ordering::SeqCst);
    }

    if let Some(sink) = sink {
        sink.stop();
    }
    playing.store(false, Ordering::SeqCst);
    debug!(path = %path.display(), "Playback released");
}

fn start_sink(handle: &OutputStreamHandle, path: &Path) -> Result<Sink, AudioError> {
    let sink = Sink::try_new(handle)
        .map_err(|e| AudioError::ResourceError(format!("Playback failed: {}", e)))?;
    sink.append(decode(path)?);
    Ok(sink)
}

fn decode(path: &Path) -> Result<Decoder<BufReader<File>>, AudioError> {
    let file = File::open(path).map_err(|e| {
        AudioError::ResourceError(format!("Failed to open {}: {}", path.display(), e))
    })?;
    Decoder::new(BufReader::new(file)).map_err(|e| {
        AudioError::ResourceError(format!("Failed to decode {}: {}", path.display(), e))
    })
}
