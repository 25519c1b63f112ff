//! App runners for interactive and scripted recording

use std::env;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration as StdDuration, Instant};

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::application::ports::ConfigStore;
use crate::application::{OperationOutcome, RecorderConfig, RecorderController};
use crate::domain::config::AppConfig;
use crate::domain::recorder::RecorderStatus;
use crate::domain::recording::Duration;
use crate::infrastructure::{default_recordings_dir, CpalAudioService, XdgConfigStore};

use super::presenter::Presenter;
use super::signals::shutdown_signal;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Environment variable overriding the recordings directory
pub const RECORDINGS_DIR_ENV: &str = "SOUND_MEMO_RECORDINGS_DIR";

const TICK: StdDuration = StdDuration::from_millis(100);

/// A key press in interactive mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Toggle,
    Play,
    Status,
    Quit,
}

impl Command {
    /// Map an input line to a command; blank lines toggle
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_lowercase().as_str() {
            "" | "1" => Some(Self::Toggle),
            "2" => Some(Self::Play),
            "s" => Some(Self::Status),
            "q" | "quit" | "exit" => Some(Self::Quit),
            _ => None,
        }
    }
}

type CpalController = RecorderController<CpalAudioService>;

/// Build the controller over the local audio devices
pub fn build_controller(config: &AppConfig) -> CpalController {
    let dir = config.recordings_dir().unwrap_or_else(default_recordings_dir);
    debug!(dir = %dir.display(), "Recordings directory");

    RecorderController::new(
        CpalAudioService::new(dir),
        RecorderConfig {
            preset: config.quality_or_default(),
            playback_during_recording: config.playback_during_recording_or_default(),
        },
    )
}

/// Run the interactive recorder until quit, Ctrl-C or end of input
pub async fn run_interactive(config: &AppConfig) -> ExitCode {
    let presenter = Presenter::new();
    let controller = Arc::new(build_controller(config));
    let mut views = controller.subscribe();

    presenter.info(&format!(
        "Recordings are stored in {}",
        controller.service().recordings_dir().display()
    ));
    presenter.render_controls(&controller.view());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            reason = &mut shutdown => {
                debug!(?reason, "Leaving interactive mode");
                break;
            }
            changed = views.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = views.borrow_and_update().clone();
                presenter.render_controls(&view);
            }
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        presenter.error(&format!("Failed to read input: {}", e));
                        break;
                    }
                };

                match Command::parse(&line) {
                    Some(Command::Quit) => break,
                    Some(Command::Status) => print_status(&controller, &presenter).await,
                    Some(Command::Play) if !controller.view().play_visible() => {
                        presenter.warn("Nothing recorded yet");
                    }
                    Some(command) => dispatch(Arc::clone(&controller), command),
                    None => presenter.warn(
                        "Press 1 or Enter to record, 2 to play, s for status, q to quit",
                    ),
                }
            }
        }
    }

    let outcome = controller.dispose().await;
    if outcome == OperationOutcome::Failed {
        presenter.error("Failed to release the recording on exit");
        return ExitCode::from(EXIT_ERROR);
    }
    ExitCode::from(EXIT_SUCCESS)
}

/// Run a controller operation without blocking input.
///
/// A key pressed while it is still running is reported as busy.
fn dispatch(controller: Arc<CpalController>, command: Command) {
    tokio::spawn(async move {
        let presenter = Presenter::new();
        let outcome = match command {
            Command::Toggle => match controller.status() {
                RecorderStatus::Idle => controller.start().await,
                RecorderStatus::Recording => controller.stop().await,
            },
            Command::Play => controller.play().await,
            Command::Status | Command::Quit => return,
        };
        report_outcome(&presenter, command, outcome);
    });
}

fn report_outcome(presenter: &Presenter, command: Command, outcome: OperationOutcome) {
    let action = match command {
        Command::Play => "Playback",
        _ => "Recording",
    };
    match outcome {
        OperationOutcome::Completed | OperationOutcome::Ignored => {}
        OperationOutcome::Failed => {
            presenter.error(&format!("{} failed, see log for details", action))
        }
        OperationOutcome::Busy => presenter.warn("Still working on the previous action"),
    }
}

async fn print_status(controller: &CpalController, presenter: &Presenter) {
    let view = controller.view();
    presenter.key_value("status", view.status.as_str());
    presenter.key_value(
        "last recording",
        view.last_location
            .as_ref()
            .map(|l| l.as_str())
            .unwrap_or("(none)"),
    );
    presenter.key_value("recordings", &view.recordings_completed.to_string());
    presenter.key_value("playing", &controller.is_playing().await.to_string());
}

/// Record for the configured duration, print the location, optionally play it
pub async fn run_record(config: &AppConfig, play: bool) -> ExitCode {
    let mut presenter = Presenter::new();

    let duration = match config.duration.as_deref() {
        Some(s) => match s.parse::<Duration>() {
            Ok(d) => d,
            Err(e) => {
                presenter.error(&format!("Invalid duration: {}", e));
                return ExitCode::from(EXIT_USAGE_ERROR);
            }
        },
        None => Duration::default_duration(),
    };

    let controller = build_controller(config);
    if controller.start().await != OperationOutcome::Completed {
        presenter.error("Could not start recording, see log for details");
        controller.dispose().await;
        return ExitCode::from(EXIT_ERROR);
    }

    presenter.start_spinner("Recording...");
    let interrupted = wait_for_duration(&presenter, duration).await;

    if controller.stop().await != OperationOutcome::Completed {
        presenter.spinner_fail("Failed to store the recording");
        controller.dispose().await;
        return ExitCode::from(EXIT_ERROR);
    }
    presenter.spinner_success("Recording stored");

    if let Some(location) = controller.view().last_location {
        presenter.output(location.as_str());
    }

    if play && !interrupted {
        play_to_end(&controller, &presenter).await;
    }

    controller.dispose().await;
    ExitCode::from(EXIT_SUCCESS)
}

/// Tick the progress bar until the duration elapses. Returns true on Ctrl-C.
async fn wait_for_duration(presenter: &Presenter, duration: Duration) -> bool {
    let total = duration.as_std();
    let started = Instant::now();
    let mut ticker = tokio::time::interval(TICK);
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                presenter.update_spinner("Interrupted, stopping...");
                return true;
            }
            _ = ticker.tick() => {
                let elapsed = started.elapsed();
                if elapsed >= total {
                    return false;
                }
                presenter.update_recording_progress(millis(elapsed), duration.as_millis());
            }
        }
    }
}

fn millis(duration: StdDuration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

async fn play_to_end(controller: &CpalController, presenter: &Presenter) {
    if controller.play().await != OperationOutcome::Completed {
        presenter.error("Playback failed, see log for details");
        return;
    }
    presenter.info("Playing...");

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            _ = &mut shutdown => return,
            _ = tokio::time::sleep(TICK) => {
                if !controller.is_playing().await {
                    return;
                }
            }
        }
    }
}

/// Load and merge configuration from file, env, and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = match store.load().await {
        Ok(config) => config,
        Err(e) => {
            Presenter::new().warn(&format!("Ignoring config file: {}", e));
            AppConfig::empty()
        }
    };

    let env_config = AppConfig {
        recordings_dir: env::var(RECORDINGS_DIR_ENV).ok().filter(|s| !s.is_empty()),
        ..Default::default()
    };

    // Merge: defaults < file < env < cli
    AppConfig::defaults()
        .merge(file_config)
        .merge(env_config)
        .merge(cli_config)
}
