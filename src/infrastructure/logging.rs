//! Tracing subscriber setup

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Environment variable that overrides the configured log filter
pub const LOG_ENV_VAR: &str = "SOUND_MEMO_LOG";

/// Valid values for the `log_level` config key
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Install the global subscriber, writing to stderr.
///
/// `SOUND_MEMO_LOG` wins over `RUST_LOG`, which wins over `level`.
/// `verbose` forces debug for this crate. Calling it twice is harmless.
pub fn init_logging(level: &str, verbose: bool) {
    let level = if verbose { "debug" } else { level };

    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_directive(level)));

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(filter);

    if tracing_subscriber::registry()
        .with(console_layer)
        .try_init()
        .is_ok()
    {
        tracing::debug!(level, "Logging initialized");
    }
}

fn default_directive(level: &str) -> String {
    let level = if LOG_LEVELS.contains(&level) {
        level
    } else {
        "info"
    };
    format!("sound_memo={},warn", level)
}
