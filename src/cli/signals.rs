//! Shutdown signal handling for the runners

use tracing::debug;

/// Why the runner is shutting down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    /// Ctrl-C
    Interrupt,
    /// SIGTERM (unix only)
    Terminate,
}

/// Resolve on the first shutdown signal.
///
/// If a handler cannot be installed, that signal source is never reported.
pub async fn shutdown_signal() -> ShutdownReason {
    let interrupt = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => ShutdownReason::Interrupt,
            Err(e) => {
                debug!(error = %e, "Ctrl-C handler unavailable");
                std::future::pending().await
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                ShutdownReason::Terminate
            }
            Err(e) => {
                debug!(error = %e, "SIGTERM handler unavailable");
                std::future::pending().await
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<ShutdownReason>();

    let reason = tokio::select! {
        reason = interrupt => reason,
        reason = terminate => reason,
    };
    debug!(?reason, "Shutdown signal received");
    reason
}
