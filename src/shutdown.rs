//! Process signal handling.
//!
//! SIGINT and SIGTERM (or Ctrl+C on non-unix targets) cancel the shared
//! interrupt token. The loop driver observes the token at its safe points.

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Cancel `interrupt` when the process receives a termination signal.
///
/// The task exits without touching the token if it is cancelled first.
pub fn spawn_signal_watcher(interrupt: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            _ = interrupt.cancelled() => {}
            received = wait_for_signal() => match received {
                Ok(name) => {
                    log::info!("[shutdown] signal_received: {}", name);
                    interrupt.cancel();
                }
                // Key presses still reach the dashboard; only signals are lost.
                Err(e) => log::warn!("[shutdown] signal_handler_failed: error={}", e),
            },
        }
    })
}

#[cfg(unix)]
async fn wait_for_signal() -> std::io::Result<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;

    tokio::select! {
        _ = interrupt.recv() => Ok("SIGINT"),
        _ = terminate.recv() => Ok("SIGTERM"),
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> std::io::Result<&'static str> {
    tokio::signal::ctrl_c().await?;
    Ok("ctrl-c")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_watcher_stops_when_token_cancelled() {
        let interrupt = CancellationToken::new();
        let handle = spawn_signal_watcher(interrupt.clone());

        interrupt.cancel();
        handle.await.unwrap();
        assert!(interrupt.is_cancelled());
    }
}
