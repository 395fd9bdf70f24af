//! Stop signal for the `realm watch` loop.
//!
//! The watcher ticks the crowded-realm check until SIGINT/SIGTERM arrives or
//! a caller stops it; both paths go through [`ShutdownController`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::signal;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// One-shot stop signal shared by the watcher and its helper tasks.
pub struct ShutdownController {
    tx: broadcast::Sender<()>,
    stopped: AtomicBool,
}

impl ShutdownController {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self {
            tx,
            stopped: AtomicBool::new(false),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Whether the stop signal has fired.
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Fire the stop signal. Later calls are no-ops.
    pub fn shutdown(&self) {
        if !self.stopped.swap(true, Ordering::SeqCst) {
            let _ = self.tx.send(());
        }
    }

    /// Resolves once the stop signal has fired, even if it fired before the
    /// call.
    pub async fn stopped(&self) {
        let mut rx = self.subscribe();
        if self.is_stopped() {
            return;
        }
        let _ = rx.recv().await;
    }

    /// Stop on the first SIGINT or SIGTERM.
    pub fn listen_for_signals(self: &Arc<Self>) -> JoinHandle<()> {
        let controller = Arc::clone(self);
        tokio::spawn(async move { controller.wait_for_signal().await })
    }

    async fn wait_for_signal(&self) {
        #[cfg(unix)]
        let terminate = async {
            match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    sigterm.recv().await;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "SIGTERM handler unavailable");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = signal::ctrl_c() => tracing::info!("received SIGINT, leaving realm watch"),
            _ = terminate => tracing::info!("received SIGTERM, leaving realm watch"),
        }

        self.shutdown();
    }
}

impl Default for ShutdownController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn shutdown_reaches_every_subscriber() {
        let controller = ShutdownController::new();
        let mut first = controller.subscribe();
        let mut second = controller.subscribe();
        controller.shutdown();
        assert!(first.recv().await.is_ok());
        assert!(second.recv().await.is_ok());
        assert!(controller.is_stopped());
    }

    #[tokio::test]
    async fn stopped_resolves_after_the_fact() {
        let controller = ShutdownController::new();
        controller.shutdown();
        controller.shutdown();
        tokio::time::timeout(Duration::from_secs(1), controller.stopped())
            .await
            .unwrap();
    }
}
