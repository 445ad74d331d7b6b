//! Graceful shutdown coordinator for leadgate
//!
//! Centralizes shutdown signaling for the server and its background tasks:
//! SIGINT/SIGTERM flip an atomic flag and fan out over a broadcast channel
//! that the sweep loop subscribes to.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{info, warn};

/// Shutdown coordinator shared between the server and background tasks
#[derive(Debug, Clone)]
pub struct ShutdownCoordinator {
    /// Set once shutdown has been initiated
    shutdown_initiated: Arc<AtomicBool>,
    /// Broadcast sender for shutdown signals
    shutdown_tx: broadcast::Sender<()>,
}

impl ShutdownCoordinator {
    pub fn new() -> Self {
        let (shutdown_tx, _) = broadcast::channel(8);

        Self {
            shutdown_initiated: Arc::new(AtomicBool::new(false)),
            shutdown_tx,
        }
    }

    pub fn is_shutdown_initiated(&self) -> bool {
        self.shutdown_initiated.load(Ordering::Relaxed)
    }

    /// Create a shutdown receiver for a background task
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Initiate graceful shutdown; idempotent
    pub fn initiate_shutdown(&self) {
        if !self.shutdown_initiated.swap(true, Ordering::Relaxed) {
            info!("Initiating graceful shutdown...");
            if let Err(e) = self.shutdown_tx.send(()) {
                warn!("Failed to send shutdown signal: {}", e);
            }
        }
    }

    /// Wait for SIGINT/SIGTERM (or a manual trigger), then initiate shutdown
    pub async fn wait_for_shutdown_signal(&self) {
        let ctrl_c = async {
            signal::ctrl_c()
                .await
                .expect("Failed to install Ctrl+C handler");
        };

        #[cfg(unix)]
        let terminate = async {
            signal::unix::signal(signal::unix::SignalKind::terminate())
                .expect("Failed to install SIGTERM handler")
                .recv()
                .await;
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                info!("Received Ctrl+C signal");
            }
            _ = terminate => {
                info!("Received SIGTERM signal");
            }
        }

        self.initiate_shutdown();
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

/// Background task wrapper that interleaves work with shutdown checks
pub struct ShutdownAwareTask {
    shutdown_rx: broadcast::Receiver<()>,
}

impl ShutdownAwareTask {
    pub fn new(coordinator: &ShutdownCoordinator) -> Self {
        Self {
            shutdown_rx: coordinator.subscribe(),
        }
    }

    /// Wait for either a shutdown signal (true) or the given duration (false)
    pub async fn wait_or_shutdown(&mut self, duration: tokio::time::Duration) -> bool {
        tokio::select! {
            _ = self.shutdown_rx.recv() => true,
            _ = tokio::time::sleep(duration) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{Duration, sleep};

    #[tokio::test]
    async fn coordinator_starts_clean() {
        let coordinator = ShutdownCoordinator::new();
        assert!(!coordinator.is_shutdown_initiated());
    }

    #[tokio::test]
    async fn initiation_reaches_subscribers() {
        let coordinator = ShutdownCoordinator::new();
        let mut receiver = coordinator.subscribe();

        coordinator.initiate_shutdown();

        assert!(coordinator.is_shutdown_initiated());
        assert!(receiver.recv().await.is_ok());
    }

    #[tokio::test]
    async fn initiation_is_idempotent() {
        let coordinator = ShutdownCoordinator::new();
        coordinator.initiate_shutdown();
        coordinator.initiate_shutdown();
        assert!(coordinator.is_shutdown_initiated());
    }

    #[tokio::test]
    async fn wait_or_shutdown_returns_true_on_signal() {
        let coordinator = ShutdownCoordinator::new();
        let mut task = ShutdownAwareTask::new(&coordinator);

        let task_handle =
            tokio::spawn(async move { task.wait_or_shutdown(Duration::from_secs(10)).await });

        tokio::spawn(async move {
            sleep(Duration::from_millis(50)).await;
            coordinator.initiate_shutdown();
        });

        assert!(task_handle.await.unwrap());
    }

    #[tokio::test]
    async fn wait_or_shutdown_returns_false_on_timeout() {
        let coordinator = ShutdownCoordinator::new();
        let mut task = ShutdownAwareTask::new(&coordinator);

        assert!(!task.wait_or_shutdown(Duration::from_millis(50)).await);
    }
}
