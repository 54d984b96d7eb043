//! Graceful shutdown handling

use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Shutdown coordinator backed by a cancellation token
pub struct ShutdownCoordinator {
    token: CancellationToken,
}

impl ShutdownCoordinator {
    /// Create a new shutdown coordinator
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }

    /// Wait for Ctrl+C, SIGTERM or a manual shutdown
    pub async fn wait_for_signal(&self) {
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
            _ = self.token.cancelled() => {
                info!("Shutdown already triggered");
            }
        }

        self.shutdown();
    }

    /// Trigger shutdown manually
    pub fn shutdown(&self) {
        if !self.token.is_cancelled() {
            info!("Starting graceful shutdown");
        }
        self.token.cancel();
    }

    /// Check if shutdown has been signaled (non-blocking)
    pub fn is_shutdown(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}
