use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Turns Ctrl-C into cancellation of whatever submission is running
pub struct ShutdownCoordinator {
    token: CancellationToken,
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownCoordinator {
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }

    /// Install the Ctrl-C handler. The returned token fires on the first signal.
    pub fn install_signal_handlers(&self) -> CancellationToken {
        let token = self.token.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                result = tokio::signal::ctrl_c() => match result {
                    Ok(()) => {
                        info!("Interrupt received, cancelling submission");
                        token.cancel();
                    }
                    Err(e) => warn!("Failed to listen for Ctrl-C: {}", e),
                },
            }
        });
        self.token.clone()
    }

    /// Stop listening and release anything waiting on the token.
    pub fn shutdown(self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_shutdown_cancels_token() {
        let coordinator = ShutdownCoordinator::new();
        let token = coordinator.install_signal_handlers();
        assert!(!token.is_cancelled());

        coordinator.shutdown();
        assert!(token.is_cancelled());
    }
}
