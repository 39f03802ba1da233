use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;
use std::time::Duration;
use thiserror::Error;

use crate::config::SimulationConfig;
use crate::wizard::{TransferRequest, WizardError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("transfer failed: {0}")]
    TransferFailed(String),
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

impl BackendError {
    pub fn into_wizard_error(self, progress: u8) -> WizardError {
        match self {
            BackendError::TransferFailed(reason) => {
                WizardError::SimulatedTransferFailure { progress, reason }
            }
            BackendError::Unavailable(reason) => WizardError::Backend(reason),
        }
    }
}

/// Order service seen from the wizard. Each call may take as long as it needs;
/// the pipeline drops the future when the user cancels.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransferBackend: Send + Sync {
    /// Check the request before any money is considered taken
    async fn validate(&self, request: &TransferRequest) -> Result<(), BackendError>;

    /// Settle the payment
    async fn process(&self, request: &TransferRequest) -> Result<(), BackendError>;

    /// Kick off the member transfer itself
    async fn start_transfer(&self, request: &TransferRequest) -> Result<(), BackendError>;

    /// Wait for the next status report and return the transfer progress in percent
    async fn poll_progress(&self, request: &TransferRequest, progress: u8) -> Result<u8, BackendError>;
}

/// Fixed delays, random progress increments and an optional random failure.
/// No request ever leaves the process.
#[derive(Debug)]
pub struct SimulatedBackend {
    settings: SimulationConfig,
    rng: Mutex<StdRng>,
}

impl SimulatedBackend {
    pub fn new(settings: SimulationConfig) -> Self {
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            settings,
            rng: Mutex::new(rng),
        }
    }

    pub fn settings(&self) -> &SimulationConfig {
        &self.settings
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut rng)
    }
}

async fn pause(ms: u64) {
    if ms > 0 {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}

#[async_trait]
impl TransferBackend for SimulatedBackend {
    async fn validate(&self, _request: &TransferRequest) -> Result<(), BackendError> {
        pause(self.settings.validating_delay_ms).await;
        Ok(())
    }

    async fn process(&self, _request: &TransferRequest) -> Result<(), BackendError> {
        pause(self.settings.processing_delay_ms).await;
        Ok(())
    }

    async fn start_transfer(&self, _request: &TransferRequest) -> Result<(), BackendError> {
        let rate = self.settings.failure_rate.clamp(0.0, 1.0);
        if self.with_rng(|rng| rng.random_bool(rate)) {
            return Err(BackendError::TransferFailed(
                "the simulated transfer was interrupted".to_string(),
            ));
        }
        Ok(())
    }

    async fn poll_progress(&self, _request: &TransferRequest, progress: u8) -> Result<u8, BackendError> {
        pause(self.settings.poll_interval_ms).await;
        let min = self.settings.progress_step_min.max(1);
        let max = self.settings.progress_step_max.max(min);
        let step = self.with_rng(|rng| rng.random_range(min..=max));
        Ok(progress.saturating_add(step).min(100))
    }
}
