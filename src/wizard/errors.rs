use thiserror::Error;

use super::types::{TransferStatus, WizardAction};
use crate::validation::links::GroupLinkField;
use crate::validation::payment_proof::ProofRejection;

/// Everything the wizard can refuse. None of these are fatal; the session stays usable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WizardError {
    #[error("Invalid {field} link '{value}': expected https://t.me/<handle> with optional ?join")]
    InvalidLink { field: GroupLinkField, value: String },

    #[error("Invalid member count {}: {}", display_count(.value), describe_limits(.min, .max))]
    InvalidMemberCount {
        value: Option<u32>,
        min: u32,
        max: Option<u32>,
    },

    #[error("A payment proof must be attached before submitting")]
    PaymentProofRequired,

    #[error("Payment proof rejected: {0}")]
    InvalidPaymentProof(#[from] ProofRejection),

    #[error("Transfer failed at {progress}%: {reason}")]
    SimulatedTransferFailure { progress: u8, reason: String },

    #[error("Transfer backend error: {0}")]
    Backend(String),

    #[error("Cannot {action} on step {step} while {status}")]
    InvalidTransition {
        action: WizardAction,
        step: u8,
        status: TransferStatus,
    },

    #[error("Submission cancelled")]
    Cancelled,

    #[error("Invalid order id '{0}': expected TT-<digits>")]
    InvalidOrderId(String),
}

impl WizardError {
    /// Validation failures leave the session exactly where it was.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            WizardError::InvalidLink { .. }
                | WizardError::InvalidMemberCount { .. }
                | WizardError::PaymentProofRequired
                | WizardError::InvalidPaymentProof(_)
        )
    }
}

fn display_count(value: &Option<u32>) -> String {
    match value {
        Some(n) => n.to_string(),
        None => "(not a number)".to_string(),
    }
}

fn describe_limits(min: &u32, max: &Option<u32>) -> String {
    match max {
        Some(max) => format!("must be between {min} and {max}"),
        None => format!("must be at least {min}"),
    }
}
