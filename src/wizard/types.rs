use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::pricing::{self, CostBreakdown, PricingConfig};
use crate::validation::payment_proof::PaymentProof;

/// Optional narrowing criteria. Recorded as given, never checked against the group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferFilters {
    pub active_only: bool,
    pub exclude_bots: bool,
    pub joined_after: Option<NaiveDate>,
}

impl TransferFilters {
    pub fn is_empty(&self) -> bool {
        !self.active_only && !self.exclude_bots && self.joined_after.is_none()
    }
}

/// What the user has entered so far. Owned by exactly one session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub source_group_reference: String,
    pub destination_group_reference: String,
    pub member_count: Option<u32>,
    pub filters: TransferFilters,
    pub notes: Option<String>,
    pub payment_proof: Option<PaymentProof>,
}

impl TransferRequest {
    pub fn payment_proof_attached(&self) -> bool {
        self.payment_proof.is_some()
    }

    /// `member_count * unit_rate`; an unset count costs nothing.
    pub fn estimated_cost(&self, unit_rate: Decimal) -> Decimal {
        pricing::estimated_cost(self.member_count.unwrap_or(0), unit_rate)
    }

    pub fn quote(&self, pricing: &PricingConfig) -> CostBreakdown {
        pricing::quote(self.member_count.unwrap_or(0), pricing)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferStatus {
    #[default]
    Idle,
    Validating,
    Processing,
    Transferring,
    Completed,
    Failed,
}

impl TransferStatus {
    /// A submission is running and navigation is locked.
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            TransferStatus::Validating | TransferStatus::Processing | TransferStatus::Transferring
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TransferStatus::Completed | TransferStatus::Failed)
    }
}

impl std::fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            TransferStatus::Idle => "idle",
            TransferStatus::Validating => "validating",
            TransferStatus::Processing => "processing",
            TransferStatus::Transferring => "transferring",
            TransferStatus::Completed => "completed",
            TransferStatus::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// The four screens of the flow. The compact layout stops at `Payment`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WizardStep {
    GroupDetails,
    TransferDetails,
    Payment,
    Confirmation,
}

impl WizardStep {
    pub fn number(&self) -> u8 {
        match self {
            WizardStep::GroupDetails => 1,
            WizardStep::TransferDetails => 2,
            WizardStep::Payment => 3,
            WizardStep::Confirmation => 4,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::GroupDetails => "Group Details",
            WizardStep::TransferDetails => "Transfer Details",
            WizardStep::Payment => "Payment",
            WizardStep::Confirmation => "Confirmation",
        }
    }
}

/// User intents, used to report refused transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WizardAction {
    Next,
    Back,
    Submit,
    Reset,
    /// Attach or remove the payment proof
    ChangeProof,
}

impl std::fmt::Display for WizardAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            WizardAction::Next => "go to the next step",
            WizardAction::Back => "go back",
            WizardAction::Submit => "submit",
            WizardAction::Reset => "reset",
            WizardAction::ChangeProof => "change the payment proof",
        };
        f.write_str(label)
    }
}

/// Outcome of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepChange {
    Moved { from: u8, to: u8 },
    /// Back was pressed on the first step; the flow is closed.
    Exited,
}

/// Published on every status or progress change of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub status: TransferStatus,
    pub progress: u8,
}

/// Read-only view of steps 1 and 2 shown on the payment step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferSummary {
    pub source_group_reference: String,
    pub destination_group_reference: String,
    pub member_count: u32,
    pub filters: TransferFilters,
    pub notes: Option<String>,
    pub cost: CostBreakdown,
    pub currency: String,
    pub payment_proof: Option<PaymentProof>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_count_costs_nothing() {
        let request = TransferRequest::default();
        assert_eq!(request.estimated_cost(Decimal::new(1, 2)), Decimal::ZERO);
        assert!(!request.payment_proof_attached());
    }

    #[test]
    fn test_status_classification() {
        assert!(TransferStatus::Processing.is_in_flight());
        assert!(!TransferStatus::Idle.is_in_flight());
        assert!(TransferStatus::Failed.is_terminal());
        assert!(!TransferStatus::Transferring.is_terminal());
    }

    #[test]
    fn test_filters_empty() {
        assert!(TransferFilters::default().is_empty());
        let filters = TransferFilters { exclude_bots: true, ..Default::default() };
        assert!(!filters.is_empty());
    }
}
