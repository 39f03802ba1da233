// Member Transfer - multi-step transfer request workflow
// This exposes the wizard, its validators and the simulated submission pipeline

pub mod cli;
pub mod config;
pub mod pricing;
pub mod shutdown;
pub mod submission;
pub mod telemetry;
pub mod tracking;
pub mod validation;
pub mod wizard;

// Re-export key types for easy access
pub use config::{LogFormat, WizardConfig, WizardVariant};
pub use pricing::{estimated_cost, quote, CostBreakdown, PricingConfig};
pub use shutdown::ShutdownCoordinator;
pub use submission::{BackendError, SimulatedBackend, TransferBackend, TransferPipeline};
pub use telemetry::{generate_correlation_id, init_telemetry};
pub use tracking::{OrderBook, OrderId, OrderIdGenerator, OrderRecord};
pub use validation::{is_valid_group_link, MemberLimits, PaymentProof, ProofKind};
pub use wizard::{
    StepChange, TransferFilters, TransferRequest, TransferStatus, WizardError, WizardSession,
    WizardStep,
};
