// Transfer wizard - step machine, session and error taxonomy
//
// The session owns the request and a statig machine for the steps; the
// submission pipeline drives the payment step through its phases.

pub mod errors;
pub mod session;
pub mod state_machine;
pub mod types;

pub use errors::WizardError;
pub use session::WizardSession;
pub use state_machine::{WizardEvent, WizardFlow};
pub use types::{
    ProgressUpdate, StepChange, TransferFilters, TransferRequest, TransferStatus, TransferSummary,
    WizardAction, WizardStep,
};
