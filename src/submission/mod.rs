// Submission of a transfer request
//
// The pipeline walks the payment step through validating, processing and
// transferring by asking a TransferBackend for each phase. The simulated
// backend stands in until a real order service exists.

pub mod backend;
pub mod pipeline;

pub use backend::{BackendError, SimulatedBackend, TransferBackend};
pub use pipeline::TransferPipeline;
