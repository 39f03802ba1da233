// Input validators for the transfer wizard.
// Pure functions, no state; the session decides what to do with a rejection.

pub mod links;
pub mod member_count;
pub mod payment_proof;

pub use links::{is_valid_group_link, validate_group_link, GroupLinkField};
pub use member_count::{parse_member_count, validate_member_count, MemberLimits};
pub use payment_proof::{PaymentProof, ProofKind, ProofRejection};
