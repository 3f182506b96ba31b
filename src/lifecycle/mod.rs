pub mod transaction;
pub mod transitions;
pub mod types;

pub use transaction::{ReturnOutcome, TransactionManager};
pub use transitions::{ensure_from, validate_transition};
pub use types::{
    AgreementProposal, CounterTerms, PickupDetails, PickupProposal, PickupStatus, Transaction,
    TransactionRequest, TransactionStatus,
};
