pub mod ledger;
pub mod types;

pub use ledger::SlotLedger;
pub use types::SlotGrant;
