pub mod adjuster;
pub mod types;

pub use adjuster::TrustBook;
pub use types::{TrustAdjustment, TrustConfig, TrustOutcome, TrustRecord};
