pub mod allocator;
pub mod types;

pub use allocator::ClaimAllocator;
pub use types::{Claim, ClaimStatus};
