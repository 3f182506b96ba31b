pub mod offers;
pub mod types;

pub use offers::OfferManager;
pub use types::{NewWantedOffer, OfferType, WantedItem, WantedOffer, WantedOfferStatus};
