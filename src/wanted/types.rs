use serde::{Deserialize, Serialize};

use crate::types::{UnixSeconds, UserId, WantedId, WantedOfferId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferType {
    Free,
    Sell,
    Rent,
}

impl OfferType {
    pub fn is_priced(self) -> bool {
        !matches!(self, Self::Free)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WantedOfferStatus {
    Pending,
    Accepted,
    Rejected,
    Cancelled,
}

impl WantedOfferStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WantedItem {
    pub id: WantedId,
    pub owner: UserId,
    pub title: String,
    pub created_at: UnixSeconds,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewWantedOffer {
    pub offer_type: OfferType,
    #[serde(default)]
    pub price: Option<u64>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WantedOffer {
    pub id: WantedOfferId,
    pub wanted_id: WantedId,
    pub offerer: UserId,
    pub offer_type: OfferType,
    pub price: u64,
    #[serde(default)]
    pub message: Option<String>,
    pub status: WantedOfferStatus,
    #[serde(default)]
    pub rejection_reason: Option<String>,
    pub created_at: UnixSeconds,
    pub updated_at: UnixSeconds,
}
