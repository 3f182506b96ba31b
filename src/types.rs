use serde::{Deserialize, Serialize};

pub type UserId = String;
pub type ItemId = String;
pub type ClaimId = String;
pub type TransactionId = String;
pub type PostId = String;
pub type LostFoundClaimId = String;
pub type WantedId = String;
pub type WantedOfferId = String;
pub type UnixSeconds = u64;

/// Actor recorded on administrative transitions (TTL sweeps, sibling
/// auto-closes) that no user initiated directly.
pub const SYSTEM_ACTOR: &str = "system";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemMode {
    Rent,
    Sell,
    Give,
}

impl ItemMode {
    pub fn is_priced(self) -> bool {
        !matches!(self, Self::Give)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rent => "rent",
            Self::Sell => "sell",
            Self::Give => "give",
        }
    }
}

/// Bounds a requester's proposed rental duration must fall within.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentalLimits {
    pub min_days: u32,
    pub max_days: u32,
}

impl Default for RentalLimits {
    fn default() -> Self {
        Self {
            min_days: 1,
            max_days: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareableItem {
    pub id: ItemId,
    pub owner: UserId,
    pub title: String,
    pub mode: ItemMode,
    pub price: u64,
    pub instant_claim: bool,
    pub max_claimers: u32,
    pub claimed_count: u32,
    pub available: bool,
    #[serde(default)]
    pub rental_limits: RentalLimits,
    pub created_at: UnixSeconds,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
    pub title: String,
    pub mode: ItemMode,
    #[serde(default)]
    pub price: u64,
    #[serde(default)]
    pub instant_claim: bool,
    #[serde(default = "default_max_claimers")]
    pub max_claimers: u32,
    #[serde(default)]
    pub rental_limits: RentalLimits,
}

fn default_max_claimers() -> u32 {
    1
}
