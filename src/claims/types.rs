use serde::{Deserialize, Serialize};

use crate::types::{ClaimId, ItemId, UnixSeconds, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl ClaimStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Cancelled claims no longer hold a slot; everything else does.
    pub fn holds_slot(self) -> bool {
        !matches!(self, Self::Cancelled)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub id: ClaimId,
    pub item_id: ItemId,
    pub requester: UserId,
    pub status: ClaimStatus,
    pub queue_position: u32,
    pub claimed_at: UnixSeconds,
    /// Stamped from the TTL policy at creation; cleared on confirmation.
    #[serde(default)]
    pub expires_at: Option<UnixSeconds>,
}
