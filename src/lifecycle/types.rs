use serde::{Deserialize, Serialize};

use crate::{
    negotiation::NegotiableProposal,
    types::{ItemId, TransactionId, UnixSeconds, UserId},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Accepted,
    AgreementProposed,
    Active,
    ReturnPending,
    Completed,
    Cancelled,
    Disputed,
}

impl TransactionStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Disputed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::AgreementProposed => "agreement_proposed",
            Self::Active => "active",
            Self::ReturnPending => "return_pending",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Disputed => "disputed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickupStatus {
    Proposed,
    Confirmed,
}

impl PickupStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Proposed => "proposed",
            Self::Confirmed => "confirmed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickupDetails {
    pub location: String,
    pub date: String,
    pub time: String,
    #[serde(default)]
    pub instructions: Option<String>,
    pub status: PickupStatus,
    pub proposed_by: UserId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickupProposal {
    pub location: String,
    pub date: String,
    pub time: String,
    #[serde(default)]
    pub instructions: Option<String>,
}

/// Fields a requester supplies when asking for an item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRequest {
    #[serde(default)]
    pub price: Option<u64>,
    #[serde(default)]
    pub rental_days: Option<u32>,
    #[serde(default)]
    pub message: Option<String>,
}

/// The owner's opening agreement terms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgreementProposal {
    #[serde(default)]
    pub price: Option<u64>,
    #[serde(default)]
    pub rental_days: Option<u32>,
    #[serde(default)]
    pub start_date: Option<UnixSeconds>,
    #[serde(default)]
    pub end_date: Option<UnixSeconds>,
    #[serde(default)]
    pub terms: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterTerms {
    #[serde(default)]
    pub price: Option<u64>,
    #[serde(default)]
    pub rental_days: Option<u32>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub item_id: ItemId,
    pub owner: UserId,
    pub requester: UserId,
    pub status: TransactionStatus,
    pub agreed_price: u64,
    #[serde(default)]
    pub agreed_rental_days: Option<u32>,
    #[serde(default)]
    pub start_date: Option<UnixSeconds>,
    #[serde(default)]
    pub end_date: Option<UnixSeconds>,
    #[serde(default)]
    pub terms: Option<String>,
    #[serde(default)]
    pub pickup: Option<PickupDetails>,
    pub proposal: NegotiableProposal,
    pub created_at: UnixSeconds,
    pub updated_at: UnixSeconds,
}

impl Transaction {
    pub fn is_party(&self, actor: &UserId) -> bool {
        actor == &self.owner || actor == &self.requester
    }

    pub fn counterparty_of(&self, actor: &UserId) -> Option<&UserId> {
        if actor == &self.owner {
            Some(&self.requester)
        } else if actor == &self.requester {
            Some(&self.owner)
        } else {
            None
        }
    }
}
