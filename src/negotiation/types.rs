use serde::{Deserialize, Serialize};

use crate::{
    error::{EngineResult, validation_error},
    types::{ItemMode, RentalLimits, UnixSeconds, UserId},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    Pending,
    Accepted,
    Rejected,
}

impl ProposalStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalKind {
    Initial,
    Counter,
}

/// Terms carry only the fields meaningful to the item mode; the invalid
/// combinations are unrepresentable past this boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ProposalTerms {
    Rent { price: u64, rental_days: u32 },
    Sell { price: u64 },
    Give,
}

impl ProposalTerms {
    pub fn build(
        mode: ItemMode,
        price: Option<u64>,
        rental_days: Option<u32>,
        limits: &RentalLimits,
    ) -> EngineResult<Self> {
        match mode {
            ItemMode::Rent => {
                let price = price
                    .ok_or_else(|| validation_error("price is required for a rental proposal"))?;
                let rental_days = rental_days.ok_or_else(|| {
                    validation_error("rental_days is required for a rental proposal")
                })?;
                if rental_days < limits.min_days || rental_days > limits.max_days {
                    return Err(validation_error(format!(
                        "rental_days {} outside allowed range {}..={}",
                        rental_days, limits.min_days, limits.max_days
                    )));
                }
                Ok(Self::Rent { price, rental_days })
            }
            ItemMode::Sell => {
                let price = price
                    .ok_or_else(|| validation_error("price is required for a sale proposal"))?;
                Ok(Self::Sell { price })
            }
            ItemMode::Give => Ok(Self::Give),
        }
    }

    pub fn price(&self) -> u64 {
        match self {
            Self::Rent { price, .. } | Self::Sell { price } => *price,
            Self::Give => 0,
        }
    }

    pub fn rental_days(&self) -> Option<u32> {
        match self {
            Self::Rent { rental_days, .. } => Some(*rental_days),
            Self::Sell { .. } | Self::Give => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterOffer {
    pub by: UserId,
    pub terms: ProposalTerms,
    #[serde(default)]
    pub message: Option<String>,
    pub status: ProposalStatus,
    pub created_at: UnixSeconds,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub by: UserId,
    pub kind: ProposalKind,
    pub price: u64,
    #[serde(default)]
    pub rental_days: Option<u32>,
    #[serde(default)]
    pub message: Option<String>,
    pub status: ProposalStatus,
    pub created_at: UnixSeconds,
}

/// The negotiable surface of a transaction or offer. `history` is the
/// audit trail: append-only, insertion-ordered, one entry per resolved or
/// superseded proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NegotiableProposal {
    pub proposed_price: u64,
    #[serde(default)]
    pub proposed_rental_days: Option<u32>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub counter_offer: Option<CounterOffer>,
    pub history: Vec<HistoryEntry>,
}
