use serde::{Deserialize, Serialize};

use crate::types::{UnixSeconds, UserId};

/// Lifecycle-terminal outcomes that move a reputation score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustOutcome {
    CompletedOnTime,
    LateReturn,
    LateReturnReceived,
    DisputeRaised,
    ClaimCompleted,
    LostFoundResolved,
}

impl TrustOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CompletedOnTime => "completed_on_time",
            Self::LateReturn => "late_return",
            Self::LateReturnReceived => "late_return_received",
            Self::DisputeRaised => "dispute_raised",
            Self::ClaimCompleted => "claim_completed",
            Self::LostFoundResolved => "lostfound_resolved",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustConfig {
    #[serde(default = "default_floor")]
    pub floor: i64,
    #[serde(default = "default_ceiling")]
    pub ceiling: i64,
    #[serde(default = "default_completed_on_time")]
    pub completed_on_time: i64,
    #[serde(default = "default_late_return")]
    pub late_return: i64,
    #[serde(default = "default_late_return_received")]
    pub late_return_received: i64,
    #[serde(default = "default_dispute_raised")]
    pub dispute_raised: i64,
    #[serde(default = "default_claim_completed")]
    pub claim_completed: i64,
    #[serde(default = "default_lostfound_resolved")]
    pub lostfound_resolved: i64,
}

impl Default for TrustConfig {
    fn default() -> Self {
        Self {
            floor: default_floor(),
            ceiling: default_ceiling(),
            completed_on_time: default_completed_on_time(),
            late_return: default_late_return(),
            late_return_received: default_late_return_received(),
            dispute_raised: default_dispute_raised(),
            claim_completed: default_claim_completed(),
            lostfound_resolved: default_lostfound_resolved(),
        }
    }
}

impl TrustConfig {
    pub fn delta_for(&self, outcome: TrustOutcome) -> i64 {
        match outcome {
            TrustOutcome::CompletedOnTime => self.completed_on_time,
            TrustOutcome::LateReturn => self.late_return,
            TrustOutcome::LateReturnReceived => self.late_return_received,
            TrustOutcome::DisputeRaised => self.dispute_raised,
            TrustOutcome::ClaimCompleted => self.claim_completed,
            TrustOutcome::LostFoundResolved => self.lostfound_resolved,
        }
    }
}

fn default_floor() -> i64 {
    -100
}

fn default_ceiling() -> i64 {
    100
}

fn default_completed_on_time() -> i64 {
    2
}

fn default_late_return() -> i64 {
    -3
}

fn default_late_return_received() -> i64 {
    2
}

fn default_dispute_raised() -> i64 {
    -1
}

fn default_claim_completed() -> i64 {
    1
}

fn default_lostfound_resolved() -> i64 {
    2
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustAdjustment {
    pub delta: i64,
    pub outcome: TrustOutcome,
    pub entity_id: String,
    pub at: UnixSeconds,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustRecord {
    pub user: UserId,
    pub score: i64,
    pub adjustments: Vec<TrustAdjustment>,
}
