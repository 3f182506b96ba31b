use serde::{Deserialize, Serialize};

use crate::types::{LostFoundClaimId, PostId, UnixSeconds, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostStatus {
    Open,
    Resolved,
}

impl PostStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Resolved => "resolved",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LostFoundClaimStatus {
    Submitted,
    VerificationPending,
    Verified,
    Rejected,
    MeetupProposed,
    MeetupAccepted,
    Resolved,
}

impl LostFoundClaimStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Rejected | Self::Resolved)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::VerificationPending => "verification_pending",
            Self::Verified => "verified",
            Self::Rejected => "rejected",
            Self::MeetupProposed => "meetup_proposed",
            Self::MeetupAccepted => "meetup_accepted",
            Self::Resolved => "resolved",
        }
    }
}

/// Owner-authored challenge. The expected answer stays on the post and is
/// surfaced to the owner only; claimants see the question as a blank
/// prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationQuestion {
    pub question: String,
    pub expected_answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationAnswer {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetupDetails {
    pub location: String,
    pub date_time: String,
    #[serde(default)]
    pub instructions: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LostFoundPost {
    pub id: PostId,
    pub owner: UserId,
    pub title: String,
    pub status: PostStatus,
    pub verification_questions: Vec<VerificationQuestion>,
    pub created_at: UnixSeconds,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLostFoundPost {
    pub title: String,
    #[serde(default)]
    pub verification_questions: Vec<VerificationQuestion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LostFoundClaim {
    pub id: LostFoundClaimId,
    pub post_id: PostId,
    pub claimant: UserId,
    pub status: LostFoundClaimStatus,
    #[serde(default)]
    pub message: Option<String>,
    pub verification_answers: Vec<VerificationAnswer>,
    #[serde(default)]
    pub meetup: Option<MeetupDetails>,
    pub created_at: UnixSeconds,
    pub updated_at: UnixSeconds,
}
