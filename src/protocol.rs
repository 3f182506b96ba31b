use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    claims::ClaimStatus,
    error::{EngineError, EngineResult},
    events::AckKind,
    lifecycle::{
        AgreementProposal, CounterTerms, PickupProposal, TransactionRequest, TransactionStatus,
    },
    lostfound::{LostFoundClaimStatus, MeetupDetails, NewLostFoundPost, VerificationAnswer},
    types::{NewItem, UserId},
    wanted::{NewWantedOffer, WantedOfferStatus},
};

#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("invalid request: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimAction {
    Confirm,
    Complete,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionAction {
    Accept,
    Cancel,
    ConfirmHandover,
    MarkReturn,
    ConfirmReturn,
    RaiseDispute,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LostFoundAction {
    StartVerification,
    Verify,
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WantedOfferAction {
    Accept,
    Reject,
    Cancel,
}

/// One NDJSON request line. `subscribe` switches the connection to the
/// event stream; everything else is request/response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientRequest {
    Subscribe,
    Exit,
    CreateItem {
        actor: UserId,
        item: NewItem,
    },
    DelistItem {
        actor: UserId,
        item_id: String,
    },
    GetItem {
        item_id: String,
    },
    Claim {
        actor: UserId,
        item_id: String,
    },
    ClaimAction {
        actor: UserId,
        claim_id: String,
        action: ClaimAction,
        #[serde(default)]
        expected_status: Option<ClaimStatus>,
    },
    ExpirePendingClaims,
    RequestItem {
        actor: UserId,
        item_id: String,
        #[serde(default)]
        request: TransactionRequest,
    },
    TransactionAction {
        actor: UserId,
        transaction_id: String,
        action: TransactionAction,
        #[serde(default)]
        expected_status: Option<TransactionStatus>,
    },
    ProposeAgreement {
        actor: UserId,
        transaction_id: String,
        #[serde(default)]
        agreement: AgreementProposal,
        #[serde(default)]
        expected_status: Option<TransactionStatus>,
    },
    Negotiate {
        actor: UserId,
        transaction_id: String,
        #[serde(default)]
        counter: CounterTerms,
    },
    RespondNegotiation {
        actor: UserId,
        transaction_id: String,
        accept: bool,
    },
    ProposePickup {
        actor: UserId,
        transaction_id: String,
        pickup: PickupProposal,
    },
    ConfirmPickup {
        actor: UserId,
        transaction_id: String,
    },
    GetTransaction {
        transaction_id: String,
    },
    CreateLostFoundPost {
        actor: UserId,
        post: NewLostFoundPost,
    },
    GetVerificationPrompts {
        post_id: String,
    },
    SubmitLostFoundClaim {
        actor: UserId,
        post_id: String,
        #[serde(default)]
        message: Option<String>,
        #[serde(default)]
        answers: Vec<VerificationAnswer>,
    },
    LostFoundClaimAction {
        actor: UserId,
        claim_id: String,
        action: LostFoundAction,
        #[serde(default)]
        expected_status: Option<LostFoundClaimStatus>,
    },
    SubmitVerificationAnswers {
        actor: UserId,
        claim_id: String,
        answers: Vec<VerificationAnswer>,
    },
    ProposeMeetup {
        actor: UserId,
        claim_id: String,
        meetup: MeetupDetails,
    },
    AcceptMeetup {
        actor: UserId,
        claim_id: String,
    },
    ResolveLostFound {
        actor: UserId,
        claim_id: String,
    },
    CreateWantedItem {
        actor: UserId,
        title: String,
    },
    SubmitWantedOffer {
        actor: UserId,
        wanted_id: String,
        offer: NewWantedOffer,
    },
    WantedOfferAction {
        actor: UserId,
        offer_id: String,
        action: WantedOfferAction,
        #[serde(default)]
        reason: Option<String>,
        #[serde(default)]
        expected_status: Option<WantedOfferStatus>,
    },
    Ack {
        actor: UserId,
        kind: AckKind,
        conversation_id: String,
    },
    TrustScore {
        user: UserId,
    },
    RecentEvents,
}

pub fn parse_client_request(line: &str) -> Result<ClientRequest, ProtocolError> {
    Ok(serde_json::from_str(line)?)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireError {
    pub code: String,
    pub message: String,
}

/// One NDJSON response line. `Exhausted` and `AlreadyClaimed` arrive here
/// like any other error; clients tell them apart by `code`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<WireError>,
}

impl ServerResponse {
    pub fn success(data: Value) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: &EngineError) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(WireError {
                code: error.kind.code().to_string(),
                message: error.message.clone(),
            }),
        }
    }

    pub fn from_result<T: Serialize>(result: EngineResult<T>) -> Self {
        match result {
            Ok(value) => match serde_json::to_value(value) {
                Ok(data) => Self::success(data),
                Err(err) => Self {
                    ok: false,
                    data: None,
                    error: Some(WireError {
                        code: "internal".to_string(),
                        message: format!("failed to serialize response: {err}"),
                    }),
                },
            },
            Err(err) => Self::failure(&err),
        }
    }
}
