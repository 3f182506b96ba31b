use serde::{Deserialize, Serialize};

use crate::types::{UnixSeconds, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Item,
    Claim,
    Transaction,
    LostFoundPost,
    LostFoundClaim,
    WantedOffer,
}

/// One status transition, as published to subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleEvent {
    pub entity_kind: EntityKind,
    pub entity_id: String,
    #[serde(default)]
    pub from_status: Option<String>,
    pub to_status: String,
    pub actor: UserId,
    pub at: UnixSeconds,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderedLifecycleEvent {
    pub seq_no: u64,
    pub event: LifecycleEvent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AckKind {
    Typing,
    ReadReceipt,
}

/// Channel-level acknowledgement. Forwarded to subscribers verbatim and
/// never routed through any state machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalAck {
    pub kind: AckKind,
    pub conversation_id: String,
    pub actor: UserId,
    pub at: UnixSeconds,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineEvent {
    Lifecycle(OrderedLifecycleEvent),
    Ack(ExternalAck),
}
