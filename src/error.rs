use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineErrorKind {
    NotFound,
    Unauthorized,
    TerminalState,
    StaleState,
    Exhausted,
    AlreadyClaimed,
    Unavailable,
    Validation,
    Internal,
}

impl EngineErrorKind {
    /// Stable wire code surfaced to clients.
    pub fn code(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Unauthorized => "unauthorized",
            Self::TerminalState => "terminal_state",
            Self::StaleState => "stale_state",
            Self::Exhausted => "exhausted",
            Self::AlreadyClaimed => "already_claimed",
            Self::Unavailable => "unavailable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    /// Expected business outcomes, as opposed to caller mistakes or
    /// infrastructure failures.
    pub fn is_business_outcome(self) -> bool {
        matches!(self, Self::Exhausted | Self::AlreadyClaimed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineError {
    pub kind: EngineErrorKind,
    pub message: String,
}

impl EngineError {
    pub fn new(kind: EngineErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for EngineError {}

pub type EngineResult<T> = Result<T, EngineError>;

pub fn not_found(message: impl Into<String>) -> EngineError {
    EngineError::new(EngineErrorKind::NotFound, message)
}

pub fn unauthorized(message: impl Into<String>) -> EngineError {
    EngineError::new(EngineErrorKind::Unauthorized, message)
}

pub fn terminal_state(message: impl Into<String>) -> EngineError {
    EngineError::new(EngineErrorKind::TerminalState, message)
}

pub fn stale_state(message: impl Into<String>) -> EngineError {
    EngineError::new(EngineErrorKind::StaleState, message)
}

pub fn exhausted(message: impl Into<String>) -> EngineError {
    EngineError::new(EngineErrorKind::Exhausted, message)
}

pub fn already_claimed(message: impl Into<String>) -> EngineError {
    EngineError::new(EngineErrorKind::AlreadyClaimed, message)
}

pub fn unavailable(message: impl Into<String>) -> EngineError {
    EngineError::new(EngineErrorKind::Unavailable, message)
}

pub fn validation_error(message: impl Into<String>) -> EngineError {
    EngineError::new(EngineErrorKind::Validation, message)
}

pub fn internal_error(message: impl Into<String>) -> EngineError {
    EngineError::new(EngineErrorKind::Internal, message)
}
