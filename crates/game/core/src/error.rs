//! Common error infrastructure for crawl-core.
//!
//! Malformed trait input is never an error: the traits layer falls back to
//! documented defaults. The errors here cover the cases a caller must react
//! to, such as a full store or an unknown serialization envelope.
//!
//! # Design Principles
//!
//! - **Type Safety**: each concern has its own error enum
//! - **Severity Classification**: errors report whether the player can simply
//!   be told "you can't do that" or whether the data itself is broken

use crate::state::ActorId;

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorSeverity {
    /// A disallowed player action: report it in a dialog and carry on.
    ///
    /// Examples: locked exit, insufficient funds, no storage space
    Recoverable,

    /// Invalid input that should be rejected without retry.
    ///
    /// Examples: slot index out of range, unknown reviver tag
    Validation,

    /// Unexpected state inconsistency.
    ///
    /// Examples: actor id missing from the world
    Internal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Common trait for all crawl-core errors.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;
}

/// Dice notation that could not be understood.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DiceError {
    #[error("malformed dice expression '{0}'")]
    Malformed(String),

    #[error("dice expression '{0}' has no dice to roll")]
    Degenerate(String),
}

impl GameError for DiceError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }
}

/// Failures reviving a serialized trait envelope.
#[derive(Debug, thiserror::Error)]
pub enum TraitsError {
    #[error("invalid traits JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unexpected reviver '{found}', expected '{expected}'")]
    WrongReviver {
        expected: &'static str,
        found: &'static str,
    },
}

impl GameError for TraitsError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }
}

/// Failures moving artefacts or money in and out of a store.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("no storage space left (capacity {capacity})")]
    StoreFull { capacity: usize },

    #[error("insufficient funds: {price} SP needed, {available} SP available")]
    InsufficientFunds { price: i64, available: i64 },

    #[error("no artefact in slot {0}")]
    SlotOutOfRange(usize),

    #[error("cannot equip {name}: {reason}")]
    EquipLimit { name: String, reason: &'static str },

    #[error("{0} cannot be equipped")]
    NotEquippable(String),
}

impl GameError for StoreError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::SlotOutOfRange(_) => ErrorSeverity::Validation,
            _ => ErrorSeverity::Recoverable,
        }
    }
}

/// Lookups against the world that found nothing.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum WorldError {
    #[error("actor {0} not found")]
    ActorNotFound(ActorId),

    #[error("actor {0} has no store")]
    NoStore(ActorId),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl GameError for WorldError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Store(e) => e.severity(),
            _ => ErrorSeverity::Internal,
        }
    }
}
