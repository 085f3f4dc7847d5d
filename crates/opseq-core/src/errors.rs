//! The error taxonomy an operation handle can raise, plus the engine's
//! own fatal errors. Classification (`is_retriable`) drives the retry
//! controller; the taxonomy itself is a closed set of *kinds*, not a
//! dynamic error object, so the Runner can always decide what to do
//! with one.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, Serialize, Deserialize)]
pub enum OperationError {
    #[error("operation failed intentionally: {0}")]
    OperationFailedIntentionally(String),

    #[error("operation requested skip: {0}")]
    SkipOperation(String),

    #[error("operation timed out after {0}ms")]
    Timeout(u64),

    #[error("transient I/O error: {0}")]
    TransientIo(String),

    #[error("operation cancelled")]
    Cancelled,

    #[error("guard denied: {0}")]
    GuardDenied(String),

    #[error("operation raised: {0}")]
    Other(String),
}

impl OperationError {
    /// `Timeout` and `TransientIo` are retriable; everything else is
    /// terminal on the first occurrence (subject to `max_attempts`, but
    /// retrying a non-retriable kind would just repeat the same
    /// outcome).
    pub fn is_retriable(&self) -> bool {
        matches!(self, OperationError::Timeout(_) | OperationError::TransientIo(_))
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            OperationError::OperationFailedIntentionally(_) => "OperationFailedIntentionally",
            OperationError::SkipOperation(_) => "SkipOperation",
            OperationError::Timeout(_) => "Timeout",
            OperationError::TransientIo(_) => "TransientIO",
            OperationError::Cancelled => "Cancelled",
            OperationError::GuardDenied(_) => "GuardDenied",
            OperationError::Other(_) => "Other",
        }
    }
}

/// Fatal errors that abort a whole run before any Pending row is
/// written, or that the store surfaces to the caller without the
/// engine attempting to paper over them.
#[derive(Debug, Error, Clone, Serialize, Deserialize)]
pub enum EngineError {
    #[error("circular dependency among operations: {0:?}")]
    CircularDependency(Vec<String>),

    #[error("operation {operation:?} depends on unknown operation {missing:?}")]
    UnresolvedDependency { operation: String, missing: String },

    #[error("invalid primary key value: {0}")]
    InvalidPrimaryKeyValue(String),

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("duplicate run of {0}, another process already owns it")]
    DuplicateRun(String),

    #[error("configuration error: {0}")]
    Configuration(String),
}
