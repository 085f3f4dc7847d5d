use thiserror::Error;

/// Errors raised while constructing or validating domain values, as
/// opposed to errors raised while *executing* an operation (see
/// `opseq_core::errors::EngineError` for those).
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("operation name {0:?} exceeds the 255 character limit")]
    NameTooLong(String),

    #[error("operation name must not be empty")]
    EmptyName,

    #[error("invalid primary key value: {0}")]
    InvalidPrimaryKeyValue(String),

    #[error("{field} must be greater than zero, got {value}")]
    NonPositive { field: &'static str, value: i64 },
}
