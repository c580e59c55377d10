use thiserror::Error;

/// Validation and contract errors exposed by `adpulse-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("day must be ISO YYYY-MM-DD: '{value}'")]
    InvalidDay { value: String },

    #[error("period end {to} is before start {from}")]
    InvalidRange { from: String, to: String },

    #[error("campaign id cannot be empty")]
    EmptyCampaignId,
    #[error("sku cannot be empty")]
    EmptySku,

    #[error("target DRR must be within 0..=1: {value}")]
    InvalidTargetDrr { value: String },

    #[error("bid must be a positive amount: {value}")]
    InvalidBid { value: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Source(#[from] crate::source::SourceError),

    #[error("report has no rows to export")]
    EmptyReport,

    #[error("ledger row {line} is malformed: {reason}")]
    MalformedLedgerRow { line: usize, reason: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
