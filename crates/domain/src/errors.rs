//! Domain Errors - dataset validation and load failures
//!
//! Contains ONLY business-level errors; I/O details are flattened into strings
//! by the infrastructure layer before they reach this type.

use thiserror::Error;

/// Domain-specific errors raised while loading or validating the sales dataset
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// The backing source could not be read at all
    #[error("Dataset unavailable at {source_name}: {reason}")]
    DatasetUnavailable { source_name: String, reason: String },

    /// The source was read but is not valid dataset JSON
    #[error("Malformed dataset: {0}")]
    MalformedDataset(String),

    /// A deal carries a status outside the closed set of three
    #[error("Unknown deal status '{status}' on deal for client '{client}' (rep {rep_id})")]
    UnknownDealStatus {
        rep_id: u64,
        client: String,
        status: String,
    },

    /// Deal values must be finite and non-negative
    #[error("Invalid deal value {value} on deal for client '{client}' (rep {rep_id})")]
    InvalidDealValue {
        rep_id: u64,
        client: String,
        value: f64,
    },

    #[error("Duplicate sales rep id: {0}")]
    DuplicateRepId(u64),
}

/// Domain result type
pub type DomainResult<T> = Result<T, DomainError>;
