//! Shared error types for the sales dashboard crates.

use thiserror::Error;

/// Configuration errors raised while reading the process environment
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}' ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Value out of range for {key}: {value} (expected {expected})")]
    OutOfRange {
        key: String,
        value: String,
        expected: String,
    },
}

pub type ConfigResult<T> = Result<T, ConfigError>;
