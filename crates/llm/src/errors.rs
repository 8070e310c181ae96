use thiserror::Error;

/// Failures talking to a remote language model
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LlmError {
    #[error("Request timed out after {0}ms")]
    Timeout(u64),

    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Empty response: {0}")]
    EmptyResponse(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Client configuration error: {0}")]
    Configuration(String),
}

pub type LlmResult<T> = Result<T, LlmError>;

impl LlmError {
    pub(crate) fn from_reqwest(error: reqwest::Error, timeout_ms: u64) -> Self {
        if error.is_timeout() {
            LlmError::Timeout(timeout_ms)
        } else if error.is_decode() {
            LlmError::Parse(error.to_string())
        } else if let Some(status) = error.status() {
            LlmError::Http {
                status: status.as_u16(),
                message: error.to_string(),
            }
        } else {
            LlmError::Network(error.to_string())
        }
    }

    /// Short machine-friendly label for logs
    pub fn kind(&self) -> &'static str {
        match self {
            LlmError::Timeout(_) => "timeout",
            LlmError::Network(_) => "network",
            LlmError::Http { .. } => "http",
            LlmError::Parse(_) => "parse_error",
            LlmError::EmptyResponse(_) => "empty_response",
            LlmError::InvalidRequest(_) => "invalid_request",
            LlmError::Configuration(_) => "configuration",
        }
    }
}
