//! LLM error types.

use thiserror::Error;

/// Errors that can occur during a chat-completion call.
#[derive(Debug, Error)]
pub enum LlmError {
    /// HTTP request failed before a response arrived.
    #[error("LLM request failed: {0}")]
    RequestFailed(String),

    /// Endpoint answered with a non-success status.
    #[error("LLM endpoint returned HTTP {status}")]
    Http {
        /// Status code returned.
        status: u16,
    },

    /// Response body was not the expected JSON shape.
    #[error("Failed to parse LLM response: {0}")]
    ParseError(String),

    /// Response parsed but carried no usable text.
    #[error("LLM response contained no reply text")]
    EmptyResponse,

    /// Request timed out.
    #[error("LLM request timed out after {0}ms")]
    Timeout(u64),

    /// LLM provider is unavailable.
    #[error("LLM provider unavailable: {0}")]
    Unavailable(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout(0)
        } else if err.is_connect() {
            LlmError::Unavailable(err.to_string())
        } else if err.is_decode() {
            LlmError::ParseError(err.to_string())
        } else {
            LlmError::RequestFailed(err.to_string())
        }
    }
}
