//! Error types for the npcchat core library.

use thiserror::Error;

/// Top-level error type for every fatal pipeline failure.
#[derive(Error, Debug)]
pub enum ChatError {
    /// The input batch is not valid JSON or a message is missing a field.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// A message timestamp is not a valid ISO-8601 timestamp.
    #[error("Malformed timestamp {raw:?}: {reason}")]
    MalformedTimestamp {
        /// The timestamp exactly as it appeared in the input.
        raw: String,
        /// Why parsing failed.
        reason: String,
    },

    /// A log record could not be written to one of the sinks.
    #[error("Sink write failed: {0}")]
    SinkWrite(#[source] std::io::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure of a reply strategy that talks to a remote service.
///
/// Never fatal: the [`Responder`](crate::reply::Responder) absorbs it and
/// answers with the rule-based fallback instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Remote service failure: {0}")]
pub struct RemoteServiceFailure(pub String);

impl RemoteServiceFailure {
    /// Build a failure from anything printable.
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, ChatError>;
