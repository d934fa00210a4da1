//! Failures of the remote catalog.

use thiserror::Error;

/// Failure reported by a [`Transport`](super::Transport) before any response exists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors that can occur while fetching from the remote catalog.
///
/// Every variant is folded into [`Resource::Error`](crate::Resource::Error)
/// using its `Display` text as the message.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No response was received
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Non-success response; the body is the diagnostic
    #[error("{body}")]
    Status { status: u16, body: String },

    /// The body did not match the expected schema
    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The detail response carried no item
    #[error("Response contained no item")]
    MissingDetail,
}
