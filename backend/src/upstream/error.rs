//! Errors raised while talking to the shot data provider.

use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// The request never produced a response (DNS, connect, TLS, reset).
    #[error("request failed: {0}")]
    Transport(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The provider answered with a non-success status.
    #[error("provider responded with HTTP {status}")]
    Status { status: u16 },

    /// The body was not the expected shot chart table.
    #[error("could not decode provider response: {0}")]
    Decode(String),
}

impl UpstreamError {
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }
}
