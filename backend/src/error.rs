//! Service-level error kinds.

use crate::db::repository::RepositoryError;
use crate::upstream::UpstreamError;

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced by the shot grid and player directory services.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Malformed or out-of-range client input. Never retried.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The data provider could not be reached or returned an unusable payload.
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(#[from] UpstreamError),

    /// A computed result could not be persisted. Reported, never returned to
    /// the HTTP caller: the result itself is still served.
    #[error("Cache write failed: {0}")]
    CacheWriteFailure(#[source] RepositoryError),
}

impl ServiceError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidParameter(message.into())
    }

    /// Stable machine-readable code for this error kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidParameter(_) => "INVALID_PARAMETER",
            Self::UpstreamUnavailable(_) => "UPSTREAM_UNAVAILABLE",
            Self::CacheWriteFailure(_) => "CACHE_WRITE_FAILURE",
        }
    }
}
