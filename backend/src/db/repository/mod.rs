//! Cache repository trait.
//!
//! The shot grid cache is a plain key/value contract: read-if-present and
//! full-overwrite writes. Backends live in [`crate::db::repositories`].

pub mod error;

use async_trait::async_trait;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

use crate::models::ShotGridResult;

/// Repository trait for persisted shot grid results.
///
/// # Contract
/// * `get` returns `Ok(None)` on a miss; a miss is never an error.
/// * `put` replaces any existing value atomically: a concurrent `get` of the
///   same key sees either the old value or the new one, never partial bytes.
/// * Nothing in this trait deletes keys.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to be shared across request handlers.
#[async_trait]
pub trait CacheRepository: Send + Sync {
    /// Fetch the result stored under `key`.
    ///
    /// # Returns
    /// * `Ok(Some(result))` - A stored, valid result
    /// * `Ok(None)` - No entry for this key
    /// * `Err(RepositoryError)` - If the backend could not be read
    async fn get(&self, key: &str) -> RepositoryResult<Option<ShotGridResult>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn put(&self, key: &str, value: &ShotGridResult) -> RepositoryResult<()>;

    /// Check whether the backend is usable.
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Short backend name used in logs and the health endpoint.
    fn backend_name(&self) -> &'static str;
}
