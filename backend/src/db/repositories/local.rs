//! In-memory local repository implementation.
//!
//! Results live in a `HashMap` behind a `parking_lot::RwLock`. A `put` swaps
//! the whole `Arc` for a key while holding the write lock, so readers see
//! either the previous result or the new one. Suitable for tests and for
//! running the server without a writable cache directory.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::db::repository::{CacheRepository, RepositoryResult};
use crate::models::ShotGridResult;

/// In-memory cache repository.
///
/// # Example
/// ```
/// use shotgrid::db::repositories::LocalRepository;
/// use shotgrid::db::repository::CacheRepository;
/// use shotgrid::models::{PlayerId, ShotGridResult};
///
/// let runtime = tokio::runtime::Runtime::new().unwrap();
/// runtime.block_on(async {
///     let repo = LocalRepository::new();
///     let result = ShotGridResult::empty(PlayerId::new(2544), "2023-24", "Regular Season", 1);
///     repo.put("2544_2023-24_Regular_Season_g1", &result).await.unwrap();
///     assert_eq!(repo.get("2544_2023-24_Regular_Season_g1").await.unwrap(), Some(result));
/// });
/// ```
#[derive(Clone, Default)]
pub struct LocalRepository {
    entries: Arc<RwLock<HashMap<String, Arc<ShotGridResult>>>>,
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Sorted list of stored keys.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.read().keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl CacheRepository for LocalRepository {
    async fn get(&self, key: &str) -> RepositoryResult<Option<ShotGridResult>> {
        let entry = self.entries.read().get(key).cloned();
        Ok(entry.map(|result| (*result).clone()))
    }

    async fn put(&self, key: &str, value: &ShotGridResult) -> RepositoryResult<()> {
        let value = Arc::new(value.clone());
        self.entries.write().insert(key.to_string(), value);
        Ok(())
    }

    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(true)
    }

    fn backend_name(&self) -> &'static str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GridCell, PlayerId};

    fn result_with_attempts(attempts: u32) -> ShotGridResult {
        let mut result = ShotGridResult::empty(PlayerId::new(7), "2021-22", "Playoffs", 2);
        result.cells.push(GridCell {
            x: 2,
            y: 4,
            attempts,
            made: 1,
            field_goal_pct: 1.0 / f64::from(attempts),
            points_per_shot: 2.0 / f64::from(attempts),
            is_three_point: false,
        });
        result
    }

    #[tokio::test]
    async fn test_miss_is_none() {
        let repo = LocalRepository::new();
        assert_eq!(repo.get("nope").await.unwrap(), None);
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let repo = LocalRepository::new();
        let value = result_with_attempts(4);
        repo.put("k", &value).await.unwrap();
        assert_eq!(repo.get("k").await.unwrap(), Some(value));
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_last_writer_wins() {
        let repo = LocalRepository::new();
        repo.put("k", &result_with_attempts(4)).await.unwrap();
        repo.put("k", &result_with_attempts(9)).await.unwrap();

        let stored = repo.get("k").await.unwrap().unwrap();
        assert_eq!(stored.cells[0].attempts, 9);
        assert_eq!(repo.keys(), vec!["k".to_string()]);
    }

    #[tokio::test]
    async fn test_clones_share_storage() {
        let repo = LocalRepository::new();
        let other = repo.clone();
        repo.put("shared", &result_with_attempts(3)).await.unwrap();
        assert!(other.get("shared").await.unwrap().is_some());
    }
}
