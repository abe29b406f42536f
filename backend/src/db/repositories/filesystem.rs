//! Filesystem-backed cache repository.
//!
//! One JSON file per key under a cache directory, each holding a
//! [`CacheRecord`]. Writes go to a uniquely named temporary file in the same
//! directory, are synced, and are then renamed over the target, so a reader
//! observes either the previous file or the complete new one.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::db::models::{CacheRecord, RecordRejection};
use crate::db::repository::{CacheRepository, ErrorContext, RepositoryError, RepositoryResult};
use crate::models::ShotGridResult;

const RECORD_EXTENSION: &str = "json";

static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Cache repository storing one record file per key.
#[derive(Debug, Clone)]
pub struct FilesystemRepository {
    dir: PathBuf,
}

impl FilesystemRepository {
    /// Open (and create if needed) a cache directory.
    pub async fn open(dir: impl Into<PathBuf>) -> RepositoryResult<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            RepositoryError::from(e).with_operation("open").with_key(dir.display().to_string())
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the record file for `key`.
    pub fn record_path(&self, key: &str) -> RepositoryResult<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{}.{}", key, RECORD_EXTENSION)))
    }

    fn tmp_path(&self, key: &str) -> PathBuf {
        let n = TMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        self.dir
            .join(format!(".{}.{}.{}.tmp", key, std::process::id(), n))
    }

    async fn write_atomically(&self, key: &str, target: &Path, bytes: &[u8]) -> RepositoryResult<()> {
        let tmp = self.tmp_path(key);
        let written = async {
            let mut file = tokio::fs::File::create(&tmp).await?;
            file.write_all(bytes).await?;
            file.sync_all().await?;
            drop(file);
            tokio::fs::rename(&tmp, target).await
        }
        .await;

        if let Err(e) = written {
            if let Err(cleanup) = tokio::fs::remove_file(&tmp).await {
                debug!(path = %tmp.display(), error = %cleanup, "temporary cache file not removed");
            }
            return Err(RepositoryError::from(e).with_operation("put").with_key(key));
        }
        Ok(())
    }
}

/// Keys become file names, so only a conservative character set is accepted.
fn validate_key(key: &str) -> RepositoryResult<()> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if valid {
        Ok(())
    } else {
        Err(RepositoryError::validation_with_context(
            "cache key is not a safe file name",
            ErrorContext::new("validate_key").with_key(key),
        ))
    }
}

#[async_trait]
impl CacheRepository for FilesystemRepository {
    async fn get(&self, key: &str) -> RepositoryResult<Option<ShotGridResult>> {
        let path = self.record_path(key)?;
        let json = match tokio::fs::read_to_string(&path).await {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(RepositoryError::from(e).with_operation("get").with_key(key)),
        };

        let record = CacheRecord::from_json(&json).map_err(|e| e.with_operation("get").with_key(key))?;
        match record.open() {
            Ok(result) => Ok(Some(result)),
            Err(rejection @ RecordRejection::SchemaVersion { .. }) => {
                warn!(key, reason = %rejection, "ignoring cache record from another schema version");
                Ok(None)
            }
            Err(rejection) => Err(RepositoryError::serialization_with_context(
                rejection.to_string(),
                ErrorContext::new("get").with_key(key),
            )),
        }
    }

    async fn put(&self, key: &str, value: &ShotGridResult) -> RepositoryResult<()> {
        let path = self.record_path(key)?;
        let json = CacheRecord::seal(value)
            .and_then(|record| record.to_json())
            .map_err(|e| e.with_operation("put").with_key(key))?;
        self.write_atomically(key, &path, json.as_bytes()).await?;
        debug!(key, path = %path.display(), bytes = json.len(), "cache record written");
        Ok(())
    }

    async fn health_check(&self) -> RepositoryResult<bool> {
        match tokio::fs::metadata(&self.dir).await {
            Ok(meta) => Ok(meta.is_dir() && !meta.permissions().readonly()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(RepositoryError::from(e).with_operation("health_check")),
        }
    }

    fn backend_name(&self) -> &'static str {
        "filesystem"
    }
}

#[cfg(test)]
#[path = "filesystem_tests.rs"]
mod filesystem_tests;
