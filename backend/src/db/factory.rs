//! Repository factory for dependency injection.
//!
//! Chooses the cache backend from configuration and hands back a shared
//! `Arc<dyn CacheRepository>`.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use tracing::info;

use super::repositories::{FilesystemRepository, LocalRepository};
use super::repository::{CacheRepository, RepositoryError, RepositoryResult};
use crate::config::CacheSettings;

/// Cache backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    /// One record file per key under a directory
    Filesystem,
    /// In-memory map, lost on restart
    Local,
}

impl FromStr for RepositoryType {
    type Err = String;

    /// Parse repository type from string ("filesystem", "fs", "local", "memory").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "filesystem" | "fs" | "file" => Ok(Self::Filesystem),
            "local" | "memory" | "in-memory" => Ok(Self::Local),
            _ => Err(format!("Unknown repository type: {}", s)),
        }
    }
}

impl RepositoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Filesystem => "filesystem",
            Self::Local => "local",
        }
    }
}

/// Repository factory for creating cache backends.
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create a repository instance based on type.
    ///
    /// # Arguments
    /// * `repo_type` - Type of repository to create
    /// * `cache_dir` - Cache directory (required for the filesystem backend)
    pub async fn create(
        repo_type: RepositoryType,
        cache_dir: Option<&Path>,
    ) -> RepositoryResult<Arc<dyn CacheRepository>> {
        match repo_type {
            RepositoryType::Filesystem => {
                let dir = cache_dir.ok_or_else(|| {
                    RepositoryError::configuration("Filesystem cache requires a cache directory")
                })?;
                let repo = Self::create_filesystem(dir).await?;
                Ok(repo as Arc<dyn CacheRepository>)
            }
            RepositoryType::Local => Ok(Self::create_local()),
        }
    }

    /// Create a filesystem repository rooted at `dir`.
    pub async fn create_filesystem(dir: &Path) -> RepositoryResult<Arc<FilesystemRepository>> {
        let repo = FilesystemRepository::open(dir).await?;
        Ok(Arc::new(repo))
    }

    /// Create an in-memory local repository.
    pub fn create_local() -> Arc<dyn CacheRepository> {
        Arc::new(LocalRepository::new())
    }

    /// Create the repository described by the `[cache]` settings.
    pub async fn from_settings(settings: &CacheSettings) -> RepositoryResult<Arc<dyn CacheRepository>> {
        let repo_type = settings.repository_type().map_err(|e| {
            RepositoryError::configuration(format!("Invalid cache backend: {}", e))
        })?;
        let repo = Self::create(repo_type, Some(settings.dir.as_path())).await?;
        info!(
            backend = repo.backend_name(),
            dir = %settings.dir.display(),
            "cache repository ready"
        );
        Ok(repo)
    }
}
