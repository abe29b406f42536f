//! Persistence for computed shot grids.
//!
//! The cache is a key/value store behind the [`repository::CacheRepository`]
//! trait, so the service never sees which backend it talks to.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Service Layer (services::shot_grid)                    │
//! │  - key derivation, hit/miss orchestration               │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Trait (repository) - get / put / health     │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────┴──────────────────┐
//!     │ LocalRepository  │ FilesystemRepository │
//!     │  (in-memory)     │  (versioned records) │
//!     └──────────────────┴──────────────────────┘
//! ```
//!
//! - `key`: deterministic cache key derivation
//! - `models`: the versioned, checksummed record written by durable backends
//! - `factory`: backend selection from configuration

pub mod factory;
pub mod key;
pub mod models;
pub mod repositories;
pub mod repository;

pub use factory::{RepositoryFactory, RepositoryType};
pub use key::{CacheKey, KeyPolicy};
pub use models::{CacheRecord, CACHE_SCHEMA_VERSION};
pub use repositories::{FilesystemRepository, LocalRepository};
pub use repository::{CacheRepository, ErrorContext, RepositoryError, RepositoryResult};
