//! # Shot Grid Backend
//!
//! Spatially binned shooting efficiency for a player's season.
//!
//! Given a player and season, the backend retrieves raw field-goal attempts
//! from an upstream provider, bins them on a square grid of configurable size,
//! computes per-cell field-goal percentage and points per shot, and caches the
//! result so repeated queries never reach upstream again.
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`models`]: Raw shots, grid cells, results and roster entries
//! - [`algorithms`]: Coordinate binning and aggregation (pure)
//! - [`db`]: Cache repository trait, key derivation and backends
//! - [`upstream`]: Shot data provider trait and the stats API client
//! - [`services`]: Shot grid orchestration and player search
//! - [`config`]: TOML + environment configuration
//! - [`http`]: Axum-based HTTP server and request handlers
//!

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod algorithms;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod upstream;

#[cfg(feature = "http-server")]
pub mod http;

pub use error::{ServiceError, ServiceResult};
