//! HTTP server module for the shot grid backend.
//!
//! An axum router over the service layer.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                               │
//! │  - Query string parsing                                   │
//! │  - JSON serialization                                     │
//! │  - CORS, compression, error mapping                       │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Service Layer (services/)                                │
//! │  - ShotGridService, PlayerDirectory                       │
//! └─────────┬───────────────────────────────┬────────────────┘
//!           │                               │
//! ┌─────────▼──────────────┐   ┌────────────▼───────────────┐
//! │  Cache (db/)           │   │  Upstream (upstream/)       │
//! │  Filesystem / Local    │   │  StatsApiProvider           │
//! └────────────────────────┘   └────────────────────────────┘
//! ```

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
