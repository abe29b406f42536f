//! Application state for the HTTP server.

use std::sync::Arc;

use crate::services::{PlayerDirectory, ShotGridService};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Shot grid service (owns the cache and the upstream provider)
    pub shot_grid: Arc<ShotGridService>,
    /// Player name search
    pub directory: Arc<PlayerDirectory>,
}

impl AppState {
    /// Create a new application state from its services.
    pub fn new(shot_grid: ShotGridService, directory: PlayerDirectory) -> Self {
        Self {
            shot_grid: Arc::new(shot_grid),
            directory: Arc::new(directory),
        }
    }
}
