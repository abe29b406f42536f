//! Data Transfer Objects for the HTTP API.
//!
//! Response bodies for players and shot grids are the model types themselves
//! (they already carry the wire names); only the query strings and the health
//! report live here.

use serde::{Deserialize, Serialize};

pub use crate::models::{GridCell, PlayerSummary, ShotGridResult};

use crate::models::{PlayerId, DEFAULT_SEASON_TYPE};
use crate::services::{ShotGridQuery, DEFAULT_GRID_FEET, DEFAULT_MIN_ATTEMPTS};

/// Query string of `GET /api/players`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerSearchQuery {
    /// Name fragment; validated by the directory.
    #[serde(default)]
    pub q: String,
}

/// Query string of `GET /api/shotgrid`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShotGridParams {
    pub player_id: i64,
    pub season: String,
    #[serde(default = "default_season_type")]
    pub season_type: String,
    /// Bin edge in feet
    #[serde(default = "default_grid")]
    pub grid: i64,
    /// Minimum attempts per cell
    #[serde(default = "default_min_att")]
    pub min_att: i64,
}

fn default_season_type() -> String {
    DEFAULT_SEASON_TYPE.to_string()
}

fn default_grid() -> i64 {
    DEFAULT_GRID_FEET
}

fn default_min_att() -> i64 {
    DEFAULT_MIN_ATTEMPTS
}

impl From<ShotGridParams> for ShotGridQuery {
    fn from(params: ShotGridParams) -> Self {
        ShotGridQuery {
            player_id: PlayerId::new(params.player_id),
            season: params.season,
            season_type: params.season_type,
            grid_feet: params.grid,
            min_attempts: params.min_att,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Crate version
    pub version: String,
    /// Cache backend status
    pub cache: String,
}
