//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for business logic.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use tracing::debug;

use super::dto::{HealthResponse, PlayerSearchQuery, PlayerSummary, ShotGridParams, ShotGridResult};
use super::error::AppError;
use super::state::AppState;
use crate::services::{list_seasons, ShotGridQuery};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Reports whether the cache backend is usable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let cache = state.shot_grid.cache();
    let cache_status = match cache.health_check().await {
        Ok(true) => format!("{}: ok", cache.backend_name()),
        Ok(false) => format!("{}: unavailable", cache.backend_name()),
        Err(e) => format!("{}: error: {}", cache.backend_name(), e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        cache: cache_status,
    }))
}

// =============================================================================
// Players and seasons
// =============================================================================

/// GET /api/players?q=...
pub async fn search_players(
    State(state): State<AppState>,
    query: Result<Query<PlayerSearchQuery>, QueryRejection>,
) -> HandlerResult<Vec<PlayerSummary>> {
    let Query(query) = query?;
    let players = state.directory.search(&query.q)?;
    Ok(Json(players))
}

/// GET /api/seasons
pub async fn get_seasons() -> HandlerResult<Vec<String>> {
    Ok(Json(list_seasons()))
}

// =============================================================================
// Shot grid
// =============================================================================

/// GET /api/shotgrid?player_id=..&season=..[&season_type=..&grid=..&min_att=..]
///
/// Serves the cached grid or computes it from upstream data.
pub async fn get_shot_grid(
    State(state): State<AppState>,
    params: Result<Query<ShotGridParams>, QueryRejection>,
) -> HandlerResult<ShotGridResult> {
    let Query(params) = params?;
    let query = ShotGridQuery::from(params);
    debug!(player_id = %query.player_id, season = %query.season, "shot grid request");

    let result = state.shot_grid.get_shot_grid(&query).await?;
    Ok(Json(result))
}
