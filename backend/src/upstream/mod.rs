//! Shot event data provider.
//!
//! The service only depends on [`ShotDataProvider`]; [`StatsApiProvider`] is
//! the production implementation backed by the public stats API. Tests plug in
//! their own providers.

pub mod error;
pub mod stats_api;

use async_trait::async_trait;

pub use error::UpstreamError;
pub use stats_api::{parse_shot_chart, StatsApiProvider};

use crate::models::{PlayerId, RawShot};

/// What to fetch: every field-goal attempt of one player in one season.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShotChartRequest {
    pub player_id: PlayerId,
    pub season: String,
    pub season_type: String,
}

/// Source of raw shot events.
///
/// Implementations must be `Send + Sync`; one instance serves every request.
/// An empty `Vec` means the player has no attempts for the season, which is
/// not an error.
#[async_trait]
pub trait ShotDataProvider: Send + Sync {
    async fn fetch_shots(&self, request: &ShotChartRequest) -> Result<Vec<RawShot>, UpstreamError>;

    fn provider_name(&self) -> &'static str;
}
