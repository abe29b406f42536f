//! Shot chart data model.
//!
//! [`RawShot`] is what the upstream provider hands us, one record per field-goal
//! attempt. [`GridCell`] and [`ShotGridResult`] are the served (and persisted)
//! artifacts; their serde names are the wire names of the JSON API.

use serde::{Deserialize, Serialize};

use super::player::PlayerId;

/// Default season type when a request does not name one.
pub const DEFAULT_SEASON_TYPE: &str = "Regular Season";

/// One observed field-goal attempt.
///
/// Coordinates are in feet with the basket at the origin. `made` is `None`
/// when the provider did not report a usable outcome; such records are skipped
/// during aggregation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawShot {
    pub x_feet: f64,
    pub y_feet: f64,
    pub made: Option<bool>,
    pub is_three_point: bool,
}

impl RawShot {
    pub fn new(x_feet: f64, y_feet: f64, made: bool, is_three_point: bool) -> Self {
        Self {
            x_feet,
            y_feet,
            made: Some(made),
            is_three_point,
        }
    }
}

/// One aggregated spatial bucket.
///
/// A cell is identified by `(x, y, is_three_point)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridCell {
    pub x: i64,
    pub y: i64,
    #[serde(rename = "att")]
    pub attempts: u32,
    pub made: u32,
    #[serde(rename = "fg")]
    pub field_goal_pct: f64,
    #[serde(rename = "pts")]
    pub points_per_shot: f64,
    #[serde(rename = "is3")]
    pub is_three_point: bool,
}

/// Points scored by a made field goal.
pub fn point_value(is_three_point: bool) -> u32 {
    if is_three_point {
        3
    } else {
        2
    }
}

/// The served artifact for one (player, season, season type, grid) query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotGridResult {
    #[serde(rename = "playerId")]
    pub player_id: PlayerId,
    pub season: String,
    #[serde(rename = "seasonType")]
    pub season_type: String,
    #[serde(rename = "gridFt")]
    pub grid_feet: i64,
    pub cells: Vec<GridCell>,
}

impl ShotGridResult {
    /// Result for a query the provider had no shots for.
    pub fn empty(player_id: PlayerId, season: &str, season_type: &str, grid_feet: i64) -> Self {
        Self {
            player_id,
            season: season.to_string(),
            season_type: season_type.to_string(),
            grid_feet,
            cells: Vec::new(),
        }
    }

    pub fn total_attempts(&self) -> u64 {
        self.cells.iter().map(|c| u64::from(c.attempts)).sum()
    }
}
