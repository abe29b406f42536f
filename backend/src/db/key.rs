//! Cache key derivation.
//!
//! Keys are built only from the query parameters, never from machine state,
//! locale or time, so the same query always lands on the same entry.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::PlayerId;

/// Which query parameters take part in the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyPolicy {
    /// `{player}_{season}_{season_type}_g{grid}`. The attempts threshold is not
    /// part of the key, so a hit may have been computed with another threshold.
    #[default]
    Legacy,
    /// Legacy key plus `_m{min_attempts}`.
    ThresholdAware,
}

/// Deterministic cache key for one shot grid query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derive the legacy key. Spaces in the season type become underscores.
    pub fn derive(player_id: PlayerId, season: &str, season_type: &str, grid_feet: i64) -> Self {
        let safe_type = season_type.replace(' ', "_");
        CacheKey(format!("{}_{}_{}_g{}", player_id, season, safe_type, grid_feet))
    }

    /// Derive the key for `policy`.
    pub fn derive_with_policy(
        policy: KeyPolicy,
        player_id: PlayerId,
        season: &str,
        season_type: &str,
        grid_feet: i64,
        min_attempts: u32,
    ) -> Self {
        let key = Self::derive(player_id, season, season_type, grid_feet);
        match policy {
            KeyPolicy::Legacy => key,
            KeyPolicy::ThresholdAware => CacheKey(format!("{}_m{}", key.0, min_attempts)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
