//! Shot grid orchestration.
//!
//! [`ShotGridService::get_shot_grid`] validates the query, derives the cache
//! key and answers from the cache when it can. On a miss it fetches raw shots
//! from the provider, aggregates them and writes the result back. A failed
//! write is logged and the computed result is still returned.
//!
//! With single-flight enabled, concurrent misses on the same key wait on a
//! per-key gate so the provider is called once and later callers read the
//! freshly written entry.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::{debug, info, warn};

use crate::algorithms::{aggregate_with_summary, GridSize};
use crate::config::CacheSettings;
use crate::db::{CacheKey, CacheRepository, KeyPolicy};
use crate::error::{ServiceError, ServiceResult};
use crate::models::{PlayerId, ShotGridResult, DEFAULT_SEASON_TYPE};
use crate::upstream::{ShotChartRequest, ShotDataProvider};

pub const DEFAULT_GRID_FEET: i64 = 1;
pub const DEFAULT_MIN_ATTEMPTS: i64 = 3;

/// Parameters of one shot grid request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShotGridQuery {
    pub player_id: PlayerId,
    pub season: String,
    pub season_type: String,
    pub grid_feet: i64,
    /// Values below 1 behave like 1.
    pub min_attempts: i64,
}

impl ShotGridQuery {
    pub fn new(player_id: PlayerId, season: impl Into<String>) -> Self {
        Self {
            player_id,
            season: season.into(),
            season_type: DEFAULT_SEASON_TYPE.to_string(),
            grid_feet: DEFAULT_GRID_FEET,
            min_attempts: DEFAULT_MIN_ATTEMPTS,
        }
    }

    pub fn with_season_type(mut self, season_type: impl Into<String>) -> Self {
        self.season_type = season_type.into();
        self
    }

    pub fn with_grid_feet(mut self, grid_feet: i64) -> Self {
        self.grid_feet = grid_feet;
        self
    }

    pub fn with_min_attempts(mut self, min_attempts: i64) -> Self {
        self.min_attempts = min_attempts;
        self
    }

    /// Check every parameter and normalize the attempts threshold.
    fn validate(&self) -> ServiceResult<(GridSize, u32)> {
        if self.player_id.value() <= 0 {
            return Err(ServiceError::invalid(format!(
                "player_id must be positive, got {}",
                self.player_id
            )));
        }
        validate_season(&self.season)?;
        validate_season_type(&self.season_type)?;
        let grid = GridSize::new(self.grid_feet)?;
        let min_attempts = u32::try_from(self.min_attempts.max(1)).unwrap_or(u32::MAX);
        Ok((grid, min_attempts))
    }
}

fn validate_season(season: &str) -> ServiceResult<()> {
    let ok = !season.is_empty() && season.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
    if ok {
        Ok(())
    } else {
        Err(ServiceError::invalid(format!("invalid season: {:?}", season)))
    }
}

fn validate_season_type(season_type: &str) -> ServiceResult<()> {
    let ok = !season_type.trim().is_empty()
        && season_type
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == ' ' || c == '-');
    if ok {
        Ok(())
    } else {
        Err(ServiceError::invalid(format!(
            "invalid season_type: {:?}",
            season_type
        )))
    }
}

/// Tunables taken from the `[cache]` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShotGridOptions {
    pub key_policy: KeyPolicy,
    pub single_flight: bool,
}

impl Default for ShotGridOptions {
    fn default() -> Self {
        Self {
            key_policy: KeyPolicy::Legacy,
            single_flight: true,
        }
    }
}

impl From<&CacheSettings> for ShotGridOptions {
    fn from(settings: &CacheSettings) -> Self {
        Self {
            key_policy: settings.key_policy,
            single_flight: settings.single_flight,
        }
    }
}

/// Per-key gate plus the number of guards, held or waiting, that use it.
#[derive(Default)]
struct GateSlot {
    lock: Arc<AsyncMutex<()>>,
    users: usize,
}

type GateMap = Mutex<HashMap<String, GateSlot>>;

/// Cache-aside shot grid computation.
pub struct ShotGridService {
    cache: Arc<dyn CacheRepository>,
    provider: Arc<dyn ShotDataProvider>,
    options: ShotGridOptions,
    gates: GateMap,
}

impl ShotGridService {
    pub fn new(cache: Arc<dyn CacheRepository>, provider: Arc<dyn ShotDataProvider>) -> Self {
        Self::with_options(cache, provider, ShotGridOptions::default())
    }

    pub fn with_options(
        cache: Arc<dyn CacheRepository>,
        provider: Arc<dyn ShotDataProvider>,
        options: ShotGridOptions,
    ) -> Self {
        Self {
            cache,
            provider,
            options,
            gates: Mutex::new(HashMap::new()),
        }
    }

    pub fn cache(&self) -> &Arc<dyn CacheRepository> {
        &self.cache
    }

    pub fn options(&self) -> ShotGridOptions {
        self.options
    }

    /// Key under which `query` is cached. Assumes `min_attempts` is already
    /// normalized when the threshold-aware policy is active.
    fn cache_key(&self, query: &ShotGridQuery, min_attempts: u32) -> CacheKey {
        CacheKey::derive_with_policy(
            self.options.key_policy,
            query.player_id,
            &query.season,
            &query.season_type,
            query.grid_feet,
            min_attempts,
        )
    }

    /// Return the shot grid for `query`, from the cache when possible.
    ///
    /// # Errors
    /// * [`ServiceError::InvalidParameter`] for a bad grid size, season or
    ///   season type. Nothing is fetched or cached.
    /// * [`ServiceError::UpstreamUnavailable`] when the provider fails on a
    ///   miss. Nothing is cached.
    pub async fn get_shot_grid(&self, query: &ShotGridQuery) -> ServiceResult<ShotGridResult> {
        let (grid, min_attempts) = query.validate()?;
        let key = self.cache_key(query, min_attempts);

        if let Some(hit) = self.read_cache(&key).await {
            info!(key = %key, cells = hit.cells.len(), "shot grid cache hit");
            return Ok(hit);
        }

        if !self.options.single_flight {
            return self.compute_and_store(query, grid, min_attempts, &key).await;
        }

        let _gate = self.acquire_gate(&key).await;
        // Someone else may have filled the entry while we waited.
        if let Some(hit) = self.read_cache(&key).await {
            debug!(key = %key, "shot grid filled by a concurrent request");
            return Ok(hit);
        }
        self.compute_and_store(query, grid, min_attempts, &key).await
    }

    async fn read_cache(&self, key: &CacheKey) -> Option<ShotGridResult> {
        match self.cache.get(key.as_str()).await {
            Ok(entry) => entry,
            Err(e) => {
                warn!(key = %key, error = %e, "cache read failed, treating as miss");
                None
            }
        }
    }

    async fn compute_and_store(
        &self,
        query: &ShotGridQuery,
        grid: GridSize,
        min_attempts: u32,
        key: &CacheKey,
    ) -> ServiceResult<ShotGridResult> {
        let request = ShotChartRequest {
            player_id: query.player_id,
            season: query.season.clone(),
            season_type: query.season_type.clone(),
        };

        let shots = self.provider.fetch_shots(&request).await.map_err(|e| {
            warn!(
                player_id = %query.player_id,
                provider = self.provider.provider_name(),
                error = %e,
                "shot fetch failed"
            );
            ServiceError::from(e)
        })?;

        let mut result =
            ShotGridResult::empty(query.player_id, &query.season, &query.season_type, grid.feet());
        if !shots.is_empty() {
            let aggregation = aggregate_with_summary(&shots, grid, min_attempts);
            let summary = aggregation.summary;
            debug!(
                key = %key,
                input = summary.input,
                used = summary.used,
                skipped_unknown_outcome = summary.skipped_unknown_outcome,
                skipped_bad_coordinates = summary.skipped_bad_coordinates,
                groups = summary.groups,
                cells = summary.cells,
                "aggregated shots"
            );
            result.cells = aggregation.cells;
        }

        if let Err(e) = self.cache.put(key.as_str(), &result).await {
            let failure = ServiceError::CacheWriteFailure(e);
            warn!(key = %key, error = %failure, "serving uncached shot grid");
        }

        info!(
            key = %key,
            player_id = %query.player_id,
            cells = result.cells.len(),
            "shot grid computed"
        );
        Ok(result)
    }

    async fn acquire_gate(&self, key: &CacheKey) -> GateGuard<'_> {
        let lock = {
            let mut gates = self.gates.lock();
            let slot = gates.entry(key.as_str().to_string()).or_default();
            slot.users += 1;
            Arc::clone(&slot.lock)
        };
        // Registered before awaiting so a cancelled waiter still releases its slot.
        let mut guard = GateGuard {
            gates: &self.gates,
            key: key.as_str().to_string(),
            permit: None,
        };
        guard.permit = Some(lock.lock_owned().await);
        guard
    }

    #[cfg(test)]
    fn pending_gates(&self) -> usize {
        self.gates.lock().len()
    }
}

/// Holds (or waits on) a key's gate; the last user out removes the map entry.
struct GateGuard<'a> {
    gates: &'a GateMap,
    key: String,
    permit: Option<OwnedMutexGuard<()>>,
}

impl Drop for GateGuard<'_> {
    fn drop(&mut self) {
        self.permit.take();
        let mut gates = self.gates.lock();
        if let Some(slot) = gates.get_mut(&self.key) {
            slot.users -= 1;
            if slot.users == 0 {
                gates.remove(&self.key);
            }
        }
    }
}

#[cfg(test)]
#[path = "shot_grid_tests.rs"]
mod tests;
