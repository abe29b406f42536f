#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use shotgrid::models::RawShot;
use shotgrid::upstream::{ShotChartRequest, ShotDataProvider, UpstreamError};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// Restores the previous values on unwind and serializes access to the
/// process environment, which the test harness shares between threads.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

/// In-process shot provider with a call counter.
pub struct StubProvider {
    shots: Vec<RawShot>,
    fail_with_status: Option<u16>,
    calls: AtomicUsize,
}

impl StubProvider {
    pub fn returning(shots: Vec<RawShot>) -> Arc<Self> {
        Arc::new(Self {
            shots,
            fail_with_status: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(status: u16) -> Arc<Self> {
        Arc::new(Self {
            shots: Vec::new(),
            fail_with_status: Some(status),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ShotDataProvider for StubProvider {
    async fn fetch_shots(&self, _request: &ShotChartRequest) -> Result<Vec<RawShot>, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.fail_with_status {
            Some(status) => Err(UpstreamError::Status { status }),
            None => Ok(self.shots.clone()),
        }
    }

    fn provider_name(&self) -> &'static str {
        "stub"
    }
}

/// Two makes and a miss at the rim, plus one corner three.
pub fn rim_and_corner_shots() -> Vec<RawShot> {
    vec![
        RawShot::new(0.0, 0.0, true, false),
        RawShot::new(0.0, 0.0, true, false),
        RawShot::new(0.0, 0.0, false, false),
        RawShot::new(-22.0, 1.0, true, true),
    ]
}
