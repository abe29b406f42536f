//! Server configuration.
//!
//! Settings come from a TOML file (when one is found) and are then overridden
//! by environment variables. Every field has a default, so an empty file or no
//! file at all yields a working local setup.
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8000
//! allowed_origins = ["http://localhost:5173"]
//!
//! [cache]
//! backend = "filesystem"   # or "local"
//! dir = "./cache"
//! key_policy = "legacy"    # or "threshold_aware"
//! single_flight = true
//!
//! [upstream]
//! base_url = "https://stats.nba.com/stats"
//! timeout_secs = 30
//!
//! [roster]
//! path = "players.json"
//! ```

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::db::{KeyPolicy, RepositoryType};

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "SHOTGRID_CONFIG";

const DEFAULT_CONFIG_FILE: &str = "shotgrid.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub cache: CacheSettings,
    pub upstream: UpstreamSettings,
    pub roster: RosterSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// CORS origins. Empty means any origin.
    pub allowed_origins: Vec<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            allowed_origins: vec!["http://localhost:5173".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub backend: String,
    pub dir: PathBuf,
    pub key_policy: KeyPolicy,
    /// Collapse concurrent misses on one key into a single upstream call.
    pub single_flight: bool,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            backend: RepositoryType::Filesystem.as_str().to_string(),
            dir: PathBuf::from("./cache"),
            key_policy: KeyPolicy::Legacy,
            single_flight: true,
        }
    }
}

impl CacheSettings {
    pub fn repository_type(&self) -> Result<RepositoryType, String> {
        RepositoryType::from_str(&self.backend)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamSettings {
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            base_url: "https://stats.nba.com/stats".to_string(),
            timeout_secs: 30,
            user_agent: "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0"
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterSettings {
    /// Roster JSON file. The embedded roster is used when unset.
    pub path: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Find a config file in the standard locations.
    ///
    /// Searches for `shotgrid.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    pub fn find_default_file() -> Option<PathBuf> {
        [
            PathBuf::from(DEFAULT_CONFIG_FILE),
            PathBuf::from("backend").join(DEFAULT_CONFIG_FILE),
            PathBuf::from("..").join(DEFAULT_CONFIG_FILE),
        ]
        .into_iter()
        .find(|path| path.exists())
    }

    /// Resolve the full configuration: file (explicit, discovered, or none)
    /// followed by environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_file(path.trim())?,
            _ => match Self::find_default_file() {
                Some(path) => Self::from_file(path)?,
                None => Self::default(),
            },
        };
        config.apply_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup (the process environment in
    /// production).
    ///
    /// - `HOST`, `PORT`
    /// - `CACHE_BACKEND`, `CACHE_DIR`
    /// - `UPSTREAM_BASE_URL`, `UPSTREAM_TIMEOUT_SECS`
    /// - `ROSTER_PATH`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(host) = get("HOST") {
            self.server.host = host;
        }
        if let Some(port) = get("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("PORT must be a valid port number, got {:?}", port))?;
        }
        if let Some(backend) = get("CACHE_BACKEND") {
            self.cache.backend = backend;
        }
        if let Some(dir) = get("CACHE_DIR") {
            self.cache.dir = PathBuf::from(dir);
        }
        if let Some(url) = get("UPSTREAM_BASE_URL") {
            self.upstream.base_url = url;
        }
        if let Some(timeout) = get("UPSTREAM_TIMEOUT_SECS") {
            self.upstream.timeout_secs = timeout.trim().parse().with_context(|| {
                format!("UPSTREAM_TIMEOUT_SECS must be a whole number, got {:?}", timeout)
            })?;
        }
        if let Some(path) = get("ROSTER_PATH") {
            self.roster.path = Some(PathBuf::from(path));
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if let Err(e) = self.cache.repository_type() {
            bail!("Invalid cache backend: {}", e);
        }
        if self.upstream.timeout_secs == 0 {
            bail!("upstream.timeout_secs must be at least 1");
        }
        if self.upstream.base_url.trim().is_empty() {
            bail!("upstream.base_url must not be empty");
        }
        Ok(())
    }
}
