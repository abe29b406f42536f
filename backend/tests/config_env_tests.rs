//! Tests for config loading from files and the process environment.

mod support;

use std::fs;

use shotgrid::config::{AppConfig, CONFIG_PATH_ENV};
use shotgrid::db::{KeyPolicy, RepositoryFactory, RepositoryType};

const OVERRIDE_VARS: &[&str] = &[
    "HOST",
    "PORT",
    "CACHE_BACKEND",
    "CACHE_DIR",
    "UPSTREAM_BASE_URL",
    "UPSTREAM_TIMEOUT_SECS",
    "ROSTER_PATH",
];

/// Clears every override variable, then applies `extra`.
fn env_changes<'a>(extra: &[(&'a str, Option<&'a str>)]) -> Vec<(&'a str, Option<&'a str>)> {
    let mut changes: Vec<(&str, Option<&str>)> =
        OVERRIDE_VARS.iter().map(|name| (*name, None)).collect();
    changes.extend_from_slice(extra);
    changes
}

#[test]
fn test_load_from_explicit_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("custom.toml");
    fs::write(
        &path,
        r#"
[server]
port = 9100
allowed_origins = []

[cache]
backend = "local"
key_policy = "threshold_aware"
single_flight = false
"#,
    )
    .unwrap();
    let path_str = path.to_str().unwrap().to_string();

    let config = support::with_scoped_env(
        &env_changes(&[(CONFIG_PATH_ENV, Some(path_str.as_str()))]),
        AppConfig::load,
    )
    .unwrap();

    assert_eq!(config.server.port, 9100);
    assert_eq!(config.server.host, "0.0.0.0");
    assert!(config.server.allowed_origins.is_empty());
    assert_eq!(config.cache.repository_type().unwrap(), RepositoryType::Local);
    assert_eq!(config.cache.key_policy, KeyPolicy::ThresholdAware);
    assert!(!config.cache.single_flight);
    assert_eq!(config.upstream.timeout_secs, 30);
}

#[test]
fn test_environment_overrides_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shotgrid.toml");
    fs::write(&path, "[server]\nport = 9100\n").unwrap();
    let path_str = path.to_str().unwrap().to_string();

    let config = support::with_scoped_env(
        &env_changes(&[
            (CONFIG_PATH_ENV, Some(path_str.as_str())),
            ("PORT", Some("9200")),
            ("CACHE_BACKEND", Some("memory")),
            ("UPSTREAM_TIMEOUT_SECS", Some("5")),
        ]),
        AppConfig::load,
    )
    .unwrap();

    assert_eq!(config.server.port, 9200);
    assert_eq!(config.cache.repository_type().unwrap(), RepositoryType::Local);
    assert_eq!(config.upstream.timeout_secs, 5);
}

#[test]
fn test_invalid_environment_is_rejected() {
    for (name, value) in [
        ("PORT", "eighty"),
        ("CACHE_BACKEND", "redis"),
        ("UPSTREAM_TIMEOUT_SECS", "0"),
    ] {
        let result = support::with_scoped_env(
            &env_changes(&[(CONFIG_PATH_ENV, None), (name, Some(value))]),
            AppConfig::load,
        );
        assert!(result.is_err(), "{}={} should be rejected", name, value);
    }
}

#[test]
fn test_missing_config_file_is_an_error() {
    let result = support::with_scoped_env(
        &env_changes(&[(CONFIG_PATH_ENV, Some("/definitely/not/here.toml"))]),
        AppConfig::load,
    );
    let err = result.unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to read config file"));
}

#[tokio::test]
async fn test_factory_builds_configured_backend() {
    let dir = tempfile::tempdir().unwrap();
    let cache_dir = dir.path().join("cache");
    let cache_dir_str = cache_dir.to_str().unwrap().to_string();

    let config = support::with_scoped_env(
        &env_changes(&[
            (CONFIG_PATH_ENV, None),
            ("CACHE_BACKEND", Some("filesystem")),
            ("CACHE_DIR", Some(cache_dir_str.as_str())),
        ]),
        AppConfig::load,
    )
    .unwrap();

    let repo = RepositoryFactory::from_settings(&config.cache).await.unwrap();
    assert_eq!(repo.backend_name(), "filesystem");
    assert!(repo.health_check().await.unwrap());
    assert!(cache_dir.is_dir());
}
