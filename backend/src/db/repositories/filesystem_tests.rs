use std::sync::Arc;

use super::*;
use crate::db::models::CACHE_SCHEMA_VERSION;
use crate::models::{GridCell, PlayerId};

fn result_with_made(made: u32) -> ShotGridResult {
    ShotGridResult {
        player_id: PlayerId::new(2544),
        season: "2023-24".to_string(),
        season_type: "Regular Season".to_string(),
        grid_feet: 1,
        cells: vec![GridCell {
            x: 0,
            y: 0,
            attempts: 10,
            made,
            field_goal_pct: f64::from(made) / 10.0,
            points_per_shot: f64::from(made) / 10.0 * 2.0,
            is_three_point: false,
        }],
    }
}

const KEY: &str = "2544_2023-24_Regular_Season_g1";

#[tokio::test]
async fn test_open_creates_directory() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("nested").join("cache");
    let repo = FilesystemRepository::open(&dir).await.unwrap();
    assert!(dir.is_dir());
    assert!(repo.health_check().await.unwrap());
    assert_eq!(repo.backend_name(), "filesystem");
}

#[tokio::test]
async fn test_miss_returns_none() {
    let tmp = tempfile::tempdir().unwrap();
    let repo = FilesystemRepository::open(tmp.path()).await.unwrap();
    assert_eq!(repo.get(KEY).await.unwrap(), None);
}

#[tokio::test]
async fn test_round_trip_writes_one_record_file() {
    let tmp = tempfile::tempdir().unwrap();
    let repo = FilesystemRepository::open(tmp.path()).await.unwrap();

    repo.put(KEY, &result_with_made(4)).await.unwrap();
    assert_eq!(repo.get(KEY).await.unwrap(), Some(result_with_made(4)));

    let files: Vec<String> = std::fs::read_dir(tmp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(files, vec![format!("{}.json", KEY)]);
}

#[tokio::test]
async fn test_overwrite_last_writer_wins() {
    let tmp = tempfile::tempdir().unwrap();
    let repo = FilesystemRepository::open(tmp.path()).await.unwrap();

    repo.put(KEY, &result_with_made(1)).await.unwrap();
    repo.put(KEY, &result_with_made(7)).await.unwrap();
    assert_eq!(repo.get(KEY).await.unwrap(), Some(result_with_made(7)));
}

#[tokio::test]
async fn test_record_envelope_on_disk() {
    let tmp = tempfile::tempdir().unwrap();
    let repo = FilesystemRepository::open(tmp.path()).await.unwrap();
    repo.put(KEY, &result_with_made(3)).await.unwrap();

    let raw = std::fs::read_to_string(repo.record_path(KEY).unwrap()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["schemaVersion"], CACHE_SCHEMA_VERSION);
    assert_eq!(value["result"]["playerId"], 2544);
    assert_eq!(value["result"]["cells"][0]["made"], 3);
    assert!(value["storedAt"].is_string());
}

#[tokio::test]
async fn test_corrupt_record_is_an_error_not_a_panic() {
    let tmp = tempfile::tempdir().unwrap();
    let repo = FilesystemRepository::open(tmp.path()).await.unwrap();
    std::fs::write(repo.record_path(KEY).unwrap(), "{\"schemaVersion\": 1, \"trunc").unwrap();

    let err = repo.get(KEY).await.unwrap_err();
    assert!(matches!(err, RepositoryError::SerializationError { .. }));
    assert_eq!(err.context().key.as_deref(), Some(KEY));
}

#[tokio::test]
async fn test_old_schema_record_reads_as_miss() {
    let tmp = tempfile::tempdir().unwrap();
    let repo = FilesystemRepository::open(tmp.path()).await.unwrap();
    repo.put(KEY, &result_with_made(3)).await.unwrap();

    let path = repo.record_path(KEY).unwrap();
    let raw = std::fs::read_to_string(&path).unwrap();
    let old = raw.replace(
        &format!("\"schemaVersion\":{}", CACHE_SCHEMA_VERSION),
        "\"schemaVersion\":0",
    );
    std::fs::write(&path, old).unwrap();

    assert_eq!(repo.get(KEY).await.unwrap(), None);
}

#[tokio::test]
async fn test_unsafe_keys_are_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let repo = FilesystemRepository::open(tmp.path()).await.unwrap();

    for key in ["../escape", "a/b", ".hidden", "", "with space"] {
        let err = repo.put(key, &result_with_made(1)).await.unwrap_err();
        assert!(
            matches!(err, RepositoryError::ValidationError { .. }),
            "key {:?} should be rejected",
            key
        );
        assert!(repo.get(key).await.is_err());
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_readers_never_see_partial_records() {
    let tmp = tempfile::tempdir().unwrap();
    let repo = Arc::new(FilesystemRepository::open(tmp.path()).await.unwrap());
    repo.put(KEY, &result_with_made(0)).await.unwrap();

    let mut tasks = tokio::task::JoinSet::new();
    for writer in 0..4u32 {
        let repo = Arc::clone(&repo);
        tasks.spawn(async move {
            for i in 0..25u32 {
                let made = (writer * 25 + i) % 11;
                repo.put(KEY, &result_with_made(made)).await.unwrap();
            }
        });
    }
    for _ in 0..4 {
        let repo = Arc::clone(&repo);
        tasks.spawn(async move {
            for _ in 0..50 {
                let seen = repo.get(KEY).await.unwrap().expect("key was written before readers started");
                let cell = &seen.cells[0];
                assert_eq!(cell.attempts, 10);
                assert!(cell.made <= 10);
            }
        });
    }
    while let Some(joined) = tasks.join_next().await {
        joined.unwrap();
    }

    let leftovers = std::fs::read_dir(tmp.path())
        .unwrap()
        .filter(|e| {
            e.as_ref()
                .unwrap()
                .file_name()
                .to_string_lossy()
                .ends_with(".tmp")
        })
        .count();
    assert_eq!(leftovers, 0);
}
