//! Tests for the leaderboard service over the score stores.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use elemental_grid::{LEADERBOARD_LIMIT, LeaderboardEntry};
use elemental_path::{ElementRepository, LeaderboardService, MemoryScoreStore, SaveOutcome, SqliteScoreStore};
use tempfile::NamedTempFile;

const DAY: &str = "2025-01-12";

fn entry(name: &str, moves: u32, offset_secs: i64) -> LeaderboardEntry {
    let base = Utc.with_ymd_and_hms(2025, 1, 12, 9, 0, 0).single().expect("valid time");
    LeaderboardEntry::new(name.to_string(), moves, DAY.to_string(), base + Duration::seconds(offset_secs))
}

#[tokio::test]
async fn test_load_is_bounded_and_ascending() {
    let store = MemoryScoreStore::new();
    let service = LeaderboardService::new(Arc::new(store.clone()));

    for i in 0..15u32 {
        assert_eq!(service.save(&entry(&format!("p{}", i), 20 - i, i64::from(i))).await, SaveOutcome::Saved);
    }

    let board = service.load_for_day(DAY).await;
    assert_eq!(board.len(), LEADERBOARD_LIMIT);
    assert_eq!(board.day_id(), Some(DAY));
    let moves: Vec<u32> = board.entries().iter().map(|e| *e.move_count()).collect();
    assert!(moves.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(moves[0], 6);
    assert_eq!(store.stored().await.len(), 15);
}

#[tokio::test]
async fn test_failures_degrade_without_errors() {
    let store = MemoryScoreStore::new();
    store.set_fail_writes(true);
    store.set_fail_reads(true);
    let service = LeaderboardService::new(Arc::new(store.clone()));

    assert_eq!(service.save(&entry("alice", 5, 0)).await, SaveOutcome::Failed);
    let board = service.load_for_day(DAY).await;
    assert!(board.is_empty());
    assert_eq!(board.day_id(), Some(DAY));
    assert!(service.try_load_for_day(DAY).await.is_err());
}

#[tokio::test]
async fn test_local_merge_keeps_best_ten() {
    let service = LeaderboardService::new(Arc::new(MemoryScoreStore::new()));
    service.reset(Some(DAY.to_string())).await;

    for i in 0..12u32 {
        service.merge_local(entry(&format!("p{}", i), 10 + i, 0)).await;
    }
    let board = service.merge_local(entry("best", 3, 60)).await;

    assert_eq!(board.len(), LEADERBOARD_LIMIT);
    assert_eq!(board.entries()[0].player_name(), "best");
    assert_eq!(service.cached().await, board);
}

#[tokio::test]
async fn test_merge_for_another_day_is_ignored() {
    let service = LeaderboardService::new(Arc::new(MemoryScoreStore::new()));
    service.reset(Some("2025-01-11".to_string())).await;

    let board = service.merge_local(entry("alice", 5, 0)).await;
    assert!(board.is_empty());
}

#[tokio::test]
async fn test_ties_rank_earlier_timestamp_first() {
    let store = MemoryScoreStore::new();
    let service = LeaderboardService::new(Arc::new(store));
    service.save(&entry("second", 4, 30)).await;
    service.save(&entry("first", 4, 10)).await;

    let board = service.load_for_day(DAY).await;
    let names: Vec<&str> = board.entries().iter().map(|e| e.player_name().as_str()).collect();
    assert_eq!(names, vec!["first", "second"]);
}

#[tokio::test]
async fn test_sqlite_store_backs_the_service() {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();
    let repository = ElementRepository::open(db_path).expect("Failed to open repository");
    let service = LeaderboardService::new(Arc::new(SqliteScoreStore::new(repository)));

    assert_eq!(service.save(&entry("alice", 7, 0)).await, SaveOutcome::Saved);
    assert_eq!(service.save(&entry("bob", 5, 1)).await, SaveOutcome::Saved);

    let board = service.try_load_for_day(DAY).await.expect("Load failed");
    let names: Vec<&str> = board.entries().iter().map(|e| e.player_name().as_str()).collect();
    assert_eq!(names, vec!["bob", "alice"]);
    assert!(service.load_for_day("2025-01-13").await.is_empty());
}

#[tokio::test]
async fn test_late_fetch_keeps_locally_merged_entries() {
    let store = MemoryScoreStore::new();
    let service = LeaderboardService::new(Arc::new(store.clone()));
    service.save(&entry("remote", 6, 0)).await;

    service.reset(Some(DAY.to_string())).await;
    service.merge_local(entry("local", 5, 10)).await;

    let fetched = service.load_for_day(DAY).await;
    let board = service.install_keeping_local(fetched).await;
    let names: Vec<&str> = board.entries().iter().map(|e| e.player_name().as_str()).collect();
    assert_eq!(names, vec!["local", "remote"]);

    // Entries already on the fetched board are not duplicated.
    let again = service.install_keeping_local(service.load_for_day(DAY).await).await;
    assert_eq!(again.len(), 2);
}

#[tokio::test]
async fn test_reset_keeps_same_day_and_clears_other_day() {
    let service = LeaderboardService::new(Arc::new(MemoryScoreStore::new()));
    service.reset(Some(DAY.to_string())).await;
    service.merge_local(entry("alice", 5, 0)).await;

    service.reset(Some(DAY.to_string())).await;
    assert_eq!(service.cached().await.len(), 1);

    service.reset(Some("2025-01-13".to_string())).await;
    let board = service.cached().await;
    assert!(board.is_empty());
    assert_eq!(board.day_id(), Some("2025-01-13"));

    service.reset(None).await;
    assert_eq!(service.cached().await.day_id(), None);
}
