//! End-to-end tests of the game engine over in-memory stores.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use elemental_grid::{
    Element, ElementGrid, GameMode, GameSession, INSUFFICIENT_DATA, LeaderboardEntry, SeededDailyRng, day_id,
};
use elemental_path::{
    ElementCatalog, EngineConfig, EngineError, EnginePhase, FixedClock, GameEngine, LeaderboardService,
    MemoryCatalogStore, MemoryScoreStore, ScoreError, ScoreStore,
};
use tokio::sync::Semaphore;

/// Three cells in a row: A and C touch only through B.
fn line_elements() -> Vec<Element> {
    vec![
        Element::new(1, "A".into(), "Alpha".into(), Some("Alfa".into()), 1, 1),
        Element::new(2, "B".into(), "Beta".into(), None, 1, 2),
        Element::new(3, "C".into(), "Gamma".into(), None, 1, 3),
    ]
}

/// First date whose daily puzzle on the line catalog joins A and C.
fn date_pairing_ends() -> NaiveDate {
    let grid = ElementGrid::new(line_elements()).expect("valid grid");
    let first = NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date");
    (0..366)
        .map(|offset| first + Duration::days(offset))
        .find(|date| {
            let session = GameSession::generate(&grid, &mut SeededDailyRng::for_date(*date), GameMode::Daily)
                .expect("enough elements");
            let mut pair = [*session.start().atomic_number(), *session.target().atomic_number()];
            pair.sort_unstable();
            pair == [1, 3]
        })
        .expect("some date pairs A with C")
}

fn engine_with(score_store: Arc<dyn ScoreStore>, date: NaiveDate, config: EngineConfig) -> GameEngine {
    let catalog = ElementCatalog::with_seed(Arc::new(MemoryCatalogStore::new()), line_elements());
    GameEngine::new(
        catalog,
        LeaderboardService::new(score_store),
        Arc::new(FixedClock::new(date)),
        config,
    )
}

fn prior_entry(day: &str, name: &str, moves: u32) -> LeaderboardEntry {
    LeaderboardEntry::new(
        name.to_string(),
        moves,
        day.to_string(),
        Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).single().expect("valid time"),
    )
}

/// Score store whose reads wait for a permit.
#[derive(Debug)]
struct GatedScoreStore {
    inner: MemoryScoreStore,
    gate: Arc<Semaphore>,
}

#[async_trait]
impl ScoreStore for GatedScoreStore {
    async fn add(&self, entry: &LeaderboardEntry) -> Result<(), ScoreError> {
        self.inner.add(entry).await
    }

    async fn query_by_day(&self, day_id: &str, limit: usize) -> Result<Vec<LeaderboardEntry>, ScoreError> {
        let _permit = self
            .gate
            .acquire()
            .await
            .map_err(|_| ScoreError::new("gate closed"))?;
        self.inner.query_by_day(day_id, limit).await
    }
}

#[tokio::test]
async fn test_daily_puzzle_is_deterministic_per_date() {
    let date = NaiveDate::from_ymd_opt(2025, 1, 12).expect("valid date");
    let first = engine_with(Arc::new(MemoryScoreStore::new()), date, EngineConfig::default());
    let second = engine_with(Arc::new(MemoryScoreStore::new()), date, EngineConfig::default());

    let a = first.start_daily().await.expect("Start failed");
    let b = second.start_daily().await.expect("Start failed");
    let (a, b) = (a.session().clone().expect("session"), b.session().clone().expect("session"));
    assert_eq!(a.start(), b.start());
    assert_eq!(a.target(), b.target());
}

#[tokio::test]
async fn test_revealing_the_bridge_wins_in_one_move() {
    let date = date_pairing_ends();
    let engine = engine_with(Arc::new(MemoryScoreStore::new()), date, EngineConfig::default());

    let started = engine.start_daily().await.expect("Start failed");
    assert_eq!(*started.phase(), EnginePhase::Active);
    assert!(started.message().starts_with("daily challenge: connect"));

    let snapshot = engine.submit_guess("  beta ").await;
    assert_eq!(*snapshot.phase(), EnginePhase::Won);
    let session = snapshot.session().as_ref().expect("session");
    assert_eq!(*session.move_count(), 1);
    assert!(snapshot.message().starts_with("connected!"));

    let after = engine.submit_guess("A").await;
    assert_eq!(after.session(), snapshot.session());
}

#[tokio::test]
async fn test_unknown_guess_only_changes_message() {
    let engine = engine_with(Arc::new(MemoryScoreStore::new()), date_pairing_ends(), EngineConfig::default());
    let started = engine.start_daily().await.expect("Start failed");

    let snapshot = engine.submit_guess("Unobtainium").await;
    assert_eq!(snapshot.message(), "unknown element");
    let (before, after) = (
        started.session().as_ref().expect("session"),
        snapshot.session().as_ref().expect("session"),
    );
    assert_eq!(before.revealed(), after.revealed());
    assert_eq!(before.move_count(), after.move_count());
}

#[tokio::test]
async fn test_guess_without_session_is_ignored() {
    let engine = engine_with(Arc::new(MemoryScoreStore::new()), date_pairing_ends(), EngineConfig::default());
    let snapshot = engine.submit_guess("B").await;
    assert_eq!(*snapshot.phase(), EnginePhase::Loading);
    assert!(snapshot.session().is_none());
}

#[tokio::test]
async fn test_daily_start_loads_existing_scores() {
    let date = date_pairing_ends();
    let store = MemoryScoreStore::new();
    store.add(&prior_entry(&day_id(date), "earlier", 4)).await.expect("Add failed");
    let engine = engine_with(Arc::new(store), date, EngineConfig::default());

    engine.start_daily().await.expect("Start failed");
    engine.settle().await;

    let state = engine.current_state();
    assert_eq!(state.leaderboard().day_id(), Some(day_id(date).as_str()));
    assert_eq!(state.leaderboard().len(), 1);
}

#[tokio::test]
async fn test_stale_leaderboard_is_discarded() {
    let date = date_pairing_ends();
    let inner = MemoryScoreStore::new();
    inner.add(&prior_entry(&day_id(date), "earlier", 4)).await.expect("Add failed");
    let gate = Arc::new(Semaphore::new(0));
    let store = GatedScoreStore {
        inner,
        gate: Arc::clone(&gate),
    };
    let engine = engine_with(Arc::new(store), date, EngineConfig::default());

    let daily = engine.start_daily().await.expect("Start failed");
    let random = engine.start_random().await.expect("Start failed");
    assert!(random.generation() > daily.generation());

    gate.add_permits(1);
    engine.settle().await;

    let state = engine.current_state();
    assert_eq!(*state.generation(), *random.generation());
    assert!(state.leaderboard().is_empty());
    assert_eq!(state.leaderboard().day_id(), None);
    assert_eq!(*state.session().as_ref().expect("session").mode(), GameMode::Random);
}

#[tokio::test]
async fn test_random_start_clears_leaderboard() {
    let date = date_pairing_ends();
    let store = MemoryScoreStore::new();
    store.add(&prior_entry(&day_id(date), "earlier", 4)).await.expect("Add failed");
    let engine = engine_with(Arc::new(store), date, EngineConfig::default());

    engine.start_daily().await.expect("Start failed");
    engine.settle().await;
    assert!(!engine.current_state().leaderboard().is_empty());

    let snapshot = engine.start_random().await.expect("Start failed");
    assert!(snapshot.leaderboard().is_empty());
    assert!(snapshot.message().starts_with("training: connect"));
}

#[tokio::test]
async fn test_save_score_rules() {
    let engine = engine_with(Arc::new(MemoryScoreStore::new()), date_pairing_ends(), EngineConfig::default());

    let err = engine.save_score("alice").await.expect_err("no session");
    assert!(matches!(err, EngineError::ScoreRejected(_)));

    engine.start_daily().await.expect("Start failed");
    let err = engine.save_score("alice").await.expect_err("not won");
    assert!(matches!(err, EngineError::ScoreRejected(_)));

    engine.submit_guess("B").await;
    let err = engine.save_score("   ").await.expect_err("blank name");
    assert!(matches!(err, EngineError::ScoreRejected(_)));

    engine.start_random().await.expect("Start failed");
    // Revealing every cell solves any pair.
    for guess in ["A", "B", "C"] {
        engine.submit_guess(guess).await;
    }
    assert_eq!(*engine.current_state().phase(), EnginePhase::Won);
    let err = engine.save_score("alice").await.expect_err("training");
    assert!(matches!(err, EngineError::ScoreRejected(_)));
    assert!(engine.current_state().leaderboard().is_empty());
}

#[tokio::test]
async fn test_saved_score_appears_immediately_and_persists() {
    let date = date_pairing_ends();
    let store = MemoryScoreStore::new();
    let engine = engine_with(Arc::new(store.clone()), date, EngineConfig::default());

    engine.start_daily().await.expect("Start failed");
    engine.submit_guess("B").await;
    let snapshot = engine.save_score(" alice ").await.expect("Save failed");

    let entries = snapshot.leaderboard().entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].player_name(), "alice");
    assert_eq!(*entries[0].move_count(), 1);
    assert_eq!(entries[0].day_id(), &day_id(date));

    engine.settle().await;
    assert_eq!(store.stored().await.len(), 1);
    assert_eq!(engine.current_state().leaderboard().len(), 1);
}

#[tokio::test]
async fn test_failed_write_keeps_optimistic_entry() {
    let store = MemoryScoreStore::new();
    let engine = engine_with(Arc::new(store.clone()), date_pairing_ends(), EngineConfig::default());

    engine.start_daily().await.expect("Start failed");
    engine.settle().await;
    engine.submit_guess("B").await;
    store.set_fail_writes(true);

    engine.save_score("alice").await.expect("Save accepted locally");
    engine.settle().await;

    assert!(store.stored().await.is_empty());
    let state = engine.current_state();
    assert_eq!(state.leaderboard().len(), 1);
    assert_eq!(state.leaderboard().entries()[0].player_name(), "alice");
}

#[tokio::test]
async fn test_same_day_restart_keeps_unsaved_entry() {
    let store = MemoryScoreStore::new();
    let engine = engine_with(Arc::new(store.clone()), date_pairing_ends(), EngineConfig::default());

    engine.start_daily().await.expect("Start failed");
    engine.settle().await;
    engine.submit_guess("B").await;
    store.set_fail_writes(true);
    engine.save_score("alice").await.expect("Save accepted locally");
    engine.settle().await;

    engine.restart().await.expect("Restart failed");
    engine.settle().await;

    assert!(store.stored().await.is_empty());
    let state = engine.current_state();
    assert_eq!(state.leaderboard().len(), 1);
    assert_eq!(state.leaderboard().entries()[0].player_name(), "alice");
}

#[tokio::test]
async fn test_failed_reload_keeps_optimistic_entry() {
    let store = MemoryScoreStore::new();
    let engine = engine_with(Arc::new(store.clone()), date_pairing_ends(), EngineConfig::default());

    engine.start_daily().await.expect("Start failed");
    engine.settle().await;
    engine.submit_guess("B").await;
    store.set_fail_reads(true);

    engine.save_score("alice").await.expect("Save accepted locally");
    engine.settle().await;

    assert_eq!(store.stored().await.len(), 1);
    assert_eq!(engine.current_state().leaderboard().len(), 1);
}

#[tokio::test]
async fn test_insufficient_catalog_stays_loading() {
    let lonely = vec![Element::new(1, "A".into(), "Alpha".into(), None, 1, 1)];
    let catalog = ElementCatalog::with_seed(Arc::new(MemoryCatalogStore::new()), lonely);
    let engine = GameEngine::new(
        catalog,
        LeaderboardService::new(Arc::new(MemoryScoreStore::new())),
        Arc::new(FixedClock::new(date_pairing_ends())),
        EngineConfig::default(),
    );

    let err = engine.start_daily().await.expect_err("one element");
    assert!(matches!(err, EngineError::InsufficientCatalog(ref e) if e.count == 1));

    let state = engine.current_state();
    assert_eq!(*state.phase(), EnginePhase::Loading);
    assert_eq!(state.message(), INSUFFICIENT_DATA);
    assert!(state.session().is_none());
}

#[tokio::test]
async fn test_restart_keeps_mode_or_uses_default() {
    let config = EngineConfig::default().with_default_mode(GameMode::Random);
    let engine = engine_with(Arc::new(MemoryScoreStore::new()), date_pairing_ends(), config);

    let first = engine.restart().await.expect("Restart failed");
    assert_eq!(*first.session().as_ref().expect("session").mode(), GameMode::Random);

    engine.start_daily().await.expect("Start failed");
    engine.submit_guess("B").await;
    let again = engine.restart().await.expect("Restart failed");
    let session = again.session().as_ref().expect("session");
    assert_eq!(*session.mode(), GameMode::Daily);
    assert_eq!(*session.move_count(), 0);
    assert_eq!(*again.phase(), EnginePhase::Active);
    assert_eq!(session.revealed().len(), 2);
    assert!(session.revealed().contains(*session.start().atomic_number()));
    assert!(session.revealed().contains(*session.target().atomic_number()));
    assert!(!session.revealed().contains(2));
}

#[tokio::test]
async fn test_subscribers_see_every_transition() {
    let engine = engine_with(Arc::new(MemoryScoreStore::new()), date_pairing_ends(), EngineConfig::default());
    let mut rx = engine.subscribe();
    assert_eq!(*rx.borrow().phase(), EnginePhase::Loading);

    engine.start_daily().await.expect("Start failed");
    rx.changed().await.expect("Engine dropped");
    assert_eq!(*rx.borrow_and_update().phase(), EnginePhase::Active);

    engine.submit_guess("B").await;
    rx.changed().await.expect("Engine dropped");
    assert_eq!(*rx.borrow_and_update().phase(), EnginePhase::Won);
}
