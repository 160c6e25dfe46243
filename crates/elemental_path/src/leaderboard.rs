//! Daily leaderboard service.

use std::sync::Arc;

use elemental_grid::{LEADERBOARD_LIMIT, Leaderboard, LeaderboardEntry};
use strum::Display;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::store::{ScoreError, ScoreStore};

/// Result of persisting a score. Failures are logged, never raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SaveOutcome {
    /// The store accepted the entry.
    Saved,
    /// The store rejected the entry; the local copy stays.
    Failed,
}

/// Keeps the active day's leaderboard and talks to the score store.
///
/// Clones share the same cache.
#[derive(Debug, Clone)]
pub struct LeaderboardService {
    store: Arc<dyn ScoreStore>,
    cache: Arc<Mutex<Leaderboard>>,
}

impl LeaderboardService {
    /// Creates a service over `store` with an empty cache.
    #[instrument(skip(store))]
    pub fn new(store: Arc<dyn ScoreStore>) -> Self {
        info!("Creating LeaderboardService");
        Self {
            store,
            cache: Arc::new(Mutex::new(Leaderboard::empty())),
        }
    }

    /// Persists an entry in the score store.
    #[instrument(skip(self, entry), fields(player = %entry.player_name(), moves = entry.move_count()))]
    pub async fn save(&self, entry: &LeaderboardEntry) -> SaveOutcome {
        match self.store.add(entry).await {
            Ok(()) => {
                info!("Score saved");
                SaveOutcome::Saved
            }
            Err(e) => {
                warn!(error = %e, "Score save failed; keeping local copy");
                SaveOutcome::Failed
            }
        }
    }

    /// Loads the day's board, or an empty one if the store fails.
    #[instrument(skip(self))]
    pub async fn load_for_day(&self, day_id: &str) -> Leaderboard {
        match self.try_load_for_day(day_id).await {
            Ok(board) => board,
            Err(e) => {
                warn!(error = %e, "Leaderboard load failed; showing empty board");
                Leaderboard::for_day(day_id, Vec::new())
            }
        }
    }

    /// Loads the day's board, reporting store failures.
    ///
    /// The result is re-ranked locally, so a store that ignores ordering or
    /// limits still yields at most [`LEADERBOARD_LIMIT`] ascending entries.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreError`] if the store fails.
    #[instrument(skip(self))]
    pub async fn try_load_for_day(&self, day_id: &str) -> Result<Leaderboard, ScoreError> {
        let entries = self.store.query_by_day(day_id, LEADERBOARD_LIMIT).await?;
        let board = Leaderboard::for_day(day_id, entries);
        debug!(entries = board.len(), "Leaderboard loaded");
        Ok(board)
    }

    /// The cached board.
    pub async fn cached(&self) -> Leaderboard {
        self.cache.lock().await.clone()
    }

    /// Merges an entry into the cache and returns the updated board.
    #[instrument(skip(self, entry), fields(player = %entry.player_name()))]
    pub async fn merge_local(&self, entry: LeaderboardEntry) -> Leaderboard {
        let mut cache = self.cache.lock().await;
        if !cache.merge(entry) {
            warn!(day = ?cache.day_id(), "Entry belongs to another day; not merged");
        }
        cache.clone()
    }

    /// Replaces the cache.
    #[instrument(skip(self, board), fields(entries = board.len()))]
    pub async fn install(&self, board: Leaderboard) {
        *self.cache.lock().await = board;
    }

    /// Replaces the cache, carrying over local entries the board lacks.
    ///
    /// Used for fetches that may complete after a score was merged locally.
    #[instrument(skip(self, board), fields(entries = board.len()))]
    pub async fn install_keeping_local(&self, mut board: Leaderboard) -> Leaderboard {
        let mut cache = self.cache.lock().await;
        for entry in cache.entries() {
            if !board.entries().contains(entry) {
                board.merge(entry.clone());
            }
        }
        *cache = board.clone();
        board
    }

    /// Empties the cache, binding it to `day_id` when given.
    ///
    /// A cache already bound to `day_id` is kept, so local entries whose
    /// writes failed survive a restart on the same day.
    #[instrument(skip(self))]
    pub async fn reset(&self, day_id: Option<String>) {
        let mut cache = self.cache.lock().await;
        let board = match day_id {
            Some(day) if cache.day_id() == Some(day.as_str()) => {
                debug!(entries = cache.len(), "Keeping cached board for the same day");
                return;
            }
            Some(day) => Leaderboard::for_day(day, Vec::new()),
            None => Leaderboard::empty(),
        };
        *cache = board;
    }
}
