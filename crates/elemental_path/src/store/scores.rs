//! Score store contract and its implementations.
//!
//! The remote record store is best effort: callers treat every error as
//! recoverable.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use derive_more::{Display, Error};
use elemental_grid::LeaderboardEntry;
use reqwest::Url;
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument};

use crate::db::{DbError, ElementRepository};

/// Score store error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Score store error: {} at {}:{}", message, file, line)]
pub struct ScoreError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ScoreError {
    /// Creates a new score store error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        let message = message.into();
        error!(error_message = %message, "Score store error created");
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<reqwest::Error> for ScoreError {
    #[track_caller]
    fn from(err: reqwest::Error) -> Self {
        Self::new(format!("HTTP error: {}", err))
    }
}

impl From<DbError> for ScoreError {
    #[track_caller]
    fn from(err: DbError) -> Self {
        Self::new(err.message)
    }
}

impl From<tokio::task::JoinError> for ScoreError {
    #[track_caller]
    fn from(err: tokio::task::JoinError) -> Self {
        Self::new(format!("Blocking store task failed: {}", err))
    }
}

/// Store of daily scores shared between players.
#[async_trait]
pub trait ScoreStore: Send + Sync + std::fmt::Debug {
    /// Appends an entry.
    async fn add(&self, entry: &LeaderboardEntry) -> Result<(), ScoreError>;

    /// Entries of `day_id`, ascending by move count, at most `limit`.
    async fn query_by_day(&self, day_id: &str, limit: usize) -> Result<Vec<LeaderboardEntry>, ScoreError>;
}

/// In-process score store with switchable failures.
#[derive(Debug, Default, Clone)]
pub struct MemoryScoreStore {
    entries: Arc<RwLock<Vec<LeaderboardEntry>>>,
    fail_writes: Arc<AtomicBool>,
    fail_reads: Arc<AtomicBool>,
}

impl MemoryScoreStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent writes fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Makes subsequent reads fail (or succeed again).
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Every stored entry, in insertion order.
    pub async fn stored(&self) -> Vec<LeaderboardEntry> {
        self.entries.read().await.clone()
    }
}

#[async_trait]
impl ScoreStore for MemoryScoreStore {
    async fn add(&self, entry: &LeaderboardEntry) -> Result<(), ScoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ScoreError::new("memory store rejected write"));
        }
        self.entries.write().await.push(entry.clone());
        Ok(())
    }

    async fn query_by_day(&self, day_id: &str, limit: usize) -> Result<Vec<LeaderboardEntry>, ScoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(ScoreError::new("memory store rejected read"));
        }
        let mut matching: Vec<LeaderboardEntry> = self
            .entries
            .read()
            .await
            .iter()
            .filter(|entry| entry.day_id() == day_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| {
            a.move_count()
                .cmp(b.move_count())
                .then(a.timestamp().cmp(b.timestamp()))
        });
        matching.truncate(limit);
        Ok(matching)
    }
}

/// Scores kept in the local SQLite database, for offline play.
#[derive(Debug, Clone)]
pub struct SqliteScoreStore {
    repository: ElementRepository,
}

impl SqliteScoreStore {
    /// Wraps an opened repository.
    pub fn new(repository: ElementRepository) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl ScoreStore for SqliteScoreStore {
    async fn add(&self, entry: &LeaderboardEntry) -> Result<(), ScoreError> {
        let repository = self.repository.clone();
        let entry = entry.clone();
        Ok(tokio::task::spawn_blocking(move || repository.add_score(&entry)).await??)
    }

    async fn query_by_day(&self, day_id: &str, limit: usize) -> Result<Vec<LeaderboardEntry>, ScoreError> {
        let repository = self.repository.clone();
        let day_id = day_id.to_string();
        Ok(tokio::task::spawn_blocking(move || repository.scores_for_day(&day_id, limit)).await??)
    }
}

/// Remote score store reached over HTTP with JSON bodies.
///
/// `POST {base}/scores` appends an entry; `GET {base}/scores?day_id=..&limit=..`
/// returns the day's entries, best first.
#[derive(Debug, Clone)]
pub struct HttpScoreStore {
    client: reqwest::Client,
    scores_url: Url,
}

impl HttpScoreStore {
    /// Creates a store rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreError`] if the URL is invalid or the client cannot be built.
    #[instrument(skip(base_url), fields(base_url = %base_url))]
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ScoreError> {
        let base = Url::parse(&format!("{}/", base_url.trim_end_matches('/')))
            .map_err(|e| ScoreError::new(format!("Invalid score store URL '{}': {}", base_url, e)))?;
        let scores_url = base
            .join("scores")
            .map_err(|e| ScoreError::new(format!("Invalid score store URL '{}': {}", base_url, e)))?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        info!(url = %scores_url, "HTTP score store ready");
        Ok(Self { client, scores_url })
    }
}

#[async_trait]
impl ScoreStore for HttpScoreStore {
    #[instrument(skip(self, entry), fields(player = %entry.player_name(), day = %entry.day_id()))]
    async fn add(&self, entry: &LeaderboardEntry) -> Result<(), ScoreError> {
        self.client
            .post(self.scores_url.clone())
            .json(entry)
            .send()
            .await?
            .error_for_status()?;
        debug!("Score posted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn query_by_day(&self, day_id: &str, limit: usize) -> Result<Vec<LeaderboardEntry>, ScoreError> {
        let limit = limit.to_string();
        let url = Url::parse_with_params(self.scores_url.as_str(), [("day_id", day_id), ("limit", limit.as_str())])
            .map_err(|e| ScoreError::new(format!("Invalid query URL: {}", e)))?;
        let entries = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<LeaderboardEntry>>()
            .await?;
        debug!(count = entries.len(), "Scores fetched");
        Ok(entries)
    }
}
