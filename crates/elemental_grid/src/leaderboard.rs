//! Daily leaderboard ranking.

use chrono::{DateTime, Utc};
use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};

/// Maximum number of entries a leaderboard keeps.
pub const LEADERBOARD_LIMIT: usize = 10;

/// A saved daily score.
///
/// Serializes with camelCase keys (`playerName`, `moveCount`, `dayId`,
/// `timestamp`), the record layout of the shared score store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    player_name: String,
    move_count: u32,
    day_id: String,
    timestamp: DateTime<Utc>,
}

/// Top scores for one day, ascending by move count.
///
/// Ties keep the earlier timestamp first.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Leaderboard {
    day_id: Option<String>,
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// An empty board not bound to any day.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Ranks `entries` for `day_id`, dropping entries from other days.
    pub fn for_day(day_id: impl Into<String>, entries: impl IntoIterator<Item = LeaderboardEntry>) -> Self {
        let day_id = day_id.into();
        let entries = entries
            .into_iter()
            .filter(|entry| entry.day_id == day_id)
            .collect();
        let mut board = Self {
            day_id: Some(day_id),
            entries,
        };
        board.rank();
        board
    }

    /// Inserts an entry, re-sorts and truncates to [`LEADERBOARD_LIMIT`].
    ///
    /// Returns `false` if the entry belongs to a different day.
    pub fn merge(&mut self, entry: LeaderboardEntry) -> bool {
        let day = self.day_id.get_or_insert_with(|| entry.day_id.clone());
        if *day != entry.day_id {
            return false;
        }
        self.entries.push(entry);
        self.rank();
        true
    }

    /// Day the board belongs to, if any.
    pub fn day_id(&self) -> Option<&str> {
        self.day_id.as_deref()
    }

    /// Ranked entries.
    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the board has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn rank(&mut self) {
        self.entries
            .sort_by(|a, b| a.move_count.cmp(&b.move_count).then(a.timestamp.cmp(&b.timestamp)));
        self.entries.truncate(LEADERBOARD_LIMIT);
    }
}
