//! Database rows and their conversions to domain types.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use elemental_grid::{Element, GameMode, LeaderboardEntry};
use tracing::instrument;

use crate::db::{DbError, schema};

/// Catalog row; insertable as-is for seeding.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable, Getters)]
#[diesel(table_name = schema::elements)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ElementRow {
    atomic_number: i32,
    symbol: String,
    primary_name: String,
    local_name: Option<String>,
    grid_row: i32,
    grid_col: i32,
}

impl ElementRow {
    /// Converts a domain element into a row.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the atomic number does not fit the column.
    #[instrument(skip(element), fields(atomic_number = element.atomic_number()))]
    pub fn from_element(element: &Element) -> Result<Self, DbError> {
        let atomic_number = i32::try_from(*element.atomic_number())
            .map_err(|_| DbError::new(format!("Atomic number {} out of range", element.atomic_number())))?;
        Ok(Self {
            atomic_number,
            symbol: element.symbol().clone(),
            primary_name: element.primary_name().clone(),
            local_name: element.local_name().clone(),
            grid_row: *element.row(),
            grid_col: *element.col(),
        })
    }

    /// Converts the row back into a domain element.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the stored atomic number is negative.
    #[instrument(skip(self), fields(atomic_number = self.atomic_number))]
    pub fn into_element(self) -> Result<Element, DbError> {
        let atomic_number = u32::try_from(self.atomic_number)
            .map_err(|_| DbError::new(format!("Negative atomic number {}", self.atomic_number)))?;
        Ok(Element::new(
            atomic_number,
            self.symbol,
            self.primary_name,
            self.local_name,
            self.grid_row,
            self.grid_col,
        ))
    }
}

/// Stored local score.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::scores)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ScoreRow {
    id: i32,
    player_name: String,
    move_count: i32,
    day_id: String,
    created_at: NaiveDateTime,
}

impl ScoreRow {
    /// Converts the row into a leaderboard entry (timestamps stored as UTC).
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the stored move count is negative.
    #[instrument(skip(self), fields(id = self.id))]
    pub fn into_entry(self) -> Result<LeaderboardEntry, DbError> {
        let move_count = u32::try_from(self.move_count)
            .map_err(|_| DbError::new(format!("Negative move count {}", self.move_count)))?;
        Ok(LeaderboardEntry::new(
            self.player_name,
            move_count,
            self.day_id,
            self.created_at.and_utc(),
        ))
    }
}

/// Insertable local score.
#[derive(Debug, Clone, Insertable, Getters)]
#[diesel(table_name = schema::scores)]
pub struct NewScore {
    player_name: String,
    move_count: i32,
    day_id: String,
    created_at: NaiveDateTime,
}

impl NewScore {
    /// Builds the row for a leaderboard entry.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the move count does not fit the column.
    #[instrument(skip(entry), fields(player = %entry.player_name()))]
    pub fn from_entry(entry: &LeaderboardEntry) -> Result<Self, DbError> {
        let move_count = i32::try_from(*entry.move_count())
            .map_err(|_| DbError::new(format!("Move count {} out of range", entry.move_count())))?;
        Ok(Self {
            player_name: entry.player_name().clone(),
            move_count,
            day_id: entry.day_id().clone(),
            created_at: entry.timestamp().naive_utc(),
        })
    }
}

/// Record of a finished session.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::game_logs)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct GameLog {
    id: i32,
    mode: String,
    start_symbol: String,
    target_symbol: String,
    move_count: i32,
    success: bool,
    played_at: NaiveDateTime,
}

impl GameLog {
    /// Parses the stored mode string.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the string is not a known mode.
    #[instrument(skip(self), fields(mode = %self.mode))]
    pub fn parse_mode(&self) -> Result<GameMode, DbError> {
        self.mode
            .parse()
            .map_err(|_| DbError::new(format!("Invalid mode: '{}'", self.mode)))
    }
}

/// Insertable game log; `played_at` defaults to the insert time.
#[derive(Debug, Clone, Insertable, new, Getters)]
#[diesel(table_name = schema::game_logs)]
pub struct NewGameLog {
    mode: String,
    start_symbol: String,
    target_symbol: String,
    move_count: i32,
    success: bool,
}
