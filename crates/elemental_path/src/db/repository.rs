//! SQLite repository for the catalog, local scores and game logs.

use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use elemental_grid::{Element, LeaderboardEntry};
use tracing::{debug, info, instrument};

use crate::db::{DbError, ElementRow, GameLog, NewGameLog, NewScore, ScoreRow, schema};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Milliseconds a connection waits on a locked database before failing.
const BUSY_TIMEOUT_MS: u32 = 5_000;

/// Database repository for catalog and score operations.
///
/// Each call opens its own connection, so the repository is cheap to clone
/// and safe to move into blocking tasks.
#[derive(Debug, Clone)]
pub struct ElementRepository {
    db_path: String,
}

impl ElementRepository {
    /// Opens the database at `db_path` and applies pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the database cannot be opened or migrated.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn open(db_path: String) -> Result<Self, DbError> {
        info!(path = %db_path, "Opening ElementRepository");
        let repository = Self { db_path };
        repository.run_migrations()?;
        Ok(repository)
    }

    /// Path of the backing database file.
    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    /// Applies any migrations not yet recorded in the database.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a migration fails.
    #[instrument(skip(self))]
    pub fn run_migrations(&self) -> Result<(), DbError> {
        let mut conn = self.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::new(format!("Migration failed: {}", e)))?;
        info!(applied = applied.len(), "Migrations applied");
        Ok(())
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        let mut conn = SqliteConnection::establish(&self.db_path)
            .map_err(|e| DbError::new(format!("Failed to connect to '{}': {}", self.db_path, e)))?;
        diesel::sql_query(format!("PRAGMA busy_timeout = {}", BUSY_TIMEOUT_MS)).execute(&mut conn)?;
        Ok(conn)
    }

    /// Number of catalog rows.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn count_elements(&self) -> Result<usize, DbError> {
        let mut conn = self.connection()?;
        let count: i64 = schema::elements::table.count().get_result(&mut conn)?;
        debug!(count, "Counted elements");
        usize::try_from(count).map_err(|_| DbError::new(format!("Invalid element count {}", count)))
    }

    /// Loads the catalog ordered by atomic number.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs or a row is malformed.
    #[instrument(skip(self))]
    pub fn load_elements(&self) -> Result<Vec<Element>, DbError> {
        let mut conn = self.connection()?;
        let rows = schema::elements::table
            .select(ElementRow::as_select())
            .order(schema::elements::atomic_number.asc())
            .load::<ElementRow>(&mut conn)?;

        let elements = rows
            .into_iter()
            .map(ElementRow::into_element)
            .collect::<Result<Vec<_>, _>>()?;
        info!(count = elements.len(), "Elements loaded");
        Ok(elements)
    }

    /// Inserts elements, skipping rows whose key or cell already exists.
    ///
    /// Runs in one transaction: either every row is attempted or none is.
    /// Returns the number of rows actually inserted.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self, elements), fields(elements = elements.len()))]
    pub fn insert_if_absent(&self, elements: &[Element]) -> Result<usize, DbError> {
        let rows = elements
            .iter()
            .map(ElementRow::from_element)
            .collect::<Result<Vec<_>, _>>()?;
        let mut conn = self.connection()?;

        let inserted = conn.transaction::<usize, DbError, _>(|conn| {
            let mut inserted = 0;
            for row in &rows {
                inserted += diesel::insert_or_ignore_into(schema::elements::table)
                    .values(row)
                    .execute(conn)?;
            }
            Ok(inserted)
        })?;

        info!(inserted, skipped = rows.len() - inserted, "Elements inserted");
        Ok(inserted)
    }

    /// Stores a score in the local leaderboard table.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self, entry), fields(player = %entry.player_name(), day = %entry.day_id()))]
    pub fn add_score(&self, entry: &LeaderboardEntry) -> Result<(), DbError> {
        let row = NewScore::from_entry(entry)?;
        let mut conn = self.connection()?;
        diesel::insert_into(schema::scores::table)
            .values(&row)
            .execute(&mut conn)?;
        info!(moves = entry.move_count(), "Score stored");
        Ok(())
    }

    /// Best scores for a day: ascending move count, earliest first on ties.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn scores_for_day(&self, day_id: &str, limit: usize) -> Result<Vec<LeaderboardEntry>, DbError> {
        let mut conn = self.connection()?;
        let rows = schema::scores::table
            .filter(schema::scores::day_id.eq(day_id))
            .order((schema::scores::move_count.asc(), schema::scores::created_at.asc()))
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .select(ScoreRow::as_select())
            .load::<ScoreRow>(&mut conn)?;

        let entries = rows
            .into_iter()
            .map(ScoreRow::into_entry)
            .collect::<Result<Vec<_>, _>>()?;
        debug!(day_id, count = entries.len(), "Scores loaded");
        Ok(entries)
    }

    /// Records a finished session.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self, log), fields(mode = %log.mode(), success = log.success()))]
    pub fn record_game_log(&self, log: NewGameLog) -> Result<GameLog, DbError> {
        let mut conn = self.connection()?;
        let stored = diesel::insert_into(schema::game_logs::table)
            .values(&log)
            .returning(GameLog::as_returning())
            .get_result(&mut conn)?;
        info!(log_id = stored.id(), "Game log recorded");
        Ok(stored)
    }

    /// Most recent game logs first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn recent_game_logs(&self, limit: usize) -> Result<Vec<GameLog>, DbError> {
        let mut conn = self.connection()?;
        let logs = schema::game_logs::table
            .order(schema::game_logs::id.desc())
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .select(GameLog::as_select())
            .load::<GameLog>(&mut conn)?;
        debug!(count = logs.len(), "Game logs loaded");
        Ok(logs)
    }
}
