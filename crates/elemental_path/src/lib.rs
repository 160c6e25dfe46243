//! Elemental Path service layer.
//!
//! Wraps the pure puzzle logic of [`elemental_grid`] with persistence, a
//! daily leaderboard and an async engine that publishes snapshots.
//!
//! # Architecture
//!
//! - **Catalog**: SQLite-backed element table, seeded once and validated
//! - **Stores**: catalog and score stores (SQLite, memory, HTTP)
//! - **Leaderboard**: optimistic local merge over a score store
//! - **Engine**: serialized commands, watch-channel snapshots
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use elemental_path::{
//!     ElementCatalog, ElementRepository, EngineConfig, GameEngine, LeaderboardService,
//!     SqliteScoreStore, SystemClock,
//! };
//!
//! # async fn example() -> anyhow::Result<()> {
//! let repository = ElementRepository::open("elemental_path.db".to_string())?;
//! let catalog = ElementCatalog::new(Arc::new(repository.clone()));
//! let leaderboard = LeaderboardService::new(Arc::new(SqliteScoreStore::new(repository)));
//! let engine = GameEngine::new(catalog, leaderboard, Arc::new(SystemClock), EngineConfig::default());
//!
//! let snapshot = engine.start_daily().await?;
//! println!("{}", snapshot.message());
//! let snapshot = engine.submit_guess("kyslík").await;
//! println!("{}", snapshot.message());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod catalog;
mod clock;
mod config;
mod db;
mod engine;
mod leaderboard;
mod seed;
mod store;

pub use catalog::{CatalogError, ElementCatalog};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{AppConfig, ConfigError, DATABASE_PATH_ENV, ScoreStoreConfig};
pub use db::{DbError, ElementRepository, GameLog, NewGameLog};
pub use engine::{EngineConfig, EngineError, EnginePhase, GameEngine, GameSnapshot};
pub use leaderboard::{LeaderboardService, SaveOutcome};
pub use seed::seed_elements;
pub use store::{
    CatalogStore, HttpScoreStore, MemoryCatalogStore, MemoryScoreStore, ScoreError, ScoreStore, SqliteScoreStore,
};
