//! Storage contracts consumed by the catalog and the leaderboard.

mod catalog;
mod scores;

pub use catalog::{CatalogStore, MemoryCatalogStore};
pub use scores::{HttpScoreStore, MemoryScoreStore, ScoreError, ScoreStore, SqliteScoreStore};
