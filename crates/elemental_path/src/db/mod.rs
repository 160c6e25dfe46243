//! SQLite persistence for the element catalog, local scores and game logs.

mod error;
mod models;
mod repository;
mod schema;

pub use error::DbError;
pub use models::{ElementRow, GameLog, NewGameLog, NewScore, ScoreRow};
pub use repository::ElementRepository;
