//! Pure puzzle logic for Elemental Path.
//!
//! Two elements of the periodic table are picked as start and target; the
//! player reveals elements by name until adjacent revealed cells link them.
//!
//! # Architecture
//!
//! - **Elements**: grid cells keyed by atomic number
//! - **Connectivity**: breadth-first search restricted to revealed cells
//! - **Grid**: validated catalog snapshot with alias and neighbour tables
//! - **Randomness**: date-seeded daily generator and entropy generator
//! - **Session**: value-typed puzzle state and guess transitions
//! - **Leaderboard**: bounded daily ranking
//!
//! # Example
//!
//! ```
//! use elemental_grid::{Element, ElementGrid, GameMode, GameSession, ScoringRule, ScriptedRng};
//!
//! let grid = ElementGrid::new(vec![
//!     Element::new(1, "H".into(), "Hydrogen".into(), None, 1, 1),
//!     Element::new(3, "Li".into(), "Lithium".into(), None, 2, 1),
//! ])
//! .expect("valid catalog");
//!
//! let session = GameSession::generate(&grid, &mut ScriptedRng::new(vec![0, 1]), GameMode::Random)
//!     .expect("two elements");
//! let (session, _) = session.apply_guess(&grid, "li", ScoringRule::NewRevealsOnly);
//! assert!(!session.is_active());
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod aliases;
mod connectivity;
mod element;
mod error;
mod grid;
mod leaderboard;
mod rng;
mod session;

pub use aliases::{AliasIndex, normalize};
pub use connectivity::{NeighborIndex, is_adjacent, reachable};
pub use element::{
    ACTINIDE_ROW, AtomicNumber, Element, GridPosition, LANTHANIDE_ROW, OVERFLOW_FIRST_COL, RevealedSet,
};
pub use error::{InsufficientCatalog, InvariantViolation};
pub use grid::ElementGrid;
pub use leaderboard::{LEADERBOARD_LIMIT, Leaderboard, LeaderboardEntry};
pub use rng::{EntropyRng, RandomnessSource, ScriptedRng, SeededDailyRng, day_id, epoch_day};
pub use session::{
    GameMode, GameSession, GuessOutcome, INSUFFICIENT_DATA, ScoringRule, SessionStatus, UNKNOWN_ELEMENT,
};
