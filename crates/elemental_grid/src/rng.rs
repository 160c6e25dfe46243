//! Index selection for puzzle generation.

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, instrument};

/// Source of catalog indices for choosing start and target.
pub trait RandomnessSource {
    /// Returns an index in `[0, bound)`. `bound` must be non-zero.
    fn next_index(&mut self, bound: usize) -> usize;
}

/// Number of days between 1970-01-01 and `date` (negative before the epoch).
pub fn epoch_day(date: NaiveDate) -> i64 {
    date.signed_duration_since(NaiveDate::default()).num_days()
}

/// Calendar-day identifier used to key daily leaderboards (`YYYY-MM-DD`).
pub fn day_id(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Deterministic generator keyed to a calendar day.
///
/// Every player on the same day, with the same catalog ordering, gets the
/// same sequence of indices.
#[derive(Debug, Clone)]
pub struct SeededDailyRng {
    epoch_day: i64,
    rng: StdRng,
}

impl SeededDailyRng {
    /// Seeds from the day count of `date`.
    #[instrument]
    pub fn for_date(date: NaiveDate) -> Self {
        Self::from_epoch_day(epoch_day(date))
    }

    /// Seeds from an explicit day count.
    #[instrument]
    pub fn from_epoch_day(epoch_day: i64) -> Self {
        debug!(epoch_day, "Seeding daily generator");
        Self {
            epoch_day,
            rng: StdRng::seed_from_u64(epoch_day as u64),
        }
    }

    /// The day count this generator was seeded with.
    pub fn epoch_day(&self) -> i64 {
        self.epoch_day
    }
}

impl RandomnessSource for SeededDailyRng {
    fn next_index(&mut self, bound: usize) -> usize {
        self.rng.random_range(0..bound)
    }
}

/// Non-deterministic generator for training games.
#[derive(Debug, Clone)]
pub struct EntropyRng {
    rng: StdRng,
}

impl EntropyRng {
    /// Seeds from operating-system entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }
}

impl Default for EntropyRng {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomnessSource for EntropyRng {
    fn next_index(&mut self, bound: usize) -> usize {
        self.rng.random_range(0..bound)
    }
}

/// Replays a fixed list of indices, cycling when exhausted.
///
/// Each value is reduced modulo the requested bound.
///
/// [`GameSession::generate`](crate::GameSession::generate) redraws the target
/// until it differs from the start. A script must therefore yield two distinct
/// indices after reduction, or generation never returns. `vec![0]` and an
/// empty script both loop forever.
#[derive(Debug, Clone)]
pub struct ScriptedRng {
    script: Vec<usize>,
    cursor: usize,
}

impl ScriptedRng {
    /// Creates a generator replaying `script`. An empty script always yields 0.
    pub fn new(script: Vec<usize>) -> Self {
        Self { script, cursor: 0 }
    }
}

impl RandomnessSource for ScriptedRng {
    fn next_index(&mut self, bound: usize) -> usize {
        if self.script.is_empty() {
            return 0;
        }
        let value = self.script[self.cursor % self.script.len()];
        self.cursor += 1;
        value % bound
    }
}
