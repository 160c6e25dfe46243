//! Calendar source for daily puzzles and score timestamps.

use chrono::{DateTime, Local, NaiveDate, NaiveTime, Utc};

/// Supplies the current calendar day and instant.
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// The local calendar date.
    fn today(&self) -> NaiveDate;

    /// The current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock of the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen on one day, for reproducible runs.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    today: NaiveDate,
    now: DateTime<Utc>,
}

impl FixedClock {
    /// Freezes the clock at noon UTC of `today`.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            now: today.and_time(NaiveTime::MIN).and_utc() + chrono::Duration::hours(12),
        }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.today
    }

    fn now(&self) -> DateTime<Utc> {
        self.now
    }
}
