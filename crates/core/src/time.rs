//! Calendar helpers and an injectable clock.

use chrono::{DateTime, NaiveDate, Utc};

/// Whole days from `start` to `end`; negative when `end` precedes `start`.
pub fn days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days()
}

/// A simple clock abstraction so toggles can be stamped deterministically.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    /// Real system time
    #[default]
    System,
    /// Frozen at a fixed instant
    Fixed(DateTime<Utc>),
}

impl Clock {
    /// Returns a clock fixed at the given timestamp.
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    /// Returns the current time according to the clock.
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }
}
