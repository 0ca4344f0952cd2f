//! Completion date estimation from observed throughput.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

/// Projected completion of the curriculum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Projection {
    /// Everything is done; the original end date stands
    OnSchedule {
        /// The originally planned end date
        end: NaiveDate,
    },
    /// Behind or unfinished; end date re-estimated from the actual pace
    Revised {
        /// Estimated end date
        end: NaiveDate,
        /// Days from the reference date to `end`
        days_remaining: u64,
        /// Completed units per study day so far
        daily_rate: f64,
    },
    /// Nothing has been completed yet, so there is no pace to project from
    Unavailable,
}

impl Projection {
    /// Projected end date, if one can be given.
    pub fn end_date(&self) -> Option<NaiveDate> {
        match self {
            Projection::OnSchedule { end } | Projection::Revised { end, .. } => Some(*end),
            Projection::Unavailable => None,
        }
    }

    /// Days the projection lies past `original_end` (negative when ahead).
    pub fn slip_days(&self, original_end: NaiveDate) -> Option<i64> {
        self.end_date().map(|end| (end - original_end).num_days())
    }
}

/// Observed progress the estimate is based on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Throughput {
    /// Finished task units
    pub completed_units: u32,
    /// All task units in the curriculum
    pub total_units: u32,
    /// Distinct calendar days on which work was recorded
    pub study_days: usize,
    /// Whether any chapter is past its scheduled day and unfinished
    pub has_overdue: bool,
}

/// Completion date estimator.
#[derive(Debug, Clone, Copy)]
pub struct CompletionEstimator {
    original_end: NaiveDate,
}

impl CompletionEstimator {
    /// Create an estimator for a schedule that was planned to end on `original_end`.
    pub fn new(original_end: NaiveDate) -> Self {
        Self { original_end }
    }

    /// Estimate the end date as seen from `reference`.
    ///
    /// The pace is `completed / study_days` (at least one day), and the
    /// remaining units are spread over `ceil(remaining / pace)` further days.
    pub fn estimate(&self, throughput: Throughput, reference: NaiveDate) -> Projection {
        let Throughput {
            completed_units,
            total_units,
            study_days,
            has_overdue,
        } = throughput;

        if !has_overdue && completed_units >= total_units {
            return Projection::OnSchedule {
                end: self.original_end,
            };
        }

        if completed_units == 0 {
            return Projection::Unavailable;
        }

        let days_used = study_days.max(1) as u64;
        let completed = completed_units as u64;
        let remaining = total_units.saturating_sub(completed_units) as u64;

        // ceil(remaining / (completed / days_used)) without floating point
        let days_remaining = (remaining * days_used).div_ceil(completed);

        Projection::Revised {
            end: reference + Duration::days(days_remaining as i64),
            days_remaining,
            daily_rate: completed as f64 / days_used as f64,
        }
    }
}
