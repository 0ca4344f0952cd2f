//! Progress evaluation against the schedule.

use std::collections::BTreeMap;

use chrono::{FixedOffset, NaiveDate};
use serde::Serialize;
use studytrack_core::{
    days_between, ChapterKey, ProgressMap, ScheduleConfig, TASKS_PER_CHAPTER,
};
use tracing::{debug, warn};

use crate::assigner::Schedule;
use crate::estimator::{CompletionEstimator, Projection, Throughput};

/// Completed units of the chapters scheduled on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyCompleted {
    /// Calendar date of the schedule day
    pub date: NaiveDate,
    /// Completed units across the chapters assigned to that day
    pub count: u32,
}

/// Everything derived from the progress map for one point in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationResult {
    /// Finished task units
    pub completed_units: u32,

    /// All task units (three per chapter)
    pub total_units: u32,

    /// Percentage complete (0-100)
    pub percent: f64,

    /// Unfinished chapters scheduled on the selected date, in curriculum order
    pub today_incomplete: Vec<ChapterKey>,

    /// Unfinished chapters scheduled before the reference date, in curriculum order
    pub overdue: Vec<ChapterKey>,

    /// Completed units per schedule day, by day
    pub daily_completed_series: Vec<DailyCompleted>,

    /// Projected completion
    pub projection: Projection,
}

impl EvaluationResult {
    /// Labels of the unfinished chapters due on the selected date.
    pub fn today_labels(&self) -> Vec<String> {
        self.today_incomplete.iter().map(ChapterKey::label).collect()
    }

    /// Labels of the overdue chapters.
    pub fn overdue_labels(&self) -> Vec<String> {
        self.overdue.iter().map(ChapterKey::label).collect()
    }

    /// Every unit is done.
    pub fn is_complete(&self) -> bool {
        self.completed_units == self.total_units
    }
}

/// Evaluates a progress map against a schedule.
pub struct ProgressEvaluator<'a> {
    config: &'a ScheduleConfig,
    schedule: &'a Schedule,
    utc_offset: FixedOffset,
}

impl<'a> ProgressEvaluator<'a> {
    /// Create an evaluator that counts study days in UTC.
    pub fn new(config: &'a ScheduleConfig, schedule: &'a Schedule) -> Self {
        Self {
            config,
            schedule,
            utc_offset: FixedOffset::east_opt(0).expect("zero offset is valid"),
        }
    }

    /// Count study days in the calendar of the given UTC offset.
    pub fn with_utc_offset(mut self, offset: FixedOffset) -> Self {
        self.utc_offset = offset;
        self
    }

    /// Walk every configured chapter and derive the evaluation.
    ///
    /// `selected` is the date whose unfinished chapters are listed;
    /// `reference` is the current calendar date and decides what is overdue.
    pub fn evaluate(
        &self,
        progress: &ProgressMap,
        selected: NaiveDate,
        reference: NaiveDate,
    ) -> EvaluationResult {
        let start = self.config.start_date();
        let selected_day = days_between(start, selected);
        let now_day = days_between(start, reference);

        let mut completed_units = 0;
        let mut total_units = 0;
        let mut today_incomplete = Vec::new();
        let mut overdue = Vec::new();
        let mut per_day: BTreeMap<u32, u32> = BTreeMap::new();

        for key in self.config.chapter_keys() {
            let done = progress.get(&key).map_or(0, |s| s.completed_units());
            total_units += TASKS_PER_CHAPTER;
            completed_units += done;

            let Some(day) = self.schedule.day_of(&key) else {
                warn!("Chapter {} has no scheduled day, skipping lateness checks", key);
                continue;
            };

            let complete = done == TASKS_PER_CHAPTER;
            if !complete && day as i64 == selected_day {
                today_incomplete.push(key.clone());
            }
            if !complete && (day as i64) < now_day {
                overdue.push(key);
            }

            *per_day.entry(day).or_insert(0) += done;
        }

        let daily_completed_series = per_day
            .into_iter()
            .map(|(day, count)| DailyCompleted {
                date: self.schedule.date_of(day),
                count,
            })
            .collect();

        let percent = if total_units > 0 {
            completed_units as f64 * 100.0 / total_units as f64
        } else {
            0.0
        };

        let throughput = Throughput {
            completed_units,
            total_units,
            study_days: progress.study_days(self.utc_offset).len(),
            has_overdue: !overdue.is_empty(),
        };
        let projection = CompletionEstimator::new(self.config.original_end_date())
            .estimate(throughput, reference);

        debug!(
            "Evaluated {}/{} units, {} due on {}, {} overdue",
            completed_units,
            total_units,
            today_incomplete.len(),
            selected,
            overdue.len()
        );

        EvaluationResult {
            completed_units,
            total_units,
            percent,
            today_incomplete,
            overdue,
            daily_completed_series,
            projection,
        }
    }
}
