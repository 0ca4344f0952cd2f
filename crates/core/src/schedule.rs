//! Schedule configuration - the fixed curriculum and its date window.

use std::collections::HashSet;
use std::num::NonZeroUsize;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::subject::{ChapterKey, Subject};
use crate::time::days_between;

/// Upper bound on the chapters of one curriculum.
pub const MAX_CHAPTERS: u32 = 100_000;

/// Errors raised while validating a schedule configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// No subject has any chapters
    #[error("curriculum has no chapters")]
    EmptyCurriculum,

    /// The chapter counts add up to more than [`MAX_CHAPTERS`]
    #[error("curriculum has more than {} chapters", MAX_CHAPTERS)]
    TooManyChapters,

    /// The end date lies before the start date
    #[error("end date {end} is before start date {start}")]
    InvalidDateRange {
        /// Start of the schedule
        start: NaiveDate,
        /// Original end of the schedule
        end: NaiveDate,
    },

    /// Two subjects share a name
    #[error("duplicate subject: {0}")]
    DuplicateSubject(String),

    /// A subject has a blank name
    #[error("subject name must not be empty")]
    EmptySubjectName,

    /// The configuration file could not be parsed
    #[error("invalid schedule file: {0}")]
    Parse(String),
}

/// Unvalidated schedule as it appears in a configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleSpec {
    /// First day of the schedule
    pub start_date: NaiveDate,

    /// Last day of the schedule as originally planned
    pub original_end_date: NaiveDate,

    /// Subjects in interleaving order
    pub subjects: Vec<Subject>,
}

/// A validated schedule configuration.
///
/// Immutable once built; every accessor is guaranteed to see at least one
/// chapter and a non-empty date window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ScheduleSpec", into = "ScheduleSpec")]
pub struct ScheduleConfig {
    start_date: NaiveDate,
    original_end_date: NaiveDate,
    subjects: Vec<Subject>,
    total_chapters: u32,
    chapters_per_day: NonZeroUsize,
}

impl ScheduleConfig {
    /// Validate and build a configuration.
    pub fn new(
        start_date: NaiveDate,
        original_end_date: NaiveDate,
        subjects: Vec<Subject>,
    ) -> Result<Self, ConfigError> {
        if original_end_date < start_date {
            return Err(ConfigError::InvalidDateRange {
                start: start_date,
                end: original_end_date,
            });
        }

        let mut seen = HashSet::new();
        for subject in &subjects {
            if subject.name.trim().is_empty() {
                return Err(ConfigError::EmptySubjectName);
            }
            if !seen.insert(subject.name.as_str()) {
                return Err(ConfigError::DuplicateSubject(subject.name.clone()));
            }
        }

        let total_chapters = subjects
            .iter()
            .try_fold(0u32, |acc, s| acc.checked_add(s.chapters))
            .filter(|total| *total <= MAX_CHAPTERS)
            .ok_or(ConfigError::TooManyChapters)?;
        if total_chapters == 0 {
            return Err(ConfigError::EmptyCurriculum);
        }

        // Inclusive window, so always >= 1 here.
        let window_days = (days_between(start_date, original_end_date) + 1) as u64;
        let per_day = (total_chapters as u64).div_ceil(window_days) as usize;
        let chapters_per_day = NonZeroUsize::new(per_day).ok_or(ConfigError::EmptyCurriculum)?;

        Ok(Self {
            start_date,
            original_end_date,
            subjects,
            total_chapters,
            chapters_per_day,
        })
    }

    /// The curriculum the tracker ships with: five engineering subjects of
    /// twenty chapters each over four weeks.
    pub fn builtin() -> Self {
        let subjects = [
            "Mathematics",
            "Physics",
            "Fluid Mechanics",
            "Materials Science",
            "Thermodynamics",
        ]
        .into_iter()
        .map(|name| Subject::new(name, 20))
        .collect();

        let start = NaiveDate::from_ymd_opt(2025, 4, 22).expect("valid start date");
        let end = NaiveDate::from_ymd_opt(2025, 5, 19).expect("valid end date");
        Self::new(start, end, subjects).expect("built-in schedule is valid")
    }

    /// Parse and validate a JSON schedule file.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let spec: ScheduleSpec =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Self::try_from(spec)
    }

    /// First day of the schedule.
    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// Originally planned last day.
    pub fn original_end_date(&self) -> NaiveDate {
        self.original_end_date
    }

    /// Subjects in interleaving order.
    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    /// Look up a subject by name.
    pub fn subject(&self, name: &str) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.name == name)
    }

    /// Every chapter key in configuration order.
    pub fn chapter_keys(&self) -> impl Iterator<Item = ChapterKey> + '_ {
        self.subjects.iter().flat_map(Subject::chapter_keys)
    }

    /// Sum of all chapter counts.
    pub fn total_chapters(&self) -> u32 {
        self.total_chapters
    }

    /// Chapters that must be finished per day to meet the original end date.
    pub fn chapters_per_day(&self) -> NonZeroUsize {
        self.chapters_per_day
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TryFrom<ScheduleSpec> for ScheduleConfig {
    type Error = ConfigError;

    fn try_from(spec: ScheduleSpec) -> Result<Self, Self::Error> {
        Self::new(spec.start_date, spec.original_end_date, spec.subjects)
    }
}

impl From<ScheduleConfig> for ScheduleSpec {
    fn from(config: ScheduleConfig) -> Self {
        Self {
            start_date: config.start_date,
            original_end_date: config.original_end_date,
            subjects: config.subjects,
        }
    }
}
