//! StudyTrack core data models.
//!
//! This crate defines the curriculum configuration, the per-chapter
//! completion state and the progress map that the schedule engine reads.

#![warn(missing_docs)]

// Curriculum identities
mod subject;

// Completion state
mod chapter;
mod progress;

// Configuration
mod schedule;

mod error;
mod time;

// Re-exports
pub use subject::{ChapterKey, Subject};
pub use chapter::{ChapterState, TaskType, TASKS_PER_CHAPTER};
pub use progress::{ProgressMap, Reconciliation};
pub use schedule::{ConfigError, ScheduleConfig, ScheduleSpec, MAX_CHAPTERS};
pub use error::CoreError;
pub use time::{days_between, Clock};

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;
