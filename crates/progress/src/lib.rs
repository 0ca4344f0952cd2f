//! Schedule assignment and progress evaluation.
//!
//! Chapter-to-day assignment, lateness classification, and completion date
//! projection.

#![warn(missing_docs)]

pub mod assigner;
pub mod evaluator;
pub mod estimator;
pub mod tracker;

pub use assigner::{assign, Schedule, ScheduledChapter};
pub use evaluator::{DailyCompleted, EvaluationResult, ProgressEvaluator};
pub use estimator::{CompletionEstimator, Projection, Throughput};
pub use tracker::StudyTracker;
