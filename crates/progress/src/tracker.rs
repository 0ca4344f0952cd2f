//! Study session: owns the progress map and persists it after each change.

use chrono::{FixedOffset, NaiveDate};
use studytrack_core::{ChapterKey, Clock, CoreError, ProgressMap, ScheduleConfig, TaskType};
use studytrack_storage::Storage;
use tracing::{info, warn};

use crate::assigner::Schedule;
use crate::evaluator::{EvaluationResult, ProgressEvaluator};

/// A study session over one schedule configuration.
///
/// The schedule is computed once at open; every query re-evaluates the
/// current progress map from scratch.
pub struct StudyTracker<S: Storage> {
    config: ScheduleConfig,
    schedule: Schedule,
    progress: ProgressMap,
    storage: S,
    clock: Clock,
    utc_offset: FixedOffset,
}

impl<S: Storage> StudyTracker<S> {
    /// Open a session, loading saved progress from `storage`.
    ///
    /// Missing or unreadable progress starts a blank map; a saved map is
    /// reconciled with the configuration so every chapter has a state.
    pub async fn open(config: ScheduleConfig, storage: S, clock: Clock) -> Self {
        let progress = match storage.load_progress().await {
            Ok(Some(mut progress)) => {
                let report = progress.reconcile(&config);
                if !report.is_clean() {
                    warn!(
                        "Saved progress did not match the curriculum: \
                         {} chapters added, {} dropped",
                        report.added, report.dropped
                    );
                }
                info!("Loaded progress for {} chapters", progress.len());
                progress
            }
            Ok(None) => {
                info!("No saved progress, starting fresh");
                ProgressMap::blank(&config)
            }
            Err(e) => {
                warn!("Failed to load saved progress, starting fresh: {}", e);
                ProgressMap::blank(&config)
            }
        };

        Self {
            schedule: Schedule::build(&config),
            config,
            progress,
            storage,
            clock,
            utc_offset: FixedOffset::east_opt(0).expect("zero offset is valid"),
        }
    }

    /// Count study days in the calendar of the given UTC offset.
    ///
    /// Completion stamps are stored in UTC; without this a late evening
    /// session west of Greenwich splits into two study days.
    pub fn with_utc_offset(mut self, offset: FixedOffset) -> Self {
        self.utc_offset = offset;
        self
    }

    /// The schedule configuration.
    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    /// The chapter to day assignment.
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Current progress.
    pub fn progress(&self) -> &ProgressMap {
        &self.progress
    }

    /// Flip one task of a chapter and persist the change.
    ///
    /// Returns the new flag value. A failed save is logged and the in-memory
    /// change is kept.
    pub async fn toggle(
        &mut self,
        subject: &str,
        chapter: u32,
        task: TaskType,
    ) -> Result<bool, CoreError> {
        let key = ChapterKey::new(subject, chapter);
        let done = self.progress.toggle(&key, task, self.clock.now())?;
        info!("Toggled {} {} -> {}", key, task, done);

        self.persist().await;
        Ok(done)
    }

    /// Forget all progress and persist the blank map.
    pub async fn reset(&mut self) {
        self.progress = ProgressMap::blank(&self.config);
        info!("Progress reset");
        self.persist().await;
    }

    /// Evaluate the current progress.
    ///
    /// `selected` is the day being looked at, `reference` is today.
    pub fn recompute(&self, selected: NaiveDate, reference: NaiveDate) -> EvaluationResult {
        ProgressEvaluator::new(&self.config, &self.schedule)
            .with_utc_offset(self.utc_offset)
            .evaluate(&self.progress, selected, reference)
    }

    /// Give back the storage backend.
    pub fn into_storage(self) -> S {
        self.storage
    }

    async fn persist(&mut self) {
        if let Err(e) = self.storage.save_progress(&self.progress).await {
            warn!("Failed to save progress: {}", e);
        }
    }
}
