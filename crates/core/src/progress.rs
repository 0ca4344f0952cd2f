//! Progress map - completion state for every chapter of the curriculum.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::chapter::{ChapterState, TaskType};
use crate::error::CoreError;
use crate::schedule::ScheduleConfig;
use crate::subject::ChapterKey;
use crate::Time;

/// Completion state keyed by subject name, then chapter number.
///
/// Built eagerly from a [`ScheduleConfig`] so every configured chapter has
/// exactly one entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressMap {
    subjects: BTreeMap<String, BTreeMap<u32, ChapterState>>,
}

/// What [`ProgressMap::reconcile`] had to change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// Configured chapters that had no entry and were filled with a blank state
    pub added: usize,

    /// Entries that do not belong to the configuration and were removed
    pub dropped: usize,
}

impl Reconciliation {
    /// Nothing changed.
    pub fn is_clean(&self) -> bool {
        self.added == 0 && self.dropped == 0
    }
}

impl ProgressMap {
    /// An all-false map covering every chapter of the configuration.
    pub fn blank(config: &ScheduleConfig) -> Self {
        let subjects = config
            .subjects()
            .iter()
            .map(|s| {
                let chapters = (1..=s.chapters).map(|c| (c, ChapterState::default())).collect();
                (s.name.clone(), chapters)
            })
            .collect();
        Self { subjects }
    }

    /// State of one chapter.
    pub fn get(&self, key: &ChapterKey) -> Option<&ChapterState> {
        self.subjects.get(&key.subject)?.get(&key.chapter)
    }

    /// Mutable state of one chapter.
    pub fn get_mut(&mut self, key: &ChapterKey) -> Option<&mut ChapterState> {
        self.subjects.get_mut(&key.subject)?.get_mut(&key.chapter)
    }

    /// Flip one task of a chapter, stamping it with `at`.
    ///
    /// Returns the new value of the flag.
    pub fn toggle(
        &mut self,
        key: &ChapterKey,
        task: TaskType,
        at: Time,
    ) -> Result<bool, CoreError> {
        let state = self
            .get_mut(key)
            .ok_or_else(|| CoreError::UnknownChapter(key.clone()))?;
        Ok(state.toggle(task, at))
    }

    /// Iterate over every entry.
    pub fn iter(&self) -> impl Iterator<Item = (ChapterKey, &ChapterState)> + '_ {
        self.subjects.iter().flat_map(|(subject, chapters)| {
            chapters
                .iter()
                .map(move |(chapter, state)| (ChapterKey::new(subject.clone(), *chapter), state))
        })
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.subjects.values().map(BTreeMap::len).sum()
    }

    /// Whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Distinct calendar days on which a started chapter was last touched.
    ///
    /// Stamps are stored in UTC; days are counted in the user's `offset` so an
    /// evening session is a single day.
    pub fn study_days(&self, offset: FixedOffset) -> BTreeSet<NaiveDate> {
        self.iter()
            .filter(|(_, state)| state.is_started())
            .filter_map(|(_, state)| state.completed_at)
            .map(|at| at.with_timezone(&offset).date_naive())
            .collect()
    }

    /// Bring a loaded map in line with the configuration.
    ///
    /// Missing chapters get a blank state; subjects and chapters that are not
    /// configured are removed.
    pub fn reconcile(&mut self, config: &ScheduleConfig) -> Reconciliation {
        let mut report = Reconciliation::default();

        let before = self.len();
        self.subjects.retain(|name, chapters| match config.subject(name) {
            Some(subject) => {
                chapters.retain(|c, _| (1..=subject.chapters).contains(c));
                true
            }
            None => false,
        });
        report.dropped = before - self.len();

        for subject in config.subjects() {
            let chapters = self.subjects.entry(subject.name.clone()).or_default();
            for chapter in 1..=subject.chapters {
                if !chapters.contains_key(&chapter) {
                    chapters.insert(chapter, ChapterState::default());
                    report.added += 1;
                }
            }
        }

        report
    }
}
