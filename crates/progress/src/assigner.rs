//! Curriculum assignment: interleaves subjects' chapters into schedule days.

use std::collections::HashMap;
use std::num::NonZeroUsize;

use chrono::NaiveDate;
use studytrack_core::{ChapterKey, ScheduleConfig, Subject};

/// A chapter together with the zero-based day it is scheduled on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledChapter {
    /// The chapter
    pub key: ChapterKey,
    /// Zero-based day relative to the schedule start
    pub day: u32,
}

/// Interleave subjects round-robin and bucket the sequence into days.
///
/// Each sweep visits subjects in order and takes the next unassigned chapter
/// of every subject that still has one, so chapter 1 of every subject comes
/// before chapter 2 of any. Subjects without chapters contribute nothing.
pub fn assign(subjects: &[Subject], per_day: NonZeroUsize) -> Vec<ScheduledChapter> {
    let total: usize = subjects.iter().map(|s| s.chapters as usize).sum();
    let mut cursors = vec![1u32; subjects.len()];
    let mut sequence = Vec::with_capacity(total);

    while sequence.len() < total {
        for (subject, cursor) in subjects.iter().zip(cursors.iter_mut()) {
            if *cursor <= subject.chapters {
                let day = (sequence.len() / per_day.get()) as u32;
                sequence.push(ScheduledChapter {
                    key: ChapterKey::new(subject.name.clone(), *cursor),
                    day,
                });
                *cursor += 1;
            }
        }
    }

    sequence
}

/// The assignment for a configuration, indexed for lookups.
///
/// Depends only on the configuration, so it is built once per session.
#[derive(Debug, Clone)]
pub struct Schedule {
    start_date: NaiveDate,
    entries: Vec<ScheduledChapter>,
    days: HashMap<ChapterKey, u32>,
}

impl Schedule {
    /// Build the schedule for a configuration.
    pub fn build(config: &ScheduleConfig) -> Self {
        Self::from_entries(
            config.start_date(),
            assign(config.subjects(), config.chapters_per_day()),
        )
    }

    /// Wrap an existing assignment.
    pub fn from_entries(start_date: NaiveDate, entries: Vec<ScheduledChapter>) -> Self {
        let days = entries.iter().map(|e| (e.key.clone(), e.day)).collect();
        Self {
            start_date,
            entries,
            days,
        }
    }

    /// Every scheduled chapter in sequence order.
    pub fn entries(&self) -> &[ScheduledChapter] {
        &self.entries
    }

    /// Day a chapter is scheduled on.
    pub fn day_of(&self, key: &ChapterKey) -> Option<u32> {
        self.days.get(key).copied()
    }

    /// Chapters scheduled on the given day index, in sequence order.
    ///
    /// Negative indices (dates before the start) have no chapters.
    pub fn chapters_on(&self, day: i64) -> impl Iterator<Item = &ChapterKey> + '_ {
        self.entries
            .iter()
            .filter(move |e| e.day as i64 == day)
            .map(|e| &e.key)
    }

    /// Last day that has a chapter.
    pub fn last_day(&self) -> Option<u32> {
        self.entries.last().map(|e| e.day)
    }

    /// Calendar date of a schedule day.
    pub fn date_of(&self, day: u32) -> NaiveDate {
        self.start_date + chrono::Duration::days(day as i64)
    }

    /// Number of scheduled chapters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is scheduled.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
