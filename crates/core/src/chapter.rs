//! Chapter completion state.

use serde::{Deserialize, Serialize};
use crate::Time;

/// Number of task types tracked per chapter.
pub const TASKS_PER_CHAPTER: u32 = 3;

/// The three tasks that make up a chapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskType {
    /// Reading the chapter
    Reading,
    /// Working through past exam papers
    PastPapers,
    /// Reviewing the chapter
    Review,
}

impl TaskType {
    /// All task types in display order.
    pub const ALL: [TaskType; 3] = [TaskType::Reading, TaskType::PastPapers, TaskType::Review];

    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Reading => "reading",
            TaskType::PastPapers => "past-papers",
            TaskType::Review => "review",
        }
    }
}

impl std::fmt::Display for TaskType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reading" | "read" => Ok(TaskType::Reading),
            "past-papers" | "past_papers" | "pastpapers" | "past" => Ok(TaskType::PastPapers),
            "review" => Ok(TaskType::Review),
            _ => Err(format!("Unknown task type: {}", s)),
        }
    }
}

/// Completion state of one chapter.
///
/// Field names on disk (`past`, `date`) are kept compatible with progress
/// files written by the browser tracker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterState {
    /// Reading done
    #[serde(default)]
    pub reading: bool,

    /// Past papers done
    #[serde(default, rename = "past")]
    pub past_papers: bool,

    /// Review done
    #[serde(default)]
    pub review: bool,

    /// Last time any of the flags was toggled
    #[serde(default, rename = "date")]
    pub completed_at: Option<Time>,
}

impl ChapterState {
    /// Whether the given task is done.
    pub fn is_done(&self, task: TaskType) -> bool {
        match task {
            TaskType::Reading => self.reading,
            TaskType::PastPapers => self.past_papers,
            TaskType::Review => self.review,
        }
    }

    /// Flip the given task and stamp `completed_at`.
    ///
    /// The timestamp is overwritten in both directions, so un-checking a task
    /// also counts as activity on that day. Returns the new flag value.
    pub fn toggle(&mut self, task: TaskType, at: Time) -> bool {
        let flag = match task {
            TaskType::Reading => &mut self.reading,
            TaskType::PastPapers => &mut self.past_papers,
            TaskType::Review => &mut self.review,
        };
        *flag = !*flag;
        self.completed_at = Some(at);
        *flag
    }

    /// Number of finished tasks (0..=3).
    pub fn completed_units(&self) -> u32 {
        TaskType::ALL.iter().filter(|t| self.is_done(**t)).count() as u32
    }

    /// All three tasks are done.
    pub fn is_complete(&self) -> bool {
        self.completed_units() == TASKS_PER_CHAPTER
    }

    /// At least one task is done.
    pub fn is_started(&self) -> bool {
        self.completed_units() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_toggle_twice_restores_flag_but_updates_timestamp() {
        let mut state = ChapterState::default();
        let first = Utc.with_ymd_and_hms(2025, 4, 22, 9, 0, 0).unwrap();
        let second = Utc.with_ymd_and_hms(2025, 4, 23, 18, 30, 0).unwrap();

        assert!(state.toggle(TaskType::PastPapers, first));
        assert_eq!(state.completed_at, Some(first));

        assert!(!state.toggle(TaskType::PastPapers, second));
        assert!(!state.past_papers);
        assert_eq!(state.completed_at, Some(second));
    }

    #[test]
    fn test_completed_units() {
        let mut state = ChapterState::default();
        assert_eq!(state.completed_units(), 0);
        assert!(!state.is_started());

        state.reading = true;
        state.review = true;
        assert_eq!(state.completed_units(), 2);
        assert!(state.is_started());
        assert!(!state.is_complete());

        state.past_papers = true;
        assert!(state.is_complete());
    }

    #[test]
    fn test_task_type_parse() {
        assert_eq!("reading".parse::<TaskType>().unwrap(), TaskType::Reading);
        assert_eq!("Past".parse::<TaskType>().unwrap(), TaskType::PastPapers);
        assert_eq!("past-papers".parse::<TaskType>().unwrap(), TaskType::PastPapers);
        assert_eq!("REVIEW".parse::<TaskType>().unwrap(), TaskType::Review);
        assert!("homework".parse::<TaskType>().is_err());
    }

    #[test]
    fn test_state_serializes_with_legacy_field_names() {
        let state = ChapterState {
            reading: true,
            past_papers: true,
            review: false,
            completed_at: None,
        };
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["past"], true);
        assert!(json["date"].is_null());

        let blob = r#"{"reading":false,"past":true,"review":true,"date":"2025-04-25T10:00:00Z"}"#;
        let parsed: ChapterState = serde_json::from_str(blob).unwrap();
        assert!(parsed.past_papers);
        assert_eq!(
            parsed.completed_at,
            Some(Utc.with_ymd_and_hms(2025, 4, 25, 10, 0, 0).unwrap())
        );
    }
}
