use chrono::{Duration, NaiveDate, TimeZone, Utc};
use studytrack_core::{ChapterKey, Clock, ProgressMap, ScheduleConfig, TaskType};
use studytrack_progress::{Projection, Schedule, StudyTracker};
use studytrack_storage::{JsonStorage, Storage};

fn date(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, m, d).unwrap()
}

fn first_day_clock() -> Clock {
    Clock::fixed(Utc.with_ymd_and_hms(2025, 4, 22, 20, 0, 0).unwrap())
}

async fn open_tracker(dir: &std::path::Path) -> StudyTracker<JsonStorage> {
    let storage = JsonStorage::new(dir).await.unwrap();
    StudyTracker::open(ScheduleConfig::builtin(), storage, first_day_clock()).await
}

#[test]
fn builtin_curriculum_assignment() {
    let config = ScheduleConfig::builtin();
    let schedule = Schedule::build(&config);

    assert_eq!(config.chapters_per_day().get(), 4);
    assert_eq!(schedule.entries()[0].key, ChapterKey::new("Mathematics", 1));
    assert_eq!(schedule.day_of(&ChapterKey::new("Mathematics", 1)), Some(0));
    assert_eq!(schedule.entries()[4].key, ChapterKey::new("Thermodynamics", 1));
    assert_eq!(schedule.day_of(&ChapterKey::new("Thermodynamics", 1)), Some(1));
}

#[tokio::test]
async fn nothing_done_has_no_projection() {
    let dir = tempfile::tempdir().unwrap();
    let tracker = open_tracker(dir.path()).await;

    let result = tracker.recompute(date(4, 25), date(4, 25));

    assert_eq!(result.percent, 0.0);
    assert_eq!(result.total_units, 300);
    assert_eq!(result.projection, Projection::Unavailable);
    // Days 0..=2 are behind: 12 chapters overdue, listed in curriculum order.
    assert_eq!(result.overdue.len(), 12);
    assert_eq!(result.overdue_labels()[0], "Mathematics 1");
    assert_eq!(result.overdue_labels()[1], "Mathematics 2");
}

#[tokio::test]
async fn first_day_completed() {
    let dir = tempfile::tempdir().unwrap();
    let mut tracker = open_tracker(dir.path()).await;

    let first_day: Vec<ChapterKey> = tracker.schedule().chapters_on(0).cloned().collect();
    assert_eq!(first_day.len(), 4);
    for key in &first_day {
        for task in TaskType::ALL {
            tracker.toggle(&key.subject, key.chapter, task).await.unwrap();
        }
    }

    let result = tracker.recompute(date(4, 22), date(4, 22));
    assert_eq!(result.completed_units, 12);
    assert_eq!(result.total_units, 300);
    assert!((result.percent - 4.0).abs() < 1e-9);
    assert!(result.today_incomplete.is_empty());
    assert!(result.overdue.is_empty());
    assert_eq!(result.daily_completed_series[0].count, 12);
    assert_eq!(result.daily_completed_series.len(), 25);
    assert_eq!(result.projection.end_date(), Some(date(5, 16)));

    // The next morning nothing new is overdue and day 1 is listed.
    let next = tracker.recompute(date(4, 23), date(4, 23));
    assert!(next.overdue.is_empty());
    assert_eq!(next.today_incomplete.len(), 4);
}

#[tokio::test]
async fn overdue_sticks_until_completed() {
    let dir = tempfile::tempdir().unwrap();
    let mut tracker = open_tracker(dir.path()).await;
    let target = ChapterKey::new("Physics", 1);

    tracker.toggle("Physics", 1, TaskType::Reading).await.unwrap();
    tracker.toggle("Physics", 1, TaskType::Review).await.unwrap();

    for offset in 1..40 {
        let reference = date(4, 22) + Duration::days(offset);
        let result = tracker.recompute(reference, reference);
        assert!(result.overdue.contains(&target), "not overdue on {}", reference);
    }

    tracker.toggle("Physics", 1, TaskType::PastPapers).await.unwrap();
    let result = tracker.recompute(date(5, 1), date(5, 1));
    assert!(!result.overdue.contains(&target));
}

#[tokio::test]
async fn percent_stays_in_bounds() {
    let dir = tempfile::tempdir().unwrap();
    let mut tracker = open_tracker(dir.path()).await;
    let keys: Vec<ChapterKey> = tracker.config().chapter_keys().collect();

    for (i, key) in keys.iter().enumerate() {
        for (t, task) in TaskType::ALL.into_iter().enumerate() {
            if (i + t) % 2 == 0 {
                tracker.toggle(&key.subject, key.chapter, task).await.unwrap();
            }
            let percent = tracker.recompute(date(5, 1), date(5, 1)).percent;
            assert!((0.0..=100.0).contains(&percent));
        }
    }
}

#[tokio::test]
async fn progress_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut tracker = open_tracker(dir.path()).await;
        tracker.toggle("Thermodynamics", 3, TaskType::PastPapers).await.unwrap();
    }

    let tracker = open_tracker(dir.path()).await;
    let state = tracker.progress().get(&ChapterKey::new("Thermodynamics", 3)).unwrap();
    assert!(state.past_papers);
    assert_eq!(state.completed_at, Some(first_day_clock().now()));
}

#[tokio::test]
async fn malformed_blob_starts_blank() {
    let dir = tempfile::tempdir().unwrap();
    tokio::fs::write(dir.path().join("progress.json"), b"[1, 2, 3]").await.unwrap();

    let tracker = open_tracker(dir.path()).await;
    assert_eq!(tracker.progress(), &ProgressMap::blank(&ScheduleConfig::builtin()));
}

#[tokio::test]
async fn browser_blob_is_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let blob = r#"{
        "Mathematics": {
            "1": {
                "reading": true, "past": true, "review": true,
                "date": "2025-04-22T13:05:11.250Z"
            },
            "2": {
                "reading": true, "past": false, "review": false,
                "date": "2025-04-24T08:00:00.000Z"
            }
        }
    }"#;
    tokio::fs::write(dir.path().join("progress.json"), blob).await.unwrap();

    let tracker = open_tracker(dir.path()).await;
    assert_eq!(tracker.progress().len(), 100);

    let result = tracker.recompute(date(4, 24), date(4, 24));
    assert_eq!(result.completed_units, 4);
    // 4 units over two study days: 296 remaining at 2/day.
    assert_eq!(result.projection.end_date(), Some(date(4, 24) + Duration::days(148)));
}

#[tokio::test]
async fn reset_persists_blank_map() {
    let dir = tempfile::tempdir().unwrap();
    let mut tracker = open_tracker(dir.path()).await;
    tracker.toggle("Mathematics", 1, TaskType::Reading).await.unwrap();
    tracker.reset().await;

    let storage = tracker.into_storage();
    let saved = storage.load_progress().await.unwrap().unwrap();
    assert_eq!(saved, ProgressMap::blank(&ScheduleConfig::builtin()));
}
