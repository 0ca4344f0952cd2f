//! StudyTrack CLI - study schedule and progress tracker.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use studytrack_core::{ChapterState, Clock, ScheduleConfig, TaskType};
use studytrack_progress::{EvaluationResult, Projection, StudyTracker};
use studytrack_storage::JsonStorage;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "studytrack")]
#[command(about = "Study schedule and progress tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Storage path for progress data
    #[arg(short, long, default_value = ".studytrack", global = true)]
    storage: PathBuf,

    /// JSON schedule file (defaults to the built-in curriculum)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Treat this date (YYYY-MM-DD) as today
    #[arg(long, global = true)]
    today: Option<NaiveDate>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show overall progress, projection and unfinished work
    Status {
        /// Date to list due chapters for (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Print the evaluation as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the chapters scheduled on a date
    Today {
        /// Date to show (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Show the whole schedule day by day
    Plan,
    /// Show completed units per schedule day
    Series,
    /// Check or uncheck one task of a chapter
    Toggle {
        /// Subject name
        subject: String,
        /// Chapter number
        chapter: u32,
        /// Task: reading, past-papers or review
        task: TaskType,
    },
    /// Clear all progress
    Reset,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<ScheduleConfig> {
    let Some(path) = path else {
        return Ok(ScheduleConfig::builtin());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read schedule file {}", path.display()))?;
    let config = ScheduleConfig::from_json(&json)
        .with_context(|| format!("Invalid schedule file {}", path.display()))?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    debug!(
        "Schedule {} to {}, {} chapters, {} per day",
        config.start_date(),
        config.original_end_date(),
        config.total_chapters(),
        config.chapters_per_day()
    );

    let storage = JsonStorage::new(&cli.storage).await?;
    let now = Local::now();
    let mut tracker = StudyTracker::open(config, storage, Clock::default())
        .await
        .with_utc_offset(*now.offset());
    let today = cli.today.unwrap_or_else(|| now.date_naive());

    match cli.command {
        Commands::Status { date, json } => {
            let selected = date.unwrap_or(today);
            let result = tracker.recompute(selected, today);
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_status(tracker.config(), selected, &result);
            }
        }
        Commands::Today { date } => {
            let selected = date.unwrap_or(today);
            let day = studytrack_core::days_between(tracker.config().start_date(), selected);
            let chapters: Vec<_> = tracker.schedule().chapters_on(day).collect();

            println!("{}", selected.format("%a %b %d %Y"));
            if chapters.is_empty() {
                println!("  Nothing scheduled");
            }
            for key in chapters {
                let state = tracker.progress().get(key).cloned().unwrap_or_default();
                println!("  {:<24} {}", key.label(), format_tasks(&state));
            }
        }
        Commands::Plan => {
            let schedule = tracker.schedule();
            for day in 0..=schedule.last_day().unwrap_or(0) {
                let labels: Vec<_> = schedule.chapters_on(day as i64).map(|k| k.label()).collect();
                println!("Day {:>3}  {}  {}", day + 1, schedule.date_of(day), labels.join(", "));
            }
        }
        Commands::Series => {
            let result = tracker.recompute(today, today);
            for point in &result.daily_completed_series {
                println!("{}  {:>3}", point.date, point.count);
            }
        }
        Commands::Toggle { subject, chapter, task } => {
            let done = tracker.toggle(&subject, chapter, task).await?;
            println!(
                "{} {} {}: {}",
                subject,
                chapter,
                task,
                if done { "done" } else { "not done" }
            );
        }
        Commands::Reset => {
            tracker.reset().await;
            println!("Progress cleared");
        }
    }

    Ok(())
}

fn print_status(config: &ScheduleConfig, selected: NaiveDate, result: &EvaluationResult) {
    let projected = match result.projection {
        Projection::Unavailable => "not enough data yet".to_string(),
        other => other
            .end_date()
            .map(|d| d.format("%a %b %d %Y").to_string())
            .unwrap_or_default(),
    };

    println!("{} (projected completion: {})", selected.format("%a %b %d %Y"), projected);
    println!(
        "Overall progress: {:.1}% ({}/{} tasks)",
        result.percent, result.completed_units, result.total_units
    );
    if let Some(slip) = result.projection.slip_days(config.original_end_date()) {
        if slip > 0 {
            println!("  {} days behind the planned end {}", slip, config.original_end_date());
        }
    }
    if !result.today_incomplete.is_empty() {
        println!("Unfinished for the day: {}", result.today_labels().join(", "));
    }
    if !result.overdue.is_empty() {
        println!("Overdue: {}", result.overdue_labels().join(", "));
    }
}

fn format_tasks(state: &ChapterState) -> String {
    TaskType::ALL
        .iter()
        .map(|task| format!("[{}] {}", if state.is_done(*task) { "x" } else { " " }, task))
        .collect::<Vec<_>>()
        .join("  ")
}
