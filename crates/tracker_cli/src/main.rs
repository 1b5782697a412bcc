//! `tracker` command-line entry point.
//!
//! # Responsibility
//! - Load TOML config, start logging and open the configured store.
//! - Render day views, search results and statistics as plain text.

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use log::debug;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use tracker_core::db::{open_db, open_db_in_memory};
use tracker_core::model::tracker::schedule_from_tags;
use tracker_core::{
    init_logging, load_config, NewTracker, RepoError, Schedule, ServiceError, SqliteRecordStore,
    SqliteTrackerStore, TrackerConfig, TrackerFilter, TrackerId, TrackerKind, TrackerService,
    TrackerSnapshot, TrackerUpdate,
};

type CliResult<T> = Result<T, Box<dyn Error>>;

#[derive(Parser)]
#[command(name = "tracker", about = "Habit and event tracker", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// SQLite file, overrides `storage.db_path`
    #[arg(long, global = true)]
    db: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Show trackers due on a day
    Day(DayArgs),
    /// Search trackers by name
    Search { term: String },
    /// Mark a tracker completed
    Complete(CompleteArgs),
    /// Pin or unpin a tracker
    Pin { id: TrackerId },
    /// Create a category
    Category { title: String },
    /// Create a tracker
    Add(AddArgs),
    /// Change a tracker's name, color or emoji
    Edit(EditArgs),
    /// Delete a tracker and its completion history
    Delete { id: TrackerId },
    /// Show completion statistics
    Stats,
}

#[derive(Args)]
struct DayArgs {
    /// Day to show (YYYY-MM-DD), today when omitted
    #[arg(long)]
    date: Option<NaiveDate>,

    /// all | today | completed | uncompleted
    #[arg(long, default_value = "all", value_parser = parse_filter)]
    filter: TrackerFilter,
}

#[derive(Args)]
struct CompleteArgs {
    id: TrackerId,

    /// Completion day (YYYY-MM-DD), today when omitted
    #[arg(long)]
    date: Option<NaiveDate>,
}

#[derive(Args)]
struct AddArgs {
    name: String,

    /// Existing category title
    #[arg(long)]
    category: String,

    /// Due weekdays (`mon,wed,fri`); omit for a one-off event
    #[arg(long, value_parser = parse_schedule, default_value = "")]
    days: Schedule,

    #[arg(long, default_value = "#4A90D9")]
    color: String,

    #[arg(long, default_value = "⭐")]
    emoji: String,
}

#[derive(Args)]
struct EditArgs {
    id: TrackerId,

    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    color: Option<String>,

    #[arg(long)]
    emoji: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CliResult<()> {
    let config = match cli.config.as_ref() {
        Some(path) => load_config(path)?,
        None => TrackerConfig::default(),
    };
    if let Some(dir) = config.logging.dir.as_ref() {
        init_logging(config.logging.effective_level(), dir)?;
    }

    let conn = match cli.db.as_ref().or(config.storage.db_path.as_ref()) {
        Some(path) => open_db(path)?,
        None => open_db_in_memory()?,
    };
    let service = TrackerService::with_labels(
        SqliteTrackerStore::try_new(&conn)?,
        SqliteRecordStore::try_new(&conn)?,
        config.labels.clone(),
    )
    .with_collator(config.sorting.collator()?);
    let today = Local::now().date_naive();

    match cli.command {
        Command::Day(args) => {
            let date = args.date.unwrap_or(today);
            debug!(
                "event=cli_day module=cli status=start filter={}",
                args.filter
            );
            let snapshot = service.fetch_trackers(date, args.filter)?;
            println!("{date} ({})", args.filter);
            print_snapshot(&snapshot, true);
        }
        Command::Search { term } => {
            let snapshot = service.search(&term)?;
            print_snapshot(&snapshot, false);
        }
        Command::Complete(args) => {
            let date = args.date.unwrap_or(today);
            if service.complete_tracker_as_of(args.id, date, today)? {
                println!("completed {} on {date}", args.id);
            } else {
                println!("{} was already completed on {date}", args.id);
            }
        }
        Command::Pin { id } => {
            let pinned = service.toggle_pin(id)?;
            println!("{id} {}", if pinned { "pinned" } else { "unpinned" });
        }
        Command::Category { title } => {
            if !service.add_category(&title)? {
                println!("category `{title}` already exists");
            }
        }
        Command::Add(args) => {
            let kind = if args.days.is_empty() {
                TrackerKind::Event
            } else {
                TrackerKind::Habit
            };
            let tracker = service.add_tracker(&NewTracker {
                name: args.name,
                color: args.color,
                emoji: args.emoji,
                schedule: args.days,
                kind,
                category_title: args.category,
            })?;
            println!("{}", tracker.id);
        }
        Command::Edit(args) => {
            let current = service
                .list_trackers()?
                .into_iter()
                .find(|tracker| tracker.id == args.id)
                .ok_or(ServiceError::Repo(RepoError::TrackerNotFound(args.id)))?;
            service.update_tracker(
                args.id,
                &TrackerUpdate {
                    name: args.name.unwrap_or(current.name),
                    color: args.color.unwrap_or(current.color),
                    emoji: args.emoji.unwrap_or(current.emoji),
                },
            )?;
            println!("updated {}", args.id);
        }
        Command::Delete { id } => {
            service.delete_tracker(id)?;
            println!("deleted {id}");
        }
        Command::Stats => {
            println!("completed total: {}", service.total_completed()?);
            for tracker in service.list_trackers()? {
                println!(
                    "{} {:<24} {}",
                    tracker.emoji,
                    tracker.name,
                    service.completion_count(tracker.id)?
                );
            }
        }
    }
    Ok(())
}

fn print_snapshot(snapshot: &TrackerSnapshot, with_state: bool) {
    if snapshot.is_empty() {
        println!("  (nothing to show)");
        return;
    }
    for category in &snapshot.categories {
        println!("{}", category.title);
        for tracker in &category.trackers {
            if with_state {
                let done = snapshot.is_completed(tracker.id);
                let mark = if done { "x" } else { " " };
                println!(
                    "  [{mark}] {} {}  ({} days)  {}",
                    tracker.emoji,
                    tracker.name,
                    snapshot.completion_count(tracker.id),
                    tracker.id
                );
            } else {
                println!("  {} {}  {}", tracker.emoji, tracker.name, tracker.id);
            }
        }
    }
}

fn parse_filter(value: &str) -> Result<TrackerFilter, String> {
    TrackerFilter::parse(value).ok_or_else(|| format!("unknown filter `{value}`"))
}

fn parse_schedule(value: &str) -> Result<Schedule, String> {
    schedule_from_tags(value).ok_or_else(|| format!("invalid weekday list `{value}`"))
}

#[cfg(test)]
mod tests {
    use super::{run, Cli};
    use clap::{CommandFactory, Parser};
    use std::path::Path;
    use tracker_core::db::open_db;
    use tracker_core::{SqliteTrackerStore, Tracker, TrackerStore};

    fn tracker_cli(db: &Path, args: &[&str]) {
        let mut argv = vec!["tracker", "--db", db.to_str().unwrap()];
        argv.extend_from_slice(args);
        run(Cli::try_parse_from(argv).unwrap()).unwrap();
    }

    fn stored(db: &Path) -> Vec<Tracker> {
        let conn = open_db(db).unwrap();
        let store = SqliteTrackerStore::try_new(&conn).unwrap();
        store.fetch_all_trackers().unwrap()
    }

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn edit_keeps_unset_fields_and_delete_removes_tracker() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("tracker.sqlite3");
        tracker_cli(&db, &["category", "Health"]);
        let add = ["add", "Run", "--category", "Health", "--days", "mon,thu"];
        tracker_cli(&db, &add);
        let id = stored(&db)[0].id.to_string();

        tracker_cli(&db, &["edit", &id, "--name", "Long run", "--emoji", "🏃"]);
        let edited = stored(&db).remove(0);
        assert_eq!(edited.name, "Long run");
        assert_eq!(edited.emoji, "🏃");
        assert_eq!(edited.color, "#4A90D9");

        tracker_cli(&db, &["delete", &id]);
        assert!(stored(&db).is_empty());
    }

    #[test]
    fn editing_unknown_tracker_fails() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("tracker.sqlite3");
        let db = db.to_str().unwrap();
        let missing = "67e55044-10b1-426f-9247-bb680e5fe0c8";
        let cli = Cli::try_parse_from(["tracker", "--db", db, "edit", missing]).unwrap();

        let err = run(cli).unwrap_err();
        assert!(err.to_string().contains(missing));
    }
}
