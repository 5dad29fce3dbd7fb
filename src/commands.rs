use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use thiserror::Error;
use tracing::warn;

use crate::clock::{self, ClockTime};
use crate::grouping::{group_with, older_completed, Bucket, UndatedPolicy, View};
use crate::models::Task;
use crate::storage::{NewTask, StorageError, TaskStore};

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Task name cannot be empty")]
    EmptyName,

    #[error("Invalid due date '{0}'. Use YYYY-MM-DD.")]
    InvalidDate(String),

    #[error("Due date {0} is in the past. Please pick today or a later date.")]
    DueDateInPast(NaiveDate),

    #[error("A time of day needs a due date")]
    TimeWithoutDate,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Raw user input for a new task, before validation.
#[derive(Debug, Clone, Default)]
pub struct AddInput {
    pub name: String,
    pub description: Option<String>,
    /// Due date in YYYY-MM-DD.
    pub due: Option<String>,
    /// Time of day, `HH:MM` or `h:MM AM`.
    pub time: Option<String>,
}

/// Validates `input` against `today` and turns it into a [`NewTask`].
///
/// A time that cannot be read counts as no time at all.
pub fn validate_add(input: AddInput, today: NaiveDate) -> Result<NewTask, CommandError> {
    let name = input.name.trim().to_string();
    if name.is_empty() {
        return Err(CommandError::EmptyName);
    }
    let description = input
        .description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());

    let due = input.due.as_deref().map(str::trim).filter(|d| !d.is_empty());
    let time = match input.time.as_deref() {
        Some(raw) => match clock::parse_user_time(raw) {
            Ok(t) => t,
            Err(e) => {
                warn!(error = %e, "ignoring unreadable time of day");
                None
            }
        },
        None => None,
    };

    let Some(due) = due else {
        if time.is_some() {
            return Err(CommandError::TimeWithoutDate);
        }
        return Ok(NewTask { name, description, due_date: None, has_time: false });
    };

    let date = NaiveDate::parse_from_str(due, "%Y-%m-%d")
        .map_err(|_| CommandError::InvalidDate(due.to_string()))?;
    if date < today {
        return Err(CommandError::DueDateInPast(date));
    }
    let (clock_time, has_time) = match time {
        Some(t) => (t.to_naive_time(), true),
        None => (NaiveTime::MIN, false),
    };

    Ok(NewTask {
        name,
        description,
        due_date: Some(NaiveDateTime::new(date, clock_time)),
        has_time,
    })
}

/// Adds a new task to the store and persists it.
pub fn cmd_add<Tz: TimeZone>(
    store: &mut TaskStore,
    input: AddInput,
    now: &DateTime<Tz>,
    silent: bool,
) -> Result<Task, CommandError> {
    let new = validate_add(input, now.date_naive())?;
    let task = store.create(new, now.with_timezone(&Utc));
    store.save()?;
    if !silent {
        println!("Task added (id = {})", task.id);
    }
    Ok(task)
}

/// Marks a task as complete by ID.
pub fn cmd_complete<Tz: TimeZone>(store: &mut TaskStore, id: u64, now: &DateTime<Tz>, silent: bool) -> Result<(), CommandError> {
    store.set_completed(id, true, now.with_timezone(&Utc))?;
    store.save()?;
    if !silent {
        println!("Task {} marked as complete.", id);
    }
    Ok(())
}

/// Moves a completed task back to pending.
pub fn cmd_reopen(store: &mut TaskStore, id: u64, silent: bool) -> Result<(), CommandError> {
    store.set_completed(id, false, Utc::now())?;
    store.save()?;
    if !silent {
        println!("Task {} moved back to pending.", id);
    }
    Ok(())
}

/// Flips a task between pending and completed, returning the new status.
pub fn cmd_toggle<Tz: TimeZone>(store: &mut TaskStore, id: u64, now: &DateTime<Tz>) -> Result<bool, CommandError> {
    let completed = store.toggle(id, now.with_timezone(&Utc))?;
    store.save()?;
    Ok(completed)
}

/// Removes a task from the store by ID.
pub fn cmd_remove(store: &mut TaskStore, id: u64, silent: bool) -> Result<Task, CommandError> {
    let task = store.delete(id)?;
    store.save()?;
    if !silent {
        println!("Task {} removed.", id);
    }
    Ok(task)
}

/// Prints pending tasks grouped by due day.
pub fn cmd_list<Tz: TimeZone>(store: &TaskStore, now: &DateTime<Tz>, undated: UndatedPolicy) {
    let buckets = group_with(store.list(), View::Pending, now, undated);
    if buckets.is_empty() {
        println!("No pending tasks.");
        return;
    }
    print_buckets(&buckets, View::Pending);
}

/// Prints completed tasks grouped by completion day.
///
/// Without `all`, only tasks finished before yesterday are shown.
pub fn cmd_history<Tz: TimeZone>(store: &TaskStore, now: &DateTime<Tz>, all: bool) {
    let buckets = if all {
        group_with(store.list(), View::Completed, now, UndatedPolicy::default())
    } else {
        let older = older_completed(store.list(), now);
        group_with(&older, View::Completed, now, UndatedPolicy::default())
    };
    if buckets.is_empty() {
        if all {
            println!("No completed tasks found.");
        } else {
            println!("No older completed tasks found.");
        }
        return;
    }
    print_buckets(&buckets, View::Completed);
}

fn print_buckets(buckets: &[Bucket], view: View) {
    for bucket in buckets {
        println!("{} ({})", bucket.title, bucket.tasks.len());
        println!("{}", bucket_table(bucket, view));
    }
}

/// Builds the table for one group of tasks.
pub fn bucket_table(bucket: &Bucket, view: View) -> Table {
    let mut table = Table::new();
    let when_header = match view {
        View::Pending => "Due",
        View::Completed => "Completed",
    };
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").add_attribute(Attribute::Bold),
            Cell::new("Name").add_attribute(Attribute::Bold),
            Cell::new(when_header).add_attribute(Attribute::Bold),
            Cell::new("Description").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
        ]);

    for entry in &bucket.tasks {
        let t = &entry.task;
        let when = match view {
            View::Pending => due_text(t),
            View::Completed => t
                .completed_at
                .map(|at| at.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
        };
        let (status, status_color) = if t.is_completed {
            ("Done", Color::Green)
        } else if entry.is_overdue {
            ("Not completed on time", Color::Red)
        } else {
            ("Pending", Color::Yellow)
        };

        table.add_row(vec![
            Cell::new(t.id),
            Cell::new(&t.name),
            Cell::new(when).fg(if entry.is_overdue && !t.is_completed { Color::Red } else { Color::Reset }),
            Cell::new(t.description.clone().unwrap_or_default()),
            Cell::new(status).fg(status_color),
        ]);
    }
    table
}

/// Due text with the time in 12-hour form, e.g. `2024-01-10 3:05 PM`.
pub fn due_text(task: &Task) -> String {
    match task.due_date {
        Some(d) if task.has_time => {
            format!("{} {}", d.format("%Y-%m-%d"), ClockTime::from_naive_time(d.time()))
        }
        Some(d) => d.format("%Y-%m-%d").to_string(),
        None => String::new(),
    }
}
