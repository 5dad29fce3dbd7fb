use std::cmp::{Ordering, Reverse};
use std::collections::HashMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::{AnnotatedTask, Task};

pub const TODAY: &str = "Today";
pub const TOMORROW: &str = "Tomorrow";
pub const NO_DATE: &str = "No Date";
pub const COMPLETED_TODAY: &str = "Today's completed";
pub const COMPLETED_YESTERDAY: &str = "Yesterday's completed";
pub const COMPLETED_PREVIOUS: &str = "Previous days";

/// Which half of the collection a grouping pass looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Pending,
    Completed,
}

/// Where pending tasks without a due date end up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UndatedPolicy {
    /// Their own "No Date" bucket after every dated bucket.
    #[default]
    NoDate,
    /// Merged into the "Today" bucket.
    Today,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BucketKey {
    Due(NaiveDate),
    NoDate,
    CompletedToday,
    CompletedYesterday,
    CompletedPrevious,
}

/// A titled group of tasks, ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub key: BucketKey,
    pub title: String,
    pub tasks: Vec<AnnotatedTask>,
    pub sort_value: i64,
}

/// Where a single task lands in a grouping pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub key: BucketKey,
    pub title: String,
    pub sort_value: i64,
    pub is_overdue: bool,
}

/// The calendar day of "now", captured once per grouping pass.
#[derive(Debug, Clone)]
pub struct ReferenceDay<Tz: TimeZone> {
    zone: Tz,
    today: NaiveDate,
}

impl<Tz: TimeZone> ReferenceDay<Tz> {
    pub fn new(now: &DateTime<Tz>) -> Self {
        ReferenceDay {
            zone: now.timezone(),
            today: now.date_naive(),
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn tomorrow(&self) -> NaiveDate {
        self.today + Duration::days(1)
    }

    pub fn yesterday(&self) -> NaiveDate {
        self.today - Duration::days(1)
    }

    /// Calendar day of an instant in the reference zone.
    pub fn day_of(&self, instant: &DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.zone).date_naive()
    }
}

/// Whether `task` was due on a day before `today`.
///
/// Only the due date matters; completion status does not.
pub fn is_overdue(task: &Task, today: NaiveDate) -> bool {
    task.due_day().is_some_and(|day| day < today)
}

/// Works out the bucket for one task.
///
/// Returns `None` for a completed task missing its completion instant.
pub fn classify<Tz: TimeZone>(
    task: &Task,
    reference: &ReferenceDay<Tz>,
    undated: UndatedPolicy,
) -> Option<Placement> {
    let today = reference.today();
    let is_overdue = is_overdue(task, today);

    if task.is_completed {
        let Some(completed_at) = task.completed_at else {
            warn!(task_id = task.id, "completed task has no completion time; skipping");
            return None;
        };
        let elapsed = (today - reference.day_of(&completed_at)).num_days();
        let (key, title, sort_value) = match elapsed {
            0 => (BucketKey::CompletedToday, COMPLETED_TODAY, 3),
            1 => (BucketKey::CompletedYesterday, COMPLETED_YESTERDAY, 2),
            _ => (BucketKey::CompletedPrevious, COMPLETED_PREVIOUS, 1),
        };
        return Some(Placement { key, title: title.to_string(), sort_value, is_overdue });
    }

    let due_day = match (task.due_day(), undated) {
        (Some(day), _) => day,
        (None, UndatedPolicy::Today) => today,
        (None, UndatedPolicy::NoDate) => {
            return Some(Placement {
                key: BucketKey::NoDate,
                title: NO_DATE.to_string(),
                sort_value: i64::MAX,
                is_overdue: false,
            });
        }
    };

    let title = if due_day == today {
        TODAY.to_string()
    } else if due_day == reference.tomorrow() {
        TOMORROW.to_string()
    } else {
        day_title(due_day)
    };

    Some(Placement {
        key: BucketKey::Due(due_day),
        title,
        sort_value: day_sort_value(due_day),
        is_overdue,
    })
}

/// Short weekday, month and day, e.g. `Mon, Jan 8`.
pub fn day_title(day: NaiveDate) -> String {
    day.format("%a, %b %-d").to_string()
}

fn day_sort_value(day: NaiveDate) -> i64 {
    i64::from(day.num_days_from_ce())
}

/// Orders buckets for display: pending ascending, completed by priority.
pub fn sort_buckets(buckets: &mut [Bucket], view: View) {
    match view {
        View::Pending => buckets.sort_by_key(|b| b.sort_value),
        View::Completed => buckets.sort_by_key(|b| Reverse(b.sort_value)),
    }
}

/// Groups `tasks` for display, with undated pending tasks in "No Date".
pub fn group<Tz: TimeZone>(tasks: &[Task], view: View, now: &DateTime<Tz>) -> Vec<Bucket> {
    group_with(tasks, view, now, UndatedPolicy::default())
}

/// Groups the tasks belonging to `view` into sorted, titled buckets.
///
/// Pure: the result depends only on the arguments.
pub fn group_with<Tz: TimeZone>(
    tasks: &[Task],
    view: View,
    now: &DateTime<Tz>,
    undated: UndatedPolicy,
) -> Vec<Bucket> {
    let reference = ReferenceDay::new(now);
    let want_completed = view == View::Completed;

    let mut selected: Vec<&Task> = tasks
        .iter()
        .filter(|t| t.is_completed == want_completed)
        .collect();

    match view {
        View::Pending => selected.sort_by(|a, b| compare_due(a, b)),
        View::Completed => selected.sort_by_key(|t| Reverse(t.completed_at)),
    }

    let mut buckets: Vec<Bucket> = Vec::new();
    let mut index: HashMap<BucketKey, usize> = HashMap::new();

    for task in selected {
        let Some(placement) = classify(task, &reference, undated) else {
            continue;
        };
        let annotated = AnnotatedTask {
            task: task.clone(),
            is_overdue: placement.is_overdue,
        };
        match index.get(&placement.key) {
            Some(&i) => buckets[i].tasks.push(annotated),
            None => {
                index.insert(placement.key, buckets.len());
                buckets.push(Bucket {
                    key: placement.key,
                    title: placement.title,
                    tasks: vec![annotated],
                    sort_value: placement.sort_value,
                });
            }
        }
    }

    sort_buckets(&mut buckets, view);
    buckets
}

/// Completed tasks finished before yesterday, for the history page.
pub fn older_completed<Tz: TimeZone>(tasks: &[Task], now: &DateTime<Tz>) -> Vec<Task> {
    let reference = ReferenceDay::new(now);
    let yesterday = reference.yesterday();
    tasks
        .iter()
        .filter(|t| t.is_completed)
        .filter(|t| {
            t.completed_at
                .is_some_and(|at| reference.day_of(&at) < yesterday)
        })
        .cloned()
        .collect()
}

// Dated tasks first, by due date and time; undated keep store order.
fn compare_due(a: &Task, b: &Task) -> Ordering {
    match (a.due_date, b.due_date) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
