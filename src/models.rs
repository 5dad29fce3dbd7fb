use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Represents a single task in the tracker.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier for the task.
    pub id: u64,
    /// Short name of the task, never empty.
    pub name: String,
    /// Optional free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Due date and time of day (`YYYY-MM-DDTHH:MM`).
    #[serde(default, with = "due_format", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDateTime>,
    /// Whether the time part of `due_date` was chosen by the user.
    #[serde(default)]
    pub has_time: bool,
    /// Whether the task has been completed.
    #[serde(default)]
    pub is_completed: bool,
    /// Instant the task was completed; present iff `is_completed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    /// Instant the task was created.
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Calendar day the task is due on, if it has a due date.
    pub fn due_day(&self) -> Option<NaiveDate> {
        self.due_date.map(|d| d.date())
    }

    /// Marks the task as completed at `at`.
    pub fn mark_completed(&mut self, at: DateTime<Utc>) {
        self.is_completed = true;
        self.completed_at = Some(at);
    }

    /// Moves the task back to pending, forgetting when it was completed.
    pub fn mark_pending(&mut self) {
        self.is_completed = false;
        self.completed_at = None;
    }
}

/// A task decorated with values derived for one grouping pass.
///
/// Never persisted; the store keeps the canonical [`Task`].
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedTask {
    pub task: Task,
    pub is_overdue: bool,
}

/// Serde adapter for the `YYYY-MM-DDTHH:MM` due-date form.
pub mod due_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%dT%H:%M";

    pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_str(&dt.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => NaiveDateTime::parse_from_str(s, FORMAT)
                // older snapshots carried seconds
                .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}
