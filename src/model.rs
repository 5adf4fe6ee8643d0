use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::error::{Result, TrackerError};

pub const DEFAULT_CATEGORY: &str = "general";
pub const DEFAULT_PRIORITY: &str = "medium";

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

fn default_priority() -> String {
    DEFAULT_PRIORITY.to_string()
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn null_as_default_category<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(|c| c.unwrap_or_else(default_category))
}

fn null_as_default_priority<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(|p| p.unwrap_or_else(default_priority))
}

/// Stored fields tolerate explicit `null`, which older documents contain.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(
        default = "default_category",
        deserialize_with = "null_as_default_category"
    )]
    pub category: String,
    #[serde(
        default = "default_priority",
        deserialize_with = "null_as_default_priority"
    )]
    pub priority: String,
    /// Version-1 documents stored this flag as `done`.
    #[serde(default, alias = "done", deserialize_with = "null_as_default")]
    pub completed: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default, with = "timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, with = "timestamp")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Build a fresh task from a create request. Fails if the title is missing or blank.
    pub fn from_new(id: u64, new: NewTask, now: DateTime<Utc>) -> Result<Self> {
        let title = validated_title(new.title)?;
        Ok(Self {
            id,
            title,
            description: new.description.unwrap_or_default(),
            category: new.category.unwrap_or_else(default_category),
            priority: new.priority.unwrap_or_else(default_priority),
            completed: false,
            tags: new.tags.unwrap_or_default(),
            due_date: new.due_date,
            created_at: Some(now),
            updated_at: None,
            completed_at: None,
        })
    }

    /// Set the completion flag and keep `completed_at` in step with it.
    pub fn set_completed(&mut self, completed: bool, now: DateTime<Utc>) {
        self.completed = completed;
        self.completed_at = completed.then_some(now);
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = Some(now);
    }

    /// Apply a partial update. Only fields present in the patch change.
    pub fn apply(&mut self, patch: TaskPatch, now: DateTime<Utc>) -> Result<()> {
        if let Some(title) = patch.title {
            self.title = validated_title(Some(title))?;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        if let Some(completed) = patch.completed {
            self.set_completed(completed, now);
        }
        self.touch(now);
        Ok(())
    }
}

fn validated_title(title: Option<String>) -> Result<String> {
    match title {
        Some(t) if !t.trim().is_empty() => Ok(t),
        _ => Err(TrackerError::TitleRequired),
    }
}

/// Body of a create request. Everything but the title is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl NewTask {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }
}

/// Body of an update request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub priority: Option<String>,
    /// Absent leaves the due date alone; explicit `null` clears it.
    #[serde(default, deserialize_with = "present")]
    pub due_date: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
    pub completed: Option<bool>,
}

fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    Completed,
    Pending,
}

impl FromStr for StatusFilter {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "completed" => Ok(Self::Completed),
            "pending" => Ok(Self::Pending),
            other => Err(TrackerError::InvalidFilter(format!(
                "status must be 'completed' or 'pending', got '{other}'"
            ))),
        }
    }
}

impl std::fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
            Self::Pending => write!(f, "pending"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub status: Option<StatusFilter>,
    pub category: Option<String>,
}

impl TaskFilter {
    /// Parse raw query values. Empty strings and unrecognized statuses
    /// (`all`, say) mean "no filter".
    pub fn parse(status: Option<&str>, category: Option<&str>) -> Result<Self> {
        let status = match status.filter(|s| !s.is_empty()) {
            Some(raw) => match raw.parse::<StatusFilter>() {
                Ok(status) => Some(status),
                Err(_) => {
                    debug!(status = raw, "ignoring unknown status filter");
                    None
                }
            },
            None => None,
        };
        let category = category.filter(|c| !c.is_empty()).map(str::to_string);
        Ok(Self { status, category })
    }

    pub fn matches(&self, task: &Task) -> bool {
        let status_ok = match self.status {
            Some(StatusFilter::Completed) => task.completed,
            Some(StatusFilter::Pending) => !task.completed,
            None => true,
        };
        let category_ok = self
            .category
            .as_deref()
            .is_none_or(|c| task.category == c);
        status_ok && category_ok
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    #[serde(alias = "total_tasks")]
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub completion_rate: f64,
}

impl Stats {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|t| t.completed).count();
        let completion_rate = if total == 0 {
            0.0
        } else {
            completed as f64 / total as f64 * 100.0
        };
        Self {
            total,
            completed,
            pending: total - completed,
            completion_rate,
        }
    }
}

/// Serde adapter for optional timestamps. Writes RFC 3339 UTC; also reads the
/// offset-less ISO-8601 form older documents contain, taking it as UTC.
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn parse(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .or_else(|_| {
                NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|n| n.and_utc())
            })
    }

    pub fn format(ts: &DateTime<Utc>) -> String {
        ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(ts) => serializer.serialize_some(&format(ts)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| parse(&raw).map_err(serde::de::Error::custom))
            .transpose()
    }
}
