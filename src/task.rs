//! Task data model for tasktalk.
//!
//! All application data lives in one JSON document ([`AppState`]): the todo
//! list and the chat transcript. Tasks are never deleted, only toggled.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::error::{Error, Result};

/// A single todo item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub id: u64,
    pub title: String,
    pub completed: bool,
}

impl Task {
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            completed: false,
        }
    }

    pub fn status(&self) -> TaskStatus {
        if self.completed {
            TaskStatus::Complete
        } else {
            TaskStatus::Open
        }
    }

    /// Case-insensitive title comparison used for dedup and exact matching.
    pub fn title_matches(&self, title: &str) -> bool {
        self.title.to_lowercase() == title.to_lowercase()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Open,
    Complete,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Open => write!(f, "open"),
            TaskStatus::Complete => write!(f, "complete"),
        }
    }
}

/// Machine-facing view of a task, as returned by `list`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskSummary {
    pub task: String,
    pub status: TaskStatus,
}

impl From<&Task> for TaskSummary {
    fn from(task: &Task) -> Self {
        Self {
            task: task.title.clone(),
            status: task.status(),
        }
    }
}

/// Reference to a task, either by id or by (possibly partial) title.
///
/// On the wire this is `number | string`. Numbers that are not a whole,
/// non-negative id (`-1`, `2.5`) are kept as [`TaskRef::ByNumber`] and simply
/// match no task; `2.0` still matches id 2.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskRef {
    ById(u64),
    ByTitle(String),
    ByNumber(Number),
}

impl TaskRef {
    /// Whether this reference names `task` by id.
    pub fn matches_id(&self, task: &Task) -> bool {
        match self {
            TaskRef::ById(id) => task.id == *id,
            TaskRef::ByNumber(number) => number.as_f64() == Some(task.id as f64),
            TaskRef::ByTitle(_) => false,
        }
    }
}

impl FromStr for TaskRef {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidArgument(
                "task reference cannot be empty".to_string(),
            ));
        }
        if trimmed.chars().all(|ch| ch.is_ascii_digit()) {
            if let Ok(id) = trimmed.parse::<u64>() {
                return Ok(TaskRef::ById(id));
            }
        }
        Ok(TaskRef::ByTitle(trimmed.to_string()))
    }
}

impl fmt::Display for TaskRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskRef::ById(id) => write!(f, "#{id}"),
            TaskRef::ByNumber(number) => write!(f, "#{number}"),
            TaskRef::ByTitle(title) => write!(f, "{title}"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// A transcript entry written by tasktalk.
///
/// The stored transcript is kept as raw JSON so entries written by other
/// tools (other roles, extra fields) survive untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub at: Option<DateTime<Utc>>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            at: Some(Utc::now()),
        }
    }

    /// Raw transcript form.
    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// The whole persisted document.
///
/// Only `todos` is interpreted. The transcript and any other top-level keys
/// are carried through verbatim.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(from = "StoredState")]
pub struct AppState {
    pub todos: Vec<Task>,
    pub conversation: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// On-disk shape, before the legacy `convo` key is folded in.
#[derive(Deserialize)]
struct StoredState {
    #[serde(default)]
    todos: Vec<Task>,
    #[serde(default)]
    conversation: Option<Vec<Value>>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<StoredState> for AppState {
    fn from(stored: StoredState) -> Self {
        let mut extra = stored.extra;
        // `convo` only stands in for a missing `conversation`; otherwise it stays as-is.
        let conversation = match stored.conversation {
            Some(conversation) => conversation,
            None => match extra.remove("convo") {
                Some(Value::Array(entries)) => entries,
                Some(other) => {
                    extra.insert("convo".to_string(), other);
                    Vec::new()
                }
                None => Vec::new(),
            },
        };
        Self {
            todos: stored.todos,
            conversation,
            extra,
        }
    }
}

impl AppState {
    /// Next id to assign: one past the largest id ever stored.
    pub fn next_id(&self) -> u64 {
        self.todos.iter().map(|task| task.id).max().unwrap_or(0) + 1
    }
}
