use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Identifier of a board column (`todo`, `in-progress`, `done`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnId(String);

impl ColumnId {
    pub const TODO: &'static str = "todo";
    pub const IN_PROGRESS: &'static str = "in-progress";
    pub const DONE: &'static str = "done";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn todo() -> Self {
        Self::new(Self::TODO)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ColumnId {
    fn default() -> Self {
        Self::todo()
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ColumnId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ColumnId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl PartialEq<str> for ColumnId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ColumnId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Task difficulty. Determines the points a task is worth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    Easy,
    Moderate,
    Hard,
}

impl Priority {
    pub fn points(self) -> u32 {
        match self {
            Priority::Hard => 50,
            Priority::Moderate => 30,
            Priority::Easy => 15,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Easy => write!(f, "Easy"),
            Priority::Moderate => write!(f, "Moderate"),
            Priority::Hard => write!(f, "Hard"),
        }
    }
}

impl FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Priority::Easy),
            "moderate" => Ok(Priority::Moderate),
            "hard" => Ok(Priority::Hard),
            other => Err(ValidationError::InvalidValue {
                field: "priority".into(),
                message: format!("expected easy, moderate or hard, got '{other}'"),
            }),
        }
    }
}

/// A card on the board.
///
/// `points` is fixed when the task is created; changing nothing else about
/// the task ever recomputes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KanbanTask {
    pub id: String,
    pub content: String,
    pub column_id: ColumnId,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub points: u32,
}

impl KanbanTask {
    /// Build a task. A caller-supplied `id` wins over a generated one.
    pub fn new(
        content: impl Into<String>,
        priority: Option<Priority>,
        column_id: ColumnId,
        id: Option<String>,
    ) -> Self {
        KanbanTask {
            id: id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            content: content.into(),
            column_id,
            priority,
            points: priority.map(Priority::points).unwrap_or(0),
        }
    }
}
