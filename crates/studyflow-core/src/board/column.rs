use serde::{Deserialize, Serialize};

use super::task::ColumnId;

/// A named bucket on the board. Supplied by configuration, never by users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub title: String,
}

impl Column {
    pub fn new(id: impl Into<ColumnId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

/// Todo / In Progress / Done.
pub fn default_columns() -> Vec<Column> {
    vec![
        Column::new(ColumnId::TODO, "Todo"),
        Column::new(ColumnId::IN_PROGRESS, "In Progress"),
        Column::new(ColumnId::DONE, "Done"),
    ]
}
