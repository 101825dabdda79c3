//! Collaborator seams for persisting engine results.
//!
//! Engines apply changes to in-memory state first. Mirroring the result
//! through these traits happens afterwards and failures are only logged.

use crate::board::KanbanTask;
use crate::error::Result;
use crate::focus::CompletedFocusRecord;

/// Per-user durable storage for the task collection.
pub trait TaskStore {
    /// `Ok(None)` when nothing has been saved under `key` yet.
    fn load_tasks(&self, key: &str) -> Result<Option<Vec<KanbanTask>>>;

    fn save_tasks(&self, key: &str, tasks: &[KanbanTask]) -> Result<()>;
}

/// Receives completed focus runs.
pub trait FocusHistory {
    fn record(&self, record: &CompletedFocusRecord) -> Result<()>;
}

impl<T: TaskStore + ?Sized> TaskStore for &T {
    fn load_tasks(&self, key: &str) -> Result<Option<Vec<KanbanTask>>> {
        (**self).load_tasks(key)
    }

    fn save_tasks(&self, key: &str, tasks: &[KanbanTask]) -> Result<()> {
        (**self).save_tasks(key, tasks)
    }
}

impl<T: FocusHistory + ?Sized> FocusHistory for &T {
    fn record(&self, record: &CompletedFocusRecord) -> Result<()> {
        (**self).record(record)
    }
}

/// Storage key for a user's board.
pub fn board_key(user: &str) -> String {
    format!("board:{user}")
}
