//! Caller-owned board: the flat task collection plus its column layout.

use serde::Serialize;

use super::column::{default_columns, Column};
use super::drag::{DragEvent, TargetType};
use super::ops;
use super::task::{ColumnId, KanbanTask, Priority};
use crate::persistence::TaskStore;

#[derive(Debug, Clone)]
pub struct TaskBoard {
    columns: Vec<Column>,
    /// Column that "mark complete" moves tasks into.
    done_column: ColumnId,
    tasks: Vec<KanbanTask>,
    /// Set when the stored collection could not be read. Persisting is
    /// refused so unread data is never overwritten.
    load_failed: bool,
}

/// One column with its tasks, for display.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnView<'a> {
    pub id: &'a ColumnId,
    pub title: &'a str,
    pub tasks: Vec<&'a KanbanTask>,
}

impl Default for TaskBoard {
    fn default() -> Self {
        Self::new(default_columns(), ColumnId::new(ColumnId::DONE))
    }
}

impl TaskBoard {
    pub fn new(columns: Vec<Column>, done_column: ColumnId) -> Self {
        Self {
            columns,
            done_column,
            tasks: Vec::new(),
            load_failed: false,
        }
    }

    pub fn with_tasks(mut self, tasks: Vec<KanbanTask>) -> Self {
        self.tasks = tasks;
        self
    }

    /// Load the tasks stored under `key`.
    ///
    /// Missing data means a fresh, empty board. A failing store is logged and
    /// the board starts empty but read-only towards the store: `persist`
    /// becomes a no-op for this instance.
    pub fn load(
        store: &impl TaskStore,
        key: &str,
        columns: Vec<Column>,
        done_column: ColumnId,
    ) -> Self {
        let mut board = Self::new(columns, done_column);
        match store.load_tasks(key) {
            Ok(Some(tasks)) => board = board.with_tasks(tasks),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to load board, starting empty");
                board.load_failed = true;
            }
        }
        tracing::debug!(key, task_count = board.tasks.len(), "board loaded");
        board
    }

    /// Whether the stored collection was unreadable when this board was loaded.
    pub fn load_failed(&self) -> bool {
        self.load_failed
    }

    /// Mirror the current tasks to `store`. Failures are logged, not returned.
    pub fn persist(&self, store: &impl TaskStore, key: &str) {
        if self.load_failed {
            tracing::warn!(key, "stored board was unreadable, not overwriting it");
            return;
        }
        if let Err(e) = store.save_tasks(key, &self.tasks) {
            tracing::warn!(key, error = %e, "failed to save board");
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn tasks(&self) -> &[KanbanTask] {
        &self.tasks
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn done_column(&self) -> &ColumnId {
        &self.done_column
    }

    pub fn find_task_by_id(&self, id: &str) -> Option<&KanbanTask> {
        ops::find_task_by_id(&self.tasks, id)
    }

    pub fn tasks_in_column<'a>(
        &'a self,
        column_id: &'a ColumnId,
    ) -> impl Iterator<Item = &'a KanbanTask> + 'a {
        ops::tasks_in_column(&self.tasks, column_id)
    }

    /// Configured columns in order. Tasks pointing at unknown columns are
    /// not shown anywhere.
    pub fn column_views(&self) -> Vec<ColumnView<'_>> {
        self.columns
            .iter()
            .map(|c| ColumnView {
                id: &c.id,
                title: &c.title,
                tasks: self.tasks_in_column(&c.id).collect(),
            })
            .collect()
    }

    /// Points of everything sitting in the done column.
    pub fn points_earned(&self) -> u32 {
        self.tasks_in_column(&self.done_column).map(|t| t.points).sum()
    }

    fn has_column(&self, id: &str) -> bool {
        self.columns.iter().any(|c| c.id == id)
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn add_task(
        &mut self,
        content: impl Into<String>,
        priority: Option<Priority>,
        column_id: Option<ColumnId>,
        id: Option<String>,
    ) -> &KanbanTask {
        let column_id = column_id.unwrap_or_default();
        let task = ops::add_task(&mut self.tasks, content, priority, column_id, id);
        tracing::debug!(id = %task.id, column = %task.column_id, points = task.points, "task added");
        task
    }

    /// Mirror an externally identified item (a roadmap day) onto the board.
    ///
    /// Returns `None` when a task with `day_id` is already present.
    pub fn add_roadmap_day(
        &mut self,
        day_id: &str,
        content: impl Into<String>,
        priority: Option<Priority>,
    ) -> Option<&KanbanTask> {
        if self.find_task_by_id(day_id).is_some() {
            tracing::debug!(day_id, "roadmap day already on board");
            return None;
        }
        Some(self.add_task(content, priority, None, Some(day_id.to_string())))
    }

    /// Resolve `over_id` against tasks first, then columns, and move.
    pub fn move_task(&mut self, active_id: &str, over_id: &str) -> bool {
        let over_type = if self.find_task_by_id(over_id).is_some() {
            TargetType::Task
        } else if self.has_column(over_id) {
            TargetType::Column
        } else {
            tracing::debug!(active_id, over_id, "drop target not found");
            return false;
        };
        self.apply_drag(&DragEvent {
            active_id: active_id.to_string(),
            over_id: over_id.to_string(),
            over_type,
        })
    }

    pub fn apply_drag(&mut self, event: &DragEvent) -> bool {
        if event.over_type == TargetType::Column && !self.has_column(&event.over_id) {
            return false;
        }
        let changed = ops::apply_drag(&mut self.tasks, event);
        if changed {
            tracing::debug!(
                active = %event.active_id,
                over = %event.over_id,
                over_type = ?event.over_type,
                "task moved"
            );
        }
        changed
    }

    /// Move a task into the done column without changing its flat index.
    pub fn complete_task(&mut self, id: &str) -> bool {
        let done = self.done_column.clone();
        ops::move_to_column(&mut self.tasks, id, &done)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use super::*;
    use crate::error::{CoreError, Result, StorageError};

    #[derive(Default)]
    struct MemoryStore {
        data: RefCell<HashMap<String, Vec<KanbanTask>>>,
    }

    impl TaskStore for MemoryStore {
        fn load_tasks(&self, key: &str) -> Result<Option<Vec<KanbanTask>>> {
            Ok(self.data.borrow().get(key).cloned())
        }

        fn save_tasks(&self, key: &str, tasks: &[KanbanTask]) -> Result<()> {
            self.data.borrow_mut().insert(key.to_string(), tasks.to_vec());
            Ok(())
        }
    }

    struct BrokenStore;

    impl TaskStore for BrokenStore {
        fn load_tasks(&self, _key: &str) -> Result<Option<Vec<KanbanTask>>> {
            Err(CoreError::Storage(StorageError::Locked))
        }

        fn save_tasks(&self, _key: &str, _tasks: &[KanbanTask]) -> Result<()> {
            Err(CoreError::Storage(StorageError::Locked))
        }
    }

    fn board() -> TaskBoard {
        TaskBoard::default()
    }

    #[test]
    fn add_defaults_to_todo() {
        let mut board = board();
        let task = board.add_task("Flashcards", Some(Priority::Moderate), None, None);
        assert_eq!(task.column_id, "todo");
        assert_eq!(task.points, 30);
    }

    #[test]
    fn roadmap_day_is_added_once() {
        let mut board = board();
        assert!(board.add_roadmap_day("day-1", "Intro to limits", Some(Priority::Easy)).is_some());
        assert!(board.add_roadmap_day("day-1", "Intro to limits", Some(Priority::Easy)).is_none());
        assert_eq!(board.tasks().len(), 1);
        assert_eq!(board.find_task_by_id("day-1").unwrap().points, 15);
    }

    #[test]
    fn move_resolves_task_then_column() {
        let mut board = board();
        board.add_task("c", None, Some(ColumnId::new("done")), Some("c".into()));
        board.add_task("b", None, None, Some("b".into()));
        board.add_task("a", None, None, Some("a".into()));

        assert!(board.move_task("a", "c"));
        assert_eq!(board.find_task_by_id("a").unwrap().column_id, "done");

        assert!(board.move_task("b", "in-progress"));
        assert_eq!(board.find_task_by_id("b").unwrap().column_id, "in-progress");

        let before = board.tasks().to_vec();
        assert!(!board.move_task("b", "archive"));
        assert_eq!(board.tasks(), before.as_slice());
    }

    #[test]
    fn drag_onto_unconfigured_column_is_ignored() {
        let mut board = board();
        board.add_task("a", None, None, Some("a".into()));
        assert!(!board.apply_drag(&DragEvent::over_column("a", "archive")));
        assert_eq!(board.find_task_by_id("a").unwrap().column_id, "todo");
    }

    #[test]
    fn complete_moves_to_done_and_counts_points() {
        let mut board = board();
        board.add_task("x", Some(Priority::Hard), None, Some("x".into()));
        board.add_task("y", Some(Priority::Easy), None, Some("y".into()));
        assert_eq!(board.points_earned(), 0);

        assert!(board.complete_task("x"));
        assert!(!board.complete_task("x"));
        assert_eq!(board.points_earned(), 50);
        assert_eq!(board.tasks()[1].id, "x");
    }

    #[test]
    fn column_views_follow_configured_order() {
        let mut board = board();
        board.add_task("ghost", None, Some(ColumnId::new("nowhere")), None);
        board.add_task("a", None, None, None);
        let views = board.column_views();
        let titles: Vec<_> = views.iter().map(|v| v.title).collect();
        assert_eq!(titles, vec!["Todo", "In Progress", "Done"]);
        let shown: usize = views.iter().map(|v| v.tasks.len()).sum();
        assert_eq!(shown, 1);
    }

    #[test]
    fn load_and_persist_roundtrip_through_store() {
        let store = MemoryStore::default();
        let fresh = TaskBoard::load(&store, "board:u1", default_columns(), ColumnId::new("done"));
        assert!(fresh.tasks().is_empty());

        let mut board = fresh;
        board.add_task("a", Some(Priority::Hard), None, Some("a".into()));
        board.persist(&store, "board:u1");

        let reloaded = TaskBoard::load(&store, "board:u1", default_columns(), ColumnId::new("done"));
        assert_eq!(reloaded.tasks(), board.tasks());
        let other = TaskBoard::load(&store, "board:u2", default_columns(), ColumnId::new("done"));
        assert!(other.tasks().is_empty());
    }

    #[test]
    fn broken_store_never_rolls_back_local_state() {
        let mut board = TaskBoard::load(&BrokenStore, "k", default_columns(), ColumnId::new("done"));
        board.add_task("a", None, None, Some("a".into()));
        board.persist(&BrokenStore, "k");
        assert_eq!(board.tasks().len(), 1);
    }

    struct UnreadableStore {
        saved: RefCell<Vec<Vec<KanbanTask>>>,
    }

    impl TaskStore for UnreadableStore {
        fn load_tasks(&self, key: &str) -> Result<Option<Vec<KanbanTask>>> {
            Err(CoreError::Storage(StorageError::Corrupt {
                key: key.to_string(),
                message: "missing field `column_id`".into(),
            }))
        }

        fn save_tasks(&self, _key: &str, tasks: &[KanbanTask]) -> Result<()> {
            self.saved.borrow_mut().push(tasks.to_vec());
            Ok(())
        }
    }

    #[test]
    fn unreadable_board_is_never_overwritten() {
        let store = UnreadableStore {
            saved: RefCell::new(Vec::new()),
        };
        let mut board = TaskBoard::load(&store, "board:alice", default_columns(), ColumnId::new("done"));
        assert!(board.load_failed());

        board.add_task("new", None, None, Some("n".into()));
        board.persist(&store, "board:alice");
        assert!(store.saved.borrow().is_empty());
        assert_eq!(board.tasks().len(), 1);
    }

    #[test]
    fn missing_board_is_writable() {
        let store = MemoryStore::default();
        let board = TaskBoard::load(&store, "board:new", default_columns(), ColumnId::new("done"));
        assert!(!board.load_failed());
    }
}
