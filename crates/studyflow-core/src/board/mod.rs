//! Kanban task board.
//!
//! Tasks live in a single flat, ordered collection; columns are a filtered
//! view of it. Drag gestures reorder that collection or reassign a task's
//! column, and never fail.

mod column;
mod drag;
pub mod ops;
mod store;
mod task;

pub use column::{default_columns, Column};
pub use drag::{DragEvent, TargetType};
pub use store::{ColumnView, TaskBoard};
pub use task::{ColumnId, KanbanTask, Priority};
