//! # Studyflow Core Library
//!
//! Client-local study tools that carry real state: a Pomodoro-style focus
//! session engine and a Kanban task board. The `studyflow` CLI is a thin
//! layer over this crate.
//!
//! ## Architecture
//!
//! - **Focus Engine**: a Work/Rest state machine advanced one second at a
//!   time by the caller via `tick()`
//! - **Task Board**: a flat ordered task collection with drag-driven
//!   reorder and column moves
//! - **Storage**: SQLite for boards and focus history, TOML for configuration
//!
//! ## Key Components
//!
//! - [`FocusSession`]: holder for the current run plus its collaborators
//! - [`TaskBoard`]: task collection and column layout
//! - [`Database`]: board and history persistence
//! - [`Config`]: application configuration management

pub mod board;
pub mod error;
pub mod events;
pub mod focus;
pub mod persistence;
pub mod storage;

pub use board::{Column, ColumnId, DragEvent, KanbanTask, Priority, TargetType, TaskBoard};
pub use error::{ConfigError, CoreError, StorageError, ValidationError};
pub use events::{Notification, NotificationLog, Notifier};
pub use focus::{
    CompletedFocusRecord, FocusMode, FocusSession, FocusSessionConfig, FocusSessionRun,
    FocusState, Ticker,
};
pub use persistence::{FocusHistory, TaskStore};
pub use storage::{Config, Database};
