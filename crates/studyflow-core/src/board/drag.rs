//! Normalized drag-and-drop gestures.
//!
//! Whatever produces pointer or touch events only needs to hand over the
//! id being dragged, the id it was dropped on, and what kind of thing that
//! target is.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetType {
    Task,
    Column,
}

/// End of a drag gesture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragEvent {
    pub active_id: String,
    pub over_id: String,
    pub over_type: TargetType,
}

impl DragEvent {
    pub fn over_task(active_id: impl Into<String>, over_id: impl Into<String>) -> Self {
        Self {
            active_id: active_id.into(),
            over_id: over_id.into(),
            over_type: TargetType::Task,
        }
    }

    pub fn over_column(active_id: impl Into<String>, column_id: impl Into<String>) -> Self {
        Self {
            active_id: active_id.into(),
            over_id: column_id.into(),
            over_type: TargetType::Column,
        }
    }
}
