//! Operations on the flat task collection.
//!
//! All tasks on a board live in one ordered `Vec`. A column's order is the
//! relative order of its tasks in that `Vec`; there is no per-column index.
//!
//! Every function here is infallible. Ids that do not resolve make the
//! operation a no-op, since drag events can race with list updates.

use super::drag::{DragEvent, TargetType};
use super::task::{ColumnId, KanbanTask, Priority};

/// Move the element at `from` so that it ends up at index `to`.
///
/// Remove-then-insert: the element is taken out first and inserted at `to`
/// in the shortened `Vec`. `to` is clamped to the last index.
pub fn array_move<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from >= items.len() || from == to {
        return;
    }
    let item = items.remove(from);
    let to = to.min(items.len());
    items.insert(to, item);
}

pub fn find_task_by_id<'a>(tasks: &'a [KanbanTask], id: &str) -> Option<&'a KanbanTask> {
    tasks.iter().find(|t| t.id == id)
}

fn position(tasks: &[KanbanTask], id: &str) -> Option<usize> {
    tasks.iter().position(|t| t.id == id)
}

/// Create a task and put it at the front (most recent first).
pub fn add_task<'a>(
    tasks: &'a mut Vec<KanbanTask>,
    content: impl Into<String>,
    priority: Option<Priority>,
    column_id: ColumnId,
    id: Option<String>,
) -> &'a KanbanTask {
    tasks.insert(0, KanbanTask::new(content, priority, column_id, id));
    &tasks[0]
}

/// Drop `active_id` onto the task `over_id`.
///
/// Across columns the active task first takes the target's column, then is
/// moved to the target's flat index. Within a column it is only moved.
/// Returns whether anything changed.
pub fn move_task(tasks: &mut Vec<KanbanTask>, active_id: &str, over_id: &str) -> bool {
    if active_id == over_id {
        return false;
    }
    let (Some(active_index), Some(over_index)) =
        (position(tasks, active_id), position(tasks, over_id))
    else {
        return false;
    };

    if tasks[active_index].column_id != tasks[over_index].column_id {
        tasks[active_index].column_id = tasks[over_index].column_id.clone();
    }
    array_move(tasks, active_index, over_index);
    true
}

/// Drop `active_id` onto an empty area of `column_id`.
///
/// Only the column changes; the task keeps its flat index.
pub fn move_to_column(tasks: &mut [KanbanTask], active_id: &str, column_id: &ColumnId) -> bool {
    let Some(task) = tasks.iter_mut().find(|t| t.id == active_id) else {
        return false;
    };
    if task.column_id == *column_id {
        return false;
    }
    task.column_id = column_id.clone();
    true
}

/// Route a drag gesture to [`move_task`] or [`move_to_column`].
pub fn apply_drag(tasks: &mut Vec<KanbanTask>, event: &DragEvent) -> bool {
    match event.over_type {
        TargetType::Task => move_task(tasks, &event.active_id, &event.over_id),
        TargetType::Column => {
            move_to_column(tasks, &event.active_id, &ColumnId::new(event.over_id.as_str()))
        }
    }
}

/// Tasks in `column_id`, in flat order.
pub fn tasks_in_column<'a>(
    tasks: &'a [KanbanTask],
    column_id: &'a ColumnId,
) -> impl Iterator<Item = &'a KanbanTask> + 'a {
    tasks.iter().filter(move |t| t.column_id == *column_id)
}
