//! Task board commands for CLI.

use clap::Subcommand;
use serde_json::json;
use studyflow_core::persistence::board_key;
use studyflow_core::{ColumnId, Config, Database, Priority, TaskBoard};

#[derive(Subcommand)]
pub enum BoardAction {
    /// Add a task to the front of the board
    Add {
        /// Task description
        content: String,
        /// Priority: easy, moderate or hard
        #[arg(long)]
        priority: Option<Priority>,
        /// Column to place the task in (default: todo)
        #[arg(long)]
        column: Option<String>,
        /// Use this id instead of generating one (e.g. a roadmap day id)
        #[arg(long)]
        id: Option<String>,
    },
    /// Mirror a roadmap day onto the board, once
    Roadmap {
        /// Roadmap day id
        day_id: String,
        /// Task description
        content: String,
        /// Priority: easy, moderate or hard
        #[arg(long)]
        priority: Option<Priority>,
    },
    /// List tasks, grouped by column
    List {
        /// Only show this column
        #[arg(long)]
        column: Option<String>,
    },
    /// Get a task by id
    Get {
        /// Task ID
        id: String,
    },
    /// Drop a task onto another task or a column
    Move {
        /// Task being dragged
        active_id: String,
        /// Task or column it was dropped on
        over_id: String,
    },
    /// Move a task to the done column
    Complete {
        /// Task ID
        id: String,
    },
    /// Show configured columns
    Columns,
    /// Total points of completed tasks
    Points,
}

pub fn run(user: &str, action: BoardAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let config = Config::load()?;
    let key = board_key(user);
    let mut board = TaskBoard::load(
        &db,
        &key,
        config.board.columns.clone(),
        config.board.done_column.clone(),
    );

    let mutates = matches!(
        action,
        BoardAction::Add { .. }
            | BoardAction::Roadmap { .. }
            | BoardAction::Move { .. }
            | BoardAction::Complete { .. }
    );
    if mutates && board.load_failed() {
        return Err(format!("stored board for '{user}' could not be read; not changing it").into());
    }

    match action {
        BoardAction::Add {
            content,
            priority,
            column,
            id,
        } => {
            if let Some(ref id) = id {
                if board.find_task_by_id(id).is_some() {
                    return Err(format!("task id already in use: {id}").into());
                }
            }
            let task = board.add_task(content, priority, column.map(ColumnId::from), id);
            println!("{}", serde_json::to_string_pretty(task)?);
            board.persist(&db, &key);
        }
        BoardAction::Roadmap {
            day_id,
            content,
            priority,
        } => {
            match board.add_roadmap_day(&day_id, content, priority) {
                Some(task) => println!("{}", serde_json::to_string_pretty(task)?),
                None => println!("{}", json!({ "skipped": day_id })),
            }
            board.persist(&db, &key);
        }
        BoardAction::List { column } => match column {
            Some(column) => {
                let column = ColumnId::from(column);
                let tasks: Vec<_> = board.tasks_in_column(&column).collect();
                println!("{}", serde_json::to_string_pretty(&tasks)?);
            }
            None => {
                println!("{}", serde_json::to_string_pretty(&board.column_views())?);
            }
        },
        BoardAction::Get { id } => match board.find_task_by_id(&id) {
            Some(task) => println!("{}", serde_json::to_string_pretty(task)?),
            None => return Err(format!("task not found: {id}").into()),
        },
        BoardAction::Move { active_id, over_id } => {
            let moved = board.move_task(&active_id, &over_id);
            if moved {
                board.persist(&db, &key);
            }
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "moved": moved,
                    "task": board.find_task_by_id(&active_id),
                }))?
            );
        }
        BoardAction::Complete { id } => {
            if board.find_task_by_id(&id).is_none() {
                return Err(format!("task not found: {id}").into());
            }
            if board.complete_task(&id) {
                board.persist(&db, &key);
            }
            println!("{}", serde_json::to_string_pretty(&board.find_task_by_id(&id))?);
        }
        BoardAction::Columns => {
            println!("{}", serde_json::to_string_pretty(board.columns())?);
        }
        BoardAction::Points => {
            println!("{}", json!({ "points": board.points_earned() }));
        }
    }
    Ok(())
}
