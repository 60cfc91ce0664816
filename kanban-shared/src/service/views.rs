//! Nested read views returned to clients
//!
//! A board view is the board row with its live columns in order, each column
//! with its live tasks in order, each task with its assignees. Rows are
//! fetched per level in bulk and stitched together by [`assemble_boards`].

use std::collections::HashMap;

use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::board::Board;
use crate::models::column::BoardColumn;
use crate::models::task::{Task, TaskAssignee};
use crate::models::user::UserSummary;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskView {
    #[serde(flatten)]
    pub task: Task,
    pub assignees: Vec<UserSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnView {
    #[serde(flatten)]
    pub column: BoardColumn,
    pub tasks: Vec<TaskView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardView {
    #[serde(flatten)]
    pub board: Board,
    pub columns: Vec<ColumnView>,
}

impl ColumnView {
    /// A column with no tasks, as returned right after creation
    pub fn empty(column: BoardColumn) -> Self {
        Self {
            column,
            tasks: Vec::new(),
        }
    }
}

/// Stitches flat rows into nested board views
///
/// Boards keep their input order. Soft-deleted columns and tasks are dropped
/// even if present in the input, and siblings are ordered by `order_index`.
pub fn assemble_boards(
    boards: Vec<Board>,
    columns: Vec<BoardColumn>,
    tasks: Vec<Task>,
    assignees: Vec<TaskAssignee>,
) -> Vec<BoardView> {
    let mut users_by_task: HashMap<Uuid, Vec<UserSummary>> = HashMap::new();
    for row in assignees {
        users_by_task.entry(row.task_id).or_default().push(row.user);
    }

    let mut tasks_by_column: HashMap<Uuid, Vec<TaskView>> = HashMap::new();
    for task in tasks.into_iter().filter(|t| !t.lifecycle.is_deleted()) {
        let assignees = users_by_task.remove(&task.id).unwrap_or_default();
        tasks_by_column
            .entry(task.column_id)
            .or_default()
            .push(TaskView { task, assignees });
    }

    let mut columns_by_board: HashMap<Uuid, Vec<ColumnView>> = HashMap::new();
    for column in columns.into_iter().filter(|c| !c.lifecycle.is_deleted()) {
        let mut tasks = tasks_by_column.remove(&column.id).unwrap_or_default();
        tasks.sort_by_key(|t| t.task.order_index);
        columns_by_board
            .entry(column.board_id)
            .or_default()
            .push(ColumnView { column, tasks });
    }

    boards
        .into_iter()
        .map(|board| {
            let mut columns = columns_by_board.remove(&board.id).unwrap_or_default();
            columns.sort_by_key(|c| c.column.order_index);
            BoardView { board, columns }
        })
        .collect()
}

/// Loads full views for the given boards
pub async fn load_board_views(
    pool: &PgPool,
    boards: Vec<Board>,
) -> Result<Vec<BoardView>, sqlx::Error> {
    let board_ids: Vec<Uuid> = boards.iter().map(|b| b.id).collect();
    let columns = BoardColumn::list_live_by_boards(pool, &board_ids).await?;

    let column_ids: Vec<Uuid> = columns.iter().map(|c| c.id).collect();
    let tasks = Task::list_live_by_columns(pool, &column_ids).await?;

    let task_ids: Vec<Uuid> = tasks.iter().map(|t| t.id).collect();
    let assignees = Task::list_assignees(pool, &task_ids).await?;

    Ok(assemble_boards(boards, columns, tasks, assignees))
}

/// Loads the assignees of one task into a view
pub async fn load_task_view(pool: &PgPool, task: Task) -> Result<TaskView, sqlx::Error> {
    let assignees = Task::list_assignees(pool, &[task.id])
        .await?
        .into_iter()
        .map(|row| row.user)
        .collect();

    Ok(TaskView { task, assignees })
}
