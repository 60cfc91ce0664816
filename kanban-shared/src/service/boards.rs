//! Board and column operations
//!
//! Each mutation runs in a single transaction. Column index changes take the
//! board row lock first so concurrent reorders of the same board serialize.

use sqlx::{PgConnection, PgPool};
use tracing::info;
use uuid::Uuid;

use super::error::{ServiceError, ServiceResult};
use super::views::{load_board_views, BoardView, ColumnView};
use crate::models::board::Board;
use crate::models::column::BoardColumn;
use crate::models::task::Task;
use crate::ordering::{self, SiblingSet, WithinMove};

/// Input for creating a board
#[derive(Debug, Clone, Default)]
pub struct NewBoard {
    pub name: String,
    pub description: Option<String>,

    /// Initial column names, in display order
    pub columns: Vec<String>,
}

/// Creates a board owned by `owner` together with its initial columns
///
/// Columns are appended in declaration order, so the i-th name gets index i.
pub async fn create_board(pool: &PgPool, owner: Uuid, input: NewBoard) -> ServiceResult<BoardView> {
    let mut tx = pool.begin().await?;

    let board = Board::insert(&mut *tx, owner, &input.name, input.description.as_deref()).await?;

    let mut columns = Vec::with_capacity(input.columns.len());
    for (position, name) in input.columns.iter().enumerate() {
        let index = ordering::append_index(position as i64);
        let column = BoardColumn::insert(&mut *tx, board.id, name, index).await?;
        columns.push(ColumnView::empty(column));
    }

    tx.commit().await?;

    info!(
        board_id = %board.id,
        owner = %owner,
        columns = columns.len(),
        "Board created"
    );

    Ok(BoardView { board, columns })
}

/// Lists every board owned by `owner` with live columns and tasks
pub async fn list_boards(pool: &PgPool, owner: Uuid) -> ServiceResult<Vec<BoardView>> {
    let boards = Board::list_by_owner(pool, owner).await?;
    Ok(load_board_views(pool, boards).await?)
}

/// Fetches one board owned by `owner`
///
/// # Errors
///
/// [`ServiceError::NotFound`] if the board is missing or owned by another user
pub async fn get_board(pool: &PgPool, owner: Uuid, board_id: Uuid) -> ServiceResult<BoardView> {
    let mut conn = pool.acquire().await?;
    let board = Board::find_owned(&mut *conn, board_id, owner)
        .await?
        .ok_or(ServiceError::NotFound("Board"))?;
    drop(conn);

    load_board_views(pool, vec![board])
        .await?
        .pop()
        .ok_or(ServiceError::NotFound("Board"))
}

/// Appends a column to the end of a board
pub async fn add_column(
    pool: &PgPool,
    owner: Uuid,
    board_id: Uuid,
    name: &str,
) -> ServiceResult<BoardColumn> {
    let mut tx = pool.begin().await?;

    let board = Board::find_owned(&mut *tx, board_id, owner)
        .await?
        .ok_or(ServiceError::NotFound("Board"))?;

    let set = SiblingSet::BoardColumns(board.id);
    ordering::lock_set(&mut *tx, set).await?;
    let count = ordering::live_count(&mut *tx, set).await?;
    let column = BoardColumn::insert(&mut *tx, board.id, name, ordering::append_index(count)).await?;

    tx.commit().await?;

    info!(
        board_id = %board.id,
        column_id = %column.id,
        order_index = column.order_index,
        "Column added"
    );

    Ok(column)
}

/// Renames a live column; its index is untouched
pub async fn rename_column(
    pool: &PgPool,
    owner: Uuid,
    board_id: Uuid,
    column_id: Uuid,
    name: &str,
) -> ServiceResult<BoardColumn> {
    let mut tx = pool.begin().await?;

    let column = live_column_on_board(&mut *tx, owner, board_id, column_id).await?;
    let column = BoardColumn::rename(&mut *tx, column.id, name).await?;

    tx.commit().await?;

    info!(board_id = %board_id, column_id = %column_id, "Column renamed");

    Ok(column)
}

/// Moves a live column to `new_index` within its board
///
/// The target is clamped to the live column range. Moving a column to its
/// current index changes nothing and returns it as is.
pub async fn move_column(
    pool: &PgPool,
    owner: Uuid,
    board_id: Uuid,
    column_id: Uuid,
    new_index: i32,
) -> ServiceResult<BoardColumn> {
    let mut tx = pool.begin().await?;

    let set = SiblingSet::BoardColumns(board_id);
    ordering::lock_set(&mut *tx, set).await?;

    let column = live_column_on_board(&mut *tx, owner, board_id, column_id).await?;
    let count = ordering::live_count(&mut *tx, set).await?;

    let column = match ordering::plan_move_within(column.order_index, new_index, count) {
        WithinMove::Unchanged => column,
        WithinMove::Shift { shift, index } => {
            ordering::apply_shift(&mut *tx, set, shift).await?;
            BoardColumn::set_index(&mut *tx, column.id, index).await?
        }
    };

    tx.commit().await?;

    info!(
        board_id = %board_id,
        column_id = %column_id,
        requested = new_index,
        order_index = column.order_index,
        "Column moved"
    );

    Ok(column)
}

/// Soft-deletes a column and every live task in it, then closes the gap in
/// the board's column order
pub async fn delete_column(
    pool: &PgPool,
    owner: Uuid,
    board_id: Uuid,
    column_id: Uuid,
) -> ServiceResult<()> {
    let mut tx = pool.begin().await?;

    let set = SiblingSet::BoardColumns(board_id);
    ordering::lock_set(&mut *tx, set).await?;
    // Blocks task inserts and moves into this column until commit
    ordering::lock_set(&mut *tx, SiblingSet::ColumnTasks(column_id)).await?;

    let column = live_column_on_board(&mut *tx, owner, board_id, column_id).await?;

    BoardColumn::mark_deleted(&mut *tx, column.id).await?;
    let cascaded = Task::soft_delete_in_column(&mut *tx, column.id).await?;
    ordering::apply_shift(&mut *tx, set, ordering::plan_soft_delete(column.order_index)).await?;

    tx.commit().await?;

    info!(
        board_id = %board_id,
        column_id = %column_id,
        order_index = column.order_index,
        cascaded_tasks = cascaded,
        "Column deleted"
    );

    Ok(())
}

/// Loads a live, owned column and checks it sits on `board_id`
async fn live_column_on_board(
    conn: &mut PgConnection,
    owner: Uuid,
    board_id: Uuid,
    column_id: Uuid,
) -> ServiceResult<BoardColumn> {
    BoardColumn::find_live_owned(conn, column_id, owner)
        .await?
        .filter(|column| column.board_id == board_id)
        .ok_or(ServiceError::NotFound("Column"))
}
