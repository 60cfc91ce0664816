//! Board and column endpoints
//!
//! All handlers run behind the JWT layer and act on behalf of
//! [`AuthContext::user_id`]. Boards owned by someone else answer exactly like
//! boards that do not exist.

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use kanban_shared::{
    auth::middleware::AuthContext,
    models::column::BoardColumn,
    service::{self, BoardView, NewBoard},
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;
use validator::Validate;

/// A column declared when the board is created
///
/// `order_index` only ranks the seeds against each other; the stored indices
/// are always `0..n`. Seeds without one keep their position in the list.
#[derive(Debug, Deserialize, Validate)]
pub struct ColumnSeed {
    #[validate(length(min = 1, max = 255, message = "Column name must be 1-255 characters"))]
    pub name: String,

    #[serde(default)]
    pub order_index: Option<i32>,
}

/// Create board request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBoardRequest {
    #[validate(length(min = 1, max = 255, message = "Board name must be 1-255 characters"))]
    pub name: String,

    pub description: Option<String>,

    #[serde(default)]
    #[validate(nested)]
    pub columns: Vec<ColumnSeed>,
}

impl CreateBoardRequest {
    fn into_new_board(self) -> NewBoard {
        let mut seeds: Vec<(usize, ColumnSeed)> = self.columns.into_iter().enumerate().collect();
        seeds.sort_by_key(|(position, seed)| (seed.order_index.unwrap_or(*position as i32), *position));

        NewBoard {
            name: self.name,
            description: self.description,
            columns: seeds.into_iter().map(|(_, seed)| seed.name).collect(),
        }
    }
}

/// Add or rename column request
#[derive(Debug, Deserialize, Validate)]
pub struct ColumnRequest {
    #[validate(length(min = 1, max = 255, message = "Column name must be 1-255 characters"))]
    pub name: String,
}

/// Move column request
#[derive(Debug, Deserialize, Validate)]
pub struct ColumnMoveRequest {
    #[validate(range(min = 0, message = "Index must not be negative"))]
    pub new_order_index: i32,
}

/// List the caller's boards
///
/// ```text
/// GET /api/v1/boards
/// ```
///
/// Every board carries its live columns in order, each with its live tasks in
/// order and their assignees.
pub async fn list_boards(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<BoardView>>> {
    let boards = service::list_boards(&state.db, auth.user_id).await?;
    Ok(Json(boards))
}

/// Create a board with its initial columns
///
/// ```text
/// POST /api/v1/boards
///
/// { "name": "Roadmap", "columns": [{ "name": "Todo" }, { "name": "Done" }] }
/// ```
pub async fn create_board(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateBoardRequest>,
) -> ApiResult<(StatusCode, Json<BoardView>)> {
    req.validate()?;

    let board = service::create_board(&state.db, auth.user_id, req.into_new_board()).await?;

    Ok((StatusCode::CREATED, Json(board)))
}

/// Get one board
pub async fn get_board(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(board_id): Path<Uuid>,
) -> ApiResult<Json<BoardView>> {
    let board = service::get_board(&state.db, auth.user_id, board_id).await?;
    Ok(Json(board))
}

/// Append a column to a board
///
/// ```text
/// POST /api/v1/boards/:board_id/columns
///
/// { "name": "Review" }
/// ```
pub async fn add_column(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(board_id): Path<Uuid>,
    Json(req): Json<ColumnRequest>,
) -> ApiResult<(StatusCode, Json<BoardColumn>)> {
    req.validate()?;

    let column = service::add_column(&state.db, auth.user_id, board_id, &req.name).await?;

    Ok((StatusCode::CREATED, Json(column)))
}

/// Rename a column
pub async fn rename_column(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((board_id, column_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<ColumnRequest>,
) -> ApiResult<Json<BoardColumn>> {
    req.validate()?;

    let column =
        service::rename_column(&state.db, auth.user_id, board_id, column_id, &req.name).await?;

    Ok(Json(column))
}

/// Move a column within its board
///
/// ```text
/// PUT /api/v1/boards/:board_id/columns/:column_id/move
///
/// { "new_order_index": 0 }
/// ```
///
/// Indices past the last column move it to the end.
pub async fn move_column(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((board_id, column_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<ColumnMoveRequest>,
) -> ApiResult<Json<BoardColumn>> {
    req.validate()?;

    let column = service::move_column(
        &state.db,
        auth.user_id,
        board_id,
        column_id,
        req.new_order_index,
    )
    .await?;

    Ok(Json(column))
}

/// Soft-delete a column and its tasks
pub async fn delete_column(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((board_id, column_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<Value>> {
    service::delete_column(&state.db, auth.user_id, board_id, column_id).await?;

    Ok(Json(json!({ "message": "Column marked as deleted" })))
}
