//! User directory endpoints

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use kanban_shared::models::user::{User, UserSummary};

/// Users that can be assigned to tasks, ordered by email
///
/// ```text
/// GET /api/v1/users/assignable
/// ```
pub async fn list_assignable(State(state): State<AppState>) -> ApiResult<Json<Vec<UserSummary>>> {
    let users = User::list_assignable(&state.db).await?;
    Ok(Json(users))
}
