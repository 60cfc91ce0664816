//! Task endpoints
//!
//! - `POST /api/v1/tasks`
//! - `PUT /api/v1/tasks/:task_id`
//! - `DELETE /api/v1/tasks/:task_id`
//! - `PUT /api/v1/tasks/:task_id/move`

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use kanban_shared::{
    auth::middleware::AuthContext,
    models::task::{CreateTask, TaskChanges},
    service::{self, TaskView},
};
use serde::{Deserialize, Deserializer};
use serde_json::{json, Value};
use uuid::Uuid;
use validator::Validate;

/// Create task request
#[derive(Debug, Deserialize, Validate)]
pub struct TaskCreate {
    pub column_id: Uuid,

    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,

    /// Defaults to 0
    pub priority: Option<i32>,

    pub assignee_ids: Option<Vec<Uuid>>,
}

/// Update task request
///
/// Omitted fields stay as they are. `description` and `due_date` accept an
/// explicit `null` to clear them.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct TaskUpdate {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<DateTime<Utc>>>,

    pub priority: Option<i32>,

    /// Absent keeps the assignees, `[]` clears them
    pub assignee_ids: Option<Vec<Uuid>>,
}

/// Move task request
#[derive(Debug, Deserialize)]
pub struct TaskMove {
    /// Destination column, possibly the current one
    pub column_id: Uuid,

    pub order_index: i32,
}

/// Distinguishes a missing field (`None`) from `null` (`Some(None)`)
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl TaskUpdate {
    fn split(self) -> (TaskChanges, Option<Vec<Uuid>>) {
        let changes = TaskChanges {
            title: self.title,
            description: self.description,
            due_date: self.due_date,
            priority: self.priority,
        };
        (changes, self.assignee_ids)
    }
}

/// Create a task at the end of a column
///
/// ```text
/// POST /api/v1/tasks
///
/// {
///   "column_id": "5b0c...",
///   "title": "Write release notes",
///   "priority": 2,
///   "assignee_ids": ["9f1e..."]
/// }
/// ```
///
/// # Errors
///
/// - `404 Not Found`: column missing, deleted or on a foreign board
/// - `404 Not Found`: an assignee id does not match a user
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<TaskCreate>,
) -> ApiResult<(StatusCode, Json<TaskView>)> {
    req.validate()?;

    let data = CreateTask {
        column_id: req.column_id,
        title: req.title,
        description: req.description,
        due_date: req.due_date,
        priority: req.priority,
    };

    let task = service::create_task(&state.db, auth.user_id, data, req.assignee_ids).await?;

    Ok((StatusCode::CREATED, Json(task)))
}

/// Partially update a task
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(task_id): Path<Uuid>,
    Json(req): Json<TaskUpdate>,
) -> ApiResult<Json<TaskView>> {
    req.validate()?;

    let (changes, assignee_ids) = req.split();
    let task = service::update_task(&state.db, auth.user_id, task_id, changes, assignee_ids).await?;

    Ok(Json(task))
}

/// Soft-delete a task
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    service::delete_task(&state.db, auth.user_id, task_id).await?;

    Ok(Json(json!({ "message": "Task marked as deleted" })))
}

/// Move a task within its column or into another one
///
/// ```text
/// PUT /api/v1/tasks/:task_id/move
///
/// { "column_id": "5b0c...", "order_index": 1 }
/// ```
pub async fn move_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(task_id): Path<Uuid>,
    Json(req): Json<TaskMove>,
) -> ApiResult<Json<TaskView>> {
    let task = service::move_task(
        &state.db,
        auth.user_id,
        task_id,
        req.column_id,
        req.order_index,
    )
    .await?;

    Ok(Json(task))
}
