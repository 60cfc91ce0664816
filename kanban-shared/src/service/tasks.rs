//! Task operations
//!
//! Task index changes lock the parent column row(s). When two columns are
//! involved they are locked in ascending id order. A task that moves while
//! its locks are being taken can still force an out-of-order lock; Postgres
//! then aborts one side and it surfaces as the transient
//! [`ServiceError::Store`].

use sqlx::{PgConnection, PgPool};
use tracing::{debug, info};
use uuid::Uuid;

use super::error::{ServiceError, ServiceResult};
use super::views::{load_task_view, TaskView};
use crate::models::column::BoardColumn;
use crate::models::task::{CreateTask, Task, TaskChanges};
use crate::models::user::User;
use crate::ordering::{self, SiblingSet, WithinMove};

const ASSIGNEES_NOT_FOUND: &str = "One or more assignees not found";

/// Creates a task at the end of a live column the caller owns
///
/// Every assignee must exist; otherwise nothing is written.
pub async fn create_task(
    pool: &PgPool,
    owner: Uuid,
    data: CreateTask,
    assignee_ids: Option<Vec<Uuid>>,
) -> ServiceResult<TaskView> {
    let mut tx = pool.begin().await?;

    let set = SiblingSet::ColumnTasks(data.column_id);
    ordering::lock_set(&mut *tx, set).await?;
    BoardColumn::find_live_owned(&mut *tx, data.column_id, owner)
        .await?
        .ok_or(ServiceError::NotFound("Column"))?;

    let assignees = match assignee_ids {
        Some(ids) => resolve_assignees(&mut *tx, ids).await?,
        None => Vec::new(),
    };

    let count = ordering::live_count(&mut *tx, set).await?;
    let task = Task::insert(&mut *tx, &data, ordering::append_index(count)).await?;
    if !assignees.is_empty() {
        Task::replace_assignees(&mut *tx, task.id, &assignees).await?;
    }

    tx.commit().await?;

    info!(
        task_id = %task.id,
        column_id = %task.column_id,
        order_index = task.order_index,
        assignees = assignees.len(),
        "Task created"
    );

    Ok(load_task_view(pool, task).await?)
}

/// Applies a partial update to a live task
///
/// `assignee_ids` of `None` keeps the current assignees, `Some(vec![])`
/// clears them and any other list replaces them.
pub async fn update_task(
    pool: &PgPool,
    owner: Uuid,
    task_id: Uuid,
    changes: TaskChanges,
    assignee_ids: Option<Vec<Uuid>>,
) -> ServiceResult<TaskView> {
    let mut tx = pool.begin().await?;

    let task = Task::find_live_owned(&mut *tx, task_id, owner)
        .await?
        .ok_or(ServiceError::NotFound("Task"))?;

    let assignees = match assignee_ids {
        Some(ids) => Some(resolve_assignees(&mut *tx, ids).await?),
        None => None,
    };

    // An assignee-only change still bumps `updated_at`
    let task = if changes.is_empty() && assignees.is_none() {
        task
    } else {
        Task::update_fields(&mut *tx, task.id, changes).await?
    };
    if let Some(ids) = &assignees {
        Task::replace_assignees(&mut *tx, task.id, ids).await?;
    }

    tx.commit().await?;

    info!(
        task_id = %task.id,
        assignees_replaced = assignees.is_some(),
        "Task updated"
    );

    Ok(load_task_view(pool, task).await?)
}

/// Soft-deletes a task and closes the gap in its column
pub async fn delete_task(pool: &PgPool, owner: Uuid, task_id: Uuid) -> ServiceResult<()> {
    let mut tx = pool.begin().await?;

    let task = lock_live_task(&mut *tx, owner, task_id, None).await?;
    let set = SiblingSet::ColumnTasks(task.column_id);

    Task::mark_deleted(&mut *tx, task.id).await?;
    ordering::apply_shift(&mut *tx, set, ordering::plan_soft_delete(task.order_index)).await?;

    tx.commit().await?;

    info!(
        task_id = %task.id,
        column_id = %task.column_id,
        order_index = task.order_index,
        "Task deleted"
    );

    Ok(())
}

/// Moves a task to `new_index` in `dest_column_id`
///
/// The destination must be a live column on a board the caller owns; it may
/// be the task's current column or any other such column. The target index is
/// clamped to the destination's valid range.
pub async fn move_task(
    pool: &PgPool,
    owner: Uuid,
    task_id: Uuid,
    dest_column_id: Uuid,
    new_index: i32,
) -> ServiceResult<TaskView> {
    let mut tx = pool.begin().await?;

    let task = lock_live_task(&mut *tx, owner, task_id, Some(dest_column_id)).await?;
    BoardColumn::find_live_owned(&mut *tx, dest_column_id, owner)
        .await?
        .ok_or_else(|| ServiceError::InvalidReference("Destination column not found".into()))?;

    let source = SiblingSet::ColumnTasks(task.column_id);
    let target = SiblingSet::ColumnTasks(dest_column_id);

    let moved = if task.column_id == dest_column_id {
        let count = ordering::live_count(&mut *tx, source).await?;
        match ordering::plan_move_within(task.order_index, new_index, count) {
            WithinMove::Unchanged => task.clone(),
            WithinMove::Shift { shift, index } => {
                ordering::apply_shift(&mut *tx, source, shift).await?;
                Task::set_position(&mut *tx, task.id, dest_column_id, index).await?
            }
        }
    } else {
        let count = ordering::live_count(&mut *tx, target).await?;
        let plan = ordering::plan_move_across(task.order_index, new_index, count);
        ordering::apply_shift(&mut *tx, source, plan.close_source).await?;
        ordering::apply_shift(&mut *tx, target, plan.open_target).await?;
        Task::set_position(&mut *tx, task.id, dest_column_id, plan.index).await?
    };

    tx.commit().await?;

    info!(
        task_id = %task.id,
        from_column = %task.column_id,
        from_index = task.order_index,
        to_column = %moved.column_id,
        to_index = moved.order_index,
        "Task moved"
    );

    Ok(load_task_view(pool, moved).await?)
}

/// Reads a live task and locks the column(s) it touches
///
/// The task is re-read after locking: a concurrent move may have committed
/// while this transaction waited, in which case its new column is locked too
/// and the read repeats.
async fn lock_live_task(
    conn: &mut PgConnection,
    owner: Uuid,
    task_id: Uuid,
    also_lock: Option<Uuid>,
) -> ServiceResult<Task> {
    let mut locked: Vec<Uuid> = Vec::new();

    loop {
        let task = Task::find_live_owned(&mut *conn, task_id, owner)
            .await?
            .ok_or(ServiceError::NotFound("Task"))?;

        if locked.contains(&task.column_id) {
            return Ok(task);
        }

        let mut wanted: Vec<Uuid> = std::iter::once(task.column_id)
            .chain(also_lock)
            .filter(|id| !locked.contains(id))
            .collect();
        wanted.sort();
        wanted.dedup();

        for column_id in wanted {
            ordering::lock_set(&mut *conn, SiblingSet::ColumnTasks(column_id)).await?;
            locked.push(column_id);
        }

        debug!(task_id = %task_id, locked = locked.len(), "Locked task columns");
    }
}

/// Checks that every id names an existing user
///
/// Duplicates are collapsed. Returns the distinct ids on success.
async fn resolve_assignees(conn: &mut PgConnection, mut ids: Vec<Uuid>) -> ServiceResult<Vec<Uuid>> {
    ids.sort();
    ids.dedup();

    let found = User::find_many_by_ids(conn, &ids).await?;
    if found.len() != ids.len() {
        return Err(ServiceError::InvalidReference(ASSIGNEES_NOT_FOUND.to_string()));
    }

    Ok(ids)
}
