//! Task model and database operations
//!
//! Tasks are ordered within their column by `order_index`, can move between
//! columns, and are never hard-deleted. Assignees live in the
//! `task_assignees` join table.
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE tasks (
//!     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
//!     column_id UUID NOT NULL REFERENCES board_columns(id) ON DELETE CASCADE,
//!     title VARCHAR(255) NOT NULL,
//!     description TEXT,
//!     due_date TIMESTAMPTZ,
//!     priority INTEGER NOT NULL DEFAULT 0,
//!     order_index INTEGER NOT NULL,
//!     is_deleted BOOLEAN NOT NULL DEFAULT FALSE,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//!
//! CREATE TABLE task_assignees (
//!     task_id UUID NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
//!     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
//!     PRIMARY KEY (task_id, user_id)
//! );
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use super::user::UserSummary;
use super::Lifecycle;

const TASK_COLUMNS: &str = "id, column_id, title, description, due_date, priority, \
                            order_index, is_deleted, created_at, updated_at";

/// A task on a board column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    pub id: Uuid,

    /// Column currently holding the task
    pub column_id: Uuid,

    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,

    /// Free-form priority, 0 by default
    pub priority: i32,

    /// Position among the live tasks of the column
    pub order_index: i32,

    #[serde(rename = "is_deleted")]
    #[sqlx(rename = "is_deleted", try_from = "bool")]
    pub lifecycle: Lifecycle,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for inserting a task
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTask {
    pub column_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Option<i32>,
}

/// Partial update of a task's own fields
///
/// `None` leaves a field unchanged. For nullable fields `Some(None)` clears
/// the value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub priority: Option<i32>,
}

impl TaskChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.due_date.is_none()
            && self.priority.is_none()
    }
}

/// An assignee row tagged with the task it belongs to
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TaskAssignee {
    pub task_id: Uuid,

    #[sqlx(flatten)]
    pub user: UserSummary,
}

impl Task {
    /// Inserts a live task at `order_index`
    pub async fn insert(
        conn: &mut PgConnection,
        data: &CreateTask,
        order_index: i32,
    ) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            INSERT INTO tasks (column_id, title, description, due_date, priority, order_index)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(data.column_id)
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.due_date)
        .bind(data.priority.unwrap_or(0))
        .bind(order_index)
        .fetch_one(&mut *conn)
        .await?;

        Ok(task)
    }

    /// Finds a live task reachable through a live column of a board owned by
    /// `owner`
    pub async fn find_live_owned(
        conn: &mut PgConnection,
        id: Uuid,
        owner: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT t.id, t.column_id, t.title, t.description, t.due_date, t.priority,
                   t.order_index, t.is_deleted, t.created_at, t.updated_at
            FROM tasks t
            JOIN board_columns c ON c.id = t.column_id
            JOIN boards b ON b.id = c.board_id
            WHERE t.id = $1
              AND t.is_deleted = FALSE
              AND c.is_deleted = FALSE
              AND b.created_by = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(task)
    }

    /// Applies a partial update and bumps `updated_at`
    ///
    /// Builds the `SET` list from the fields present in `changes`.
    pub async fn update_fields(
        conn: &mut PgConnection,
        id: Uuid,
        changes: TaskChanges,
    ) -> Result<Self, sqlx::Error> {
        let mut query = String::from("UPDATE tasks SET updated_at = NOW()");
        let mut bind_count = 1;

        if changes.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if changes.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if changes.due_date.is_some() {
            bind_count += 1;
            query.push_str(&format!(", due_date = ${}", bind_count));
        }
        if changes.priority.is_some() {
            bind_count += 1;
            query.push_str(&format!(", priority = ${}", bind_count));
        }

        query.push_str(&format!(" WHERE id = $1 RETURNING {TASK_COLUMNS}"));

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id);

        if let Some(title) = changes.title {
            q = q.bind(title);
        }
        if let Some(description) = changes.description {
            q = q.bind(description);
        }
        if let Some(due_date) = changes.due_date {
            q = q.bind(due_date);
        }
        if let Some(priority) = changes.priority {
            q = q.bind(priority);
        }

        q.fetch_one(&mut *conn).await
    }

    /// Places a task in `column_id` at `order_index` and bumps `updated_at`
    pub async fn set_position(
        conn: &mut PgConnection,
        id: Uuid,
        column_id: Uuid,
        order_index: i32,
    ) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            UPDATE tasks
            SET column_id = $2, order_index = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(column_id)
        .bind(order_index)
        .fetch_one(&mut *conn)
        .await?;

        Ok(task)
    }

    /// Flags one task deleted, leaving its `order_index` frozen
    pub async fn mark_deleted(conn: &mut PgConnection, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE tasks
            SET is_deleted = TRUE, updated_at = NOW()
            WHERE id = $1 AND is_deleted = FALSE
            "#,
        )
        .bind(id)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Flags every live task of a column deleted in one statement
    ///
    /// Indices are left as they were; the column's ordering stops mattering
    /// once the column itself is deleted. Returns the number of tasks flagged.
    pub async fn soft_delete_in_column(
        conn: &mut PgConnection,
        column_id: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE tasks
            SET is_deleted = TRUE, updated_at = NOW()
            WHERE column_id = $1 AND is_deleted = FALSE
            "#,
        )
        .bind(column_id)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected())
    }

    /// Lists the live tasks of the given columns, ordered by column then index
    pub async fn list_live_by_columns(
        pool: &PgPool,
        column_ids: &[Uuid],
    ) -> Result<Vec<Self>, sqlx::Error> {
        if column_ids.is_empty() {
            return Ok(Vec::new());
        }

        let tasks = sqlx::query_as::<_, Task>(&format!(
            r#"
            SELECT {TASK_COLUMNS}
            FROM tasks
            WHERE column_id = ANY($1) AND is_deleted = FALSE
            ORDER BY column_id, order_index
            "#
        ))
        .bind(column_ids)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Replaces the full assignee set of a task
    ///
    /// An empty slice clears every assignee. Callers must have checked that
    /// all `user_ids` exist.
    pub async fn replace_assignees(
        conn: &mut PgConnection,
        task_id: Uuid,
        user_ids: &[Uuid],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM task_assignees WHERE task_id = $1")
            .bind(task_id)
            .execute(&mut *conn)
            .await?;

        if !user_ids.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO task_assignees (task_id, user_id)
                SELECT $1, user_id FROM UNNEST($2::UUID[]) AS user_id
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(task_id)
            .bind(user_ids)
            .execute(&mut *conn)
            .await?;
        }

        Ok(())
    }

    /// Loads the assignees of several tasks at once
    pub async fn list_assignees(
        pool: &PgPool,
        task_ids: &[Uuid],
    ) -> Result<Vec<TaskAssignee>, sqlx::Error> {
        if task_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, TaskAssignee>(
            r#"
            SELECT ta.task_id, u.id, u.email, u.full_name
            FROM task_assignees ta
            JOIN users u ON u.id = ta.user_id
            WHERE ta.task_id = ANY($1)
            ORDER BY ta.task_id, u.email
            "#,
        )
        .bind(task_ids)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }
}
