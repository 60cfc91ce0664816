//! Board column model and database operations
//!
//! Columns are ordered within their board by `order_index`. Only live
//! (non-deleted) columns take part in the ordering; index maintenance lives in
//! [`crate::ordering`], this module only reads and writes rows.
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE board_columns (
//!     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
//!     board_id UUID NOT NULL REFERENCES boards(id) ON DELETE CASCADE,
//!     name VARCHAR(255) NOT NULL,
//!     order_index INTEGER NOT NULL,
//!     is_deleted BOOLEAN NOT NULL DEFAULT FALSE,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use super::Lifecycle;

/// A column of a board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct BoardColumn {
    pub id: Uuid,
    pub board_id: Uuid,
    pub name: String,

    /// Position among the live columns of the board
    pub order_index: i32,

    #[serde(rename = "is_deleted")]
    #[sqlx(rename = "is_deleted", try_from = "bool")]
    pub lifecycle: Lifecycle,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BoardColumn {
    /// Inserts a live column at `order_index`
    pub async fn insert(
        conn: &mut PgConnection,
        board_id: Uuid,
        name: &str,
        order_index: i32,
    ) -> Result<Self, sqlx::Error> {
        let column = sqlx::query_as::<_, BoardColumn>(
            r#"
            INSERT INTO board_columns (board_id, name, order_index)
            VALUES ($1, $2, $3)
            RETURNING id, board_id, name, order_index, is_deleted, created_at, updated_at
            "#,
        )
        .bind(board_id)
        .bind(name)
        .bind(order_index)
        .fetch_one(&mut *conn)
        .await?;

        Ok(column)
    }

    /// Finds a live column whose board is owned by `owner`
    ///
    /// # Returns
    ///
    /// `None` if the column does not exist, is soft-deleted, or belongs to a
    /// board owned by someone else
    pub async fn find_live_owned(
        conn: &mut PgConnection,
        id: Uuid,
        owner: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let column = sqlx::query_as::<_, BoardColumn>(
            r#"
            SELECT c.id, c.board_id, c.name, c.order_index, c.is_deleted,
                   c.created_at, c.updated_at
            FROM board_columns c
            JOIN boards b ON b.id = c.board_id
            WHERE c.id = $1 AND c.is_deleted = FALSE AND b.created_by = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(column)
    }

    /// Lists the live columns of the given boards, ordered by board then index
    pub async fn list_live_by_boards(
        pool: &PgPool,
        board_ids: &[Uuid],
    ) -> Result<Vec<Self>, sqlx::Error> {
        if board_ids.is_empty() {
            return Ok(Vec::new());
        }

        let columns = sqlx::query_as::<_, BoardColumn>(
            r#"
            SELECT id, board_id, name, order_index, is_deleted, created_at, updated_at
            FROM board_columns
            WHERE board_id = ANY($1) AND is_deleted = FALSE
            ORDER BY board_id, order_index
            "#,
        )
        .bind(board_ids)
        .fetch_all(pool)
        .await?;

        Ok(columns)
    }

    /// Renames a column and bumps `updated_at`
    pub async fn rename(
        conn: &mut PgConnection,
        id: Uuid,
        name: &str,
    ) -> Result<Self, sqlx::Error> {
        let column = sqlx::query_as::<_, BoardColumn>(
            r#"
            UPDATE board_columns
            SET name = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, board_id, name, order_index, is_deleted, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .fetch_one(&mut *conn)
        .await?;

        Ok(column)
    }

    /// Places a column at `order_index` and bumps `updated_at`
    pub async fn set_index(
        conn: &mut PgConnection,
        id: Uuid,
        order_index: i32,
    ) -> Result<Self, sqlx::Error> {
        let column = sqlx::query_as::<_, BoardColumn>(
            r#"
            UPDATE board_columns
            SET order_index = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, board_id, name, order_index, is_deleted, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(order_index)
        .fetch_one(&mut *conn)
        .await?;

        Ok(column)
    }

    /// Flags a column deleted, leaving its `order_index` frozen
    pub async fn mark_deleted(conn: &mut PgConnection, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE board_columns
            SET is_deleted = TRUE, updated_at = NOW()
            WHERE id = $1 AND is_deleted = FALSE
            "#,
        )
        .bind(id)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
