//! Board model and database operations
//!
//! A board belongs to exactly one user (`created_by`). Every lookup here is
//! scoped by owner, so a board owned by someone else is indistinguishable
//! from one that does not exist.
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE boards (
//!     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
//!     name VARCHAR(255) NOT NULL,
//!     description TEXT,
//!     created_by UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

/// A board and its metadata (columns are loaded separately)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Board {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,

    /// Owning user
    pub created_by: Uuid,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Board {
    /// Inserts a new board owned by `owner`
    pub async fn insert(
        conn: &mut PgConnection,
        owner: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> Result<Self, sqlx::Error> {
        let board = sqlx::query_as::<_, Board>(
            r#"
            INSERT INTO boards (name, description, created_by)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, created_by, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(owner)
        .fetch_one(&mut *conn)
        .await?;

        Ok(board)
    }

    /// Finds a board by ID if `owner` owns it
    ///
    /// # Returns
    ///
    /// `None` when the board does not exist or belongs to another user
    pub async fn find_owned(
        conn: &mut PgConnection,
        id: Uuid,
        owner: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let board = sqlx::query_as::<_, Board>(
            r#"
            SELECT id, name, description, created_by, created_at, updated_at
            FROM boards
            WHERE id = $1 AND created_by = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(board)
    }

    /// Lists every board owned by `owner`, oldest first
    pub async fn list_by_owner(pool: &PgPool, owner: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let boards = sqlx::query_as::<_, Board>(
            r#"
            SELECT id, name, description, created_by, created_at, updated_at
            FROM boards
            WHERE created_by = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(owner)
        .fetch_all(pool)
        .await?;

        Ok(boards)
    }
}
