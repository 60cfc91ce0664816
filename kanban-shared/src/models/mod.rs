//! Database models for the Kanban API
//!
//! Each model owns the SQL for its table. Functions that participate in a
//! multi-statement mutation take `&mut PgConnection` so the service layer can
//! run them inside one transaction; read-only listings take the pool.
//!
//! # Models
//!
//! - `user`: accounts, assignable users
//! - `board`: boards owned by one user
//! - `column`: ordered, soft-deletable columns of a board
//! - `task`: ordered, soft-deletable tasks of a column and their assignees

pub mod board;
pub mod column;
pub mod task;
pub mod user;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Lifecycle of a column or task
///
/// Stored as the `is_deleted` boolean column and serialized the same way, so
/// clients keep seeing `"is_deleted": false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Lifecycle {
    /// Visible and part of its sibling ordering
    #[default]
    Active,

    /// Soft-deleted; row and frozen `order_index` are kept
    Deleted,
}

impl Lifecycle {
    pub fn is_deleted(self) -> bool {
        matches!(self, Lifecycle::Deleted)
    }
}

impl From<bool> for Lifecycle {
    fn from(is_deleted: bool) -> Self {
        if is_deleted {
            Lifecycle::Deleted
        } else {
            Lifecycle::Active
        }
    }
}

impl Serialize for Lifecycle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bool(self.is_deleted())
    }
}

impl<'de> Deserialize<'de> for Lifecycle {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        bool::deserialize(deserializer).map(Lifecycle::from)
    }
}
