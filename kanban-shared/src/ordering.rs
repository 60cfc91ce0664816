//! Ordering engine for columns within a board and tasks within a column
//!
//! Every sibling set (the non-deleted columns of one board, or the non-deleted
//! tasks of one column) keeps its `order_index` values contiguous: `0..n-1`,
//! no gaps, no duplicates. Soft-deleted rows are outside every set.
//!
//! The engine is split in two halves:
//!
//! - **Planning** (pure): given current indices and a requested target, compute
//!   the final index of the item and the [`RangeShift`]s the siblings need.
//! - **Applying**: run each planned shift as one conditional bulk `UPDATE`
//!   against the set, inside the caller's transaction.
//!
//! # Operations
//!
//! ```text
//! append          index = live count
//! move within     current < target: (current, target] -= 1
//!                 target < current: [target, current) += 1
//! move across     source: (source_index, ..) -= 1
//!                 target: [target_index, ..) += 1
//! soft delete     (deleted_index, ..) -= 1
//! ```
//!
//! Targets are clamped to the valid range of the destination set, so an
//! out-of-range request lands at the nearest end instead of opening a gap.
//!
//! # Example
//!
//! ```
//! use kanban_shared::ordering::{plan_move_within, RangeShift, WithinMove};
//!
//! // Four live siblings, move the one at index 1 to index 3.
//! let plan = plan_move_within(1, 3, 4);
//! assert_eq!(
//!     plan,
//!     WithinMove::Shift {
//!         shift: RangeShift::between(2, 3, -1),
//!         index: 3,
//!     }
//! );
//! ```

use sqlx::PgConnection;
use uuid::Uuid;

/// A set of live siblings sharing one parent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SiblingSet {
    /// Non-deleted columns of a board
    BoardColumns(Uuid),

    /// Non-deleted tasks of a column
    ColumnTasks(Uuid),
}

impl SiblingSet {
    /// Parent entity id (board id or column id)
    pub fn parent_id(&self) -> Uuid {
        match self {
            SiblingSet::BoardColumns(id) | SiblingSet::ColumnTasks(id) => *id,
        }
    }

    fn count_sql(&self) -> &'static str {
        match self {
            SiblingSet::BoardColumns(_) => {
                "SELECT COUNT(*) FROM board_columns WHERE board_id = $1 AND is_deleted = FALSE"
            }
            SiblingSet::ColumnTasks(_) => {
                "SELECT COUNT(*) FROM tasks WHERE column_id = $1 AND is_deleted = FALSE"
            }
        }
    }

    fn shift_sql(&self) -> &'static str {
        match self {
            SiblingSet::BoardColumns(_) => {
                r#"
                UPDATE board_columns
                SET order_index = order_index + $2
                WHERE board_id = $1
                  AND is_deleted = FALSE
                  AND order_index >= $3
                  AND ($4::INTEGER IS NULL OR order_index <= $4)
                "#
            }
            SiblingSet::ColumnTasks(_) => {
                r#"
                UPDATE tasks
                SET order_index = order_index + $2
                WHERE column_id = $1
                  AND is_deleted = FALSE
                  AND order_index >= $3
                  AND ($4::INTEGER IS NULL OR order_index <= $4)
                "#
            }
        }
    }

    fn lock_sql(&self) -> &'static str {
        match self {
            SiblingSet::BoardColumns(_) => "SELECT id FROM boards WHERE id = $1 FOR UPDATE",
            SiblingSet::ColumnTasks(_) => "SELECT id FROM board_columns WHERE id = $1 FOR UPDATE",
        }
    }
}

/// A conditional bulk shift: every live sibling whose index lies in
/// `lower..=upper` (unbounded above when `upper` is `None`) moves by `delta`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeShift {
    /// Inclusive lower bound
    pub lower: i32,

    /// Inclusive upper bound, `None` for "to the end of the set"
    pub upper: Option<i32>,

    /// Amount added to each matching index (+1 or -1)
    pub delta: i32,
}

impl RangeShift {
    /// Shift every index in `lower..=upper` by `delta`
    pub fn between(lower: i32, upper: i32, delta: i32) -> Self {
        Self {
            lower,
            upper: Some(upper),
            delta,
        }
    }

    /// Shift every index `>= lower` by `delta`
    pub fn from(lower: i32, delta: i32) -> Self {
        Self {
            lower,
            upper: None,
            delta,
        }
    }

    /// Whether a sibling at `index` is affected
    pub fn contains(&self, index: i32) -> bool {
        index >= self.lower && self.upper.map_or(true, |upper| index <= upper)
    }

    /// New index for a sibling currently at `index`
    pub fn apply(&self, index: i32) -> i32 {
        if self.contains(index) {
            index + self.delta
        } else {
            index
        }
    }
}

/// Outcome of planning a move inside one sibling set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WithinMove {
    /// Target equals the current index; nothing changes
    Unchanged,

    /// Siblings take `shift`, then the item takes `index`
    Shift { shift: RangeShift, index: i32 },
}

/// Plan for moving an item from one sibling set into another
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcrossMove {
    /// Closes the gap left in the source set
    pub close_source: RangeShift,

    /// Opens a slot in the target set
    pub open_target: RangeShift,

    /// Final index of the item in the target set
    pub index: i32,
}

fn count_to_index(count: i64) -> i32 {
    i32::try_from(count.max(0)).unwrap_or(i32::MAX)
}

/// Index for a new item appended after `live_count` siblings
pub fn append_index(live_count: i64) -> i32 {
    count_to_index(live_count)
}

/// Clamps a requested index into `0..=max_index`
pub fn clamp_target(requested: i32, max_index: i32) -> i32 {
    requested.clamp(0, max_index.max(0))
}

/// Plans a move inside one set
///
/// `live_count` includes the item being moved, so the highest valid target is
/// `live_count - 1`.
pub fn plan_move_within(current: i32, requested: i32, live_count: i64) -> WithinMove {
    let target = clamp_target(requested, count_to_index(live_count) - 1);

    if target == current {
        WithinMove::Unchanged
    } else if target > current {
        WithinMove::Shift {
            shift: RangeShift::between(current + 1, target, -1),
            index: target,
        }
    } else {
        WithinMove::Shift {
            shift: RangeShift::between(target, current - 1, 1),
            index: target,
        }
    }
}

/// Plans a move from one set into another
///
/// `target_live_count` excludes the item, so appending at the end
/// (`target_live_count`) is the highest valid target.
pub fn plan_move_across(source_index: i32, requested: i32, target_live_count: i64) -> AcrossMove {
    let index = clamp_target(requested, count_to_index(target_live_count));

    AcrossMove {
        close_source: RangeShift::from(source_index + 1, -1),
        open_target: RangeShift::from(index, 1),
        index,
    }
}

/// Shift that closes the gap left by soft-deleting the item at `deleted_index`
pub fn plan_soft_delete(deleted_index: i32) -> RangeShift {
    RangeShift::from(deleted_index + 1, -1)
}

/// Locks the parent row of a set for the rest of the transaction
///
/// Concurrent mutations of the same set queue behind this lock, so each one
/// plans against indices the previous one committed.
///
/// A missing parent locks nothing; the caller's ownership lookup reports it.
pub async fn lock_set(conn: &mut PgConnection, set: SiblingSet) -> Result<(), sqlx::Error> {
    sqlx::query(set.lock_sql())
        .bind(set.parent_id())
        .execute(&mut *conn)
        .await?;

    Ok(())
}

/// Counts the live members of a set
pub async fn live_count(conn: &mut PgConnection, set: SiblingSet) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as(set.count_sql())
        .bind(set.parent_id())
        .fetch_one(&mut *conn)
        .await?;

    Ok(count)
}

/// Applies one planned shift to the live members of a set
///
/// Returns the number of siblings whose index changed.
pub async fn apply_shift(
    conn: &mut PgConnection,
    set: SiblingSet,
    shift: RangeShift,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(set.shift_sql())
        .bind(set.parent_id())
        .bind(shift.delta)
        .bind(shift.lower)
        .bind(shift.upper)
        .execute(&mut *conn)
        .await?;

    tracing::debug!(
        parent_id = %set.parent_id(),
        lower = shift.lower,
        upper = ?shift.upper,
        delta = shift.delta,
        rows = result.rows_affected(),
        "Applied order shift"
    );

    Ok(result.rows_affected())
}
