//! Board/task aggregate service
//!
//! Composes ownership checks, the [`crate::ordering`] engine and the models
//! into transactional operations. Every function takes the caller's user id;
//! anything not reachable through a board that user owns is reported as
//! [`ServiceError::NotFound`].
//!
//! # Example
//!
//! ```no_run
//! use kanban_shared::service::{self, NewBoard};
//! # use sqlx::PgPool;
//! # use uuid::Uuid;
//! # async fn example(pool: PgPool, owner: Uuid) -> Result<(), service::ServiceError> {
//! let board = service::create_board(
//!     &pool,
//!     owner,
//!     NewBoard {
//!         name: "Launch".to_string(),
//!         description: None,
//!         columns: vec!["Todo".into(), "Doing".into(), "Done".into()],
//!     },
//! )
//! .await?;
//!
//! let done = board.columns[2].column.id;
//! service::move_column(&pool, owner, board.board.id, done, 0).await?;
//! # Ok(())
//! # }
//! ```

pub mod boards;
pub mod error;
pub mod tasks;
pub mod views;

pub use boards::{
    add_column, create_board, delete_column, get_board, list_boards, move_column, rename_column,
    NewBoard,
};
pub use error::{ServiceError, ServiceResult};
pub use tasks::{create_task, delete_task, move_task, update_task};
pub use views::{BoardView, ColumnView, TaskView};
