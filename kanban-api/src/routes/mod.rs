//! API route handlers, one module per resource
//!
//! - `health`: liveness and database probe
//! - `auth`: register, token, current user
//! - `users`: assignable users
//! - `boards`: boards and columns
//! - `tasks`: tasks

pub mod auth;
pub mod boards;
pub mod health;
pub mod tasks;
pub mod users;
