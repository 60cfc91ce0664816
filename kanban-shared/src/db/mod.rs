//! Database layer
//!
//! # Modules
//!
//! - `pool`: PostgreSQL connection pool and health check
//! - `migrations`: embedded schema migrations
//!
//! Table models live in the crate-level `models` module.

pub mod migrations;
pub mod pool;
