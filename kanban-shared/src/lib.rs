//! # Kanban Shared Library
//!
//! Domain logic for the Kanban API: persistence models, the ordering engine
//! that keeps columns and tasks contiguously indexed, the ownership-enforcing
//! board/task service, and authentication primitives.
//!
//! ## Module Organization
//!
//! - `auth`: password hashing, JWT, request authentication
//! - `db`: connection pool and migrations
//! - `models`: table models and their queries
//! - `ordering`: index planning and bulk shifts for sibling sets
//! - `service`: transactional board/column/task operations

pub mod auth;
pub mod db;
pub mod models;
pub mod ordering;
pub mod service;

/// Current version of the Kanban shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
