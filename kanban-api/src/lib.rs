//! # Kanban API Server Library
//!
//! HTTP surface of the Kanban service. Ordering and ownership rules live in
//! `kanban_shared::service`; this crate maps them onto routes.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration from the environment
//! - `error`: Error handling and HTTP response mapping
//! - `middleware`: Tower middleware
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
