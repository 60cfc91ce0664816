//! Authentication utilities
//!
//! # Modules
//!
//! - [`password`]: Argon2id password hashing and verification
//! - [`jwt`]: HS256 access tokens
//! - [`middleware`]: bearer-token extraction and the per-request [`middleware::AuthContext`]
//!
//! # Example
//!
//! ```no_run
//! use kanban_shared::auth::password::{hash_password, verify_password};
//! use kanban_shared::auth::jwt::{create_token, Claims};
//! use chrono::Duration;
//! use uuid::Uuid;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let hash = hash_password("user_password")?;
//! assert!(verify_password("user_password", &hash)?);
//!
//! let claims = Claims::new(Uuid::new_v4(), Duration::minutes(30));
//! let token = create_token(&claims, "a-secret-key-of-at-least-32-bytes")?;
//! # Ok(())
//! # }
//! ```

pub mod jwt;
pub mod middleware;
pub mod password;
