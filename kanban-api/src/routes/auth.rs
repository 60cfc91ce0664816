//! Authentication endpoints
//!
//! - `POST /api/v1/auth/register` - create an account
//! - `POST /api/v1/auth/token` - exchange credentials for a bearer token
//! - `GET /api/v1/auth/me` - the authenticated user

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use kanban_shared::{
    auth::{jwt, password},
    models::user::{CreateUser, User, UserSummary},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

const INVALID_CREDENTIALS: &str = "Incorrect email or password";

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[validate(length(max = 255, message = "Name must be at most 255 characters"))]
    pub full_name: Option<String>,
}

/// Token request
#[derive(Debug, Deserialize, Validate)]
pub struct TokenRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    pub password: String,
}

/// Token response
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,

    /// Always "bearer"
    pub token_type: String,

    pub user: UserSummary,
}

/// Register a new user
///
/// ```text
/// POST /api/v1/auth/register
///
/// { "email": "ada@example.com", "password": "correct horse", "full_name": "Ada" }
/// ```
///
/// Responds `201 Created` with the user summary.
///
/// # Errors
///
/// - `422 Unprocessable Entity`: invalid email or short password
/// - `409 Conflict`: email already registered
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<UserSummary>)> {
    req.validate()?;

    if User::find_by_email(&state.db, &req.email).await?.is_some() {
        return Err(ApiError::Conflict("Email already registered".to_string()));
    }

    let password_hash = password::hash_password(&req.password)?;

    // A concurrent registration can still win the race; the unique index
    // turns that into 409 as well.
    let user = User::create(
        &state.db,
        CreateUser {
            email: req.email,
            password_hash,
            full_name: req.full_name,
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok((StatusCode::CREATED, Json(UserSummary::from(&user))))
}

/// Issue an access token
///
/// ```text
/// POST /api/v1/auth/token
///
/// { "email": "ada@example.com", "password": "correct horse" }
/// ```
///
/// ```json
/// { "access_token": "eyJ...", "token_type": "bearer", "user": { ... } }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: unknown email or wrong password (same message for both)
pub async fn token(
    State(state): State<AppState>,
    Json(req): Json<TokenRequest>,
) -> ApiResult<Json<TokenResponse>> {
    req.validate()?;

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

    if !password::verify_password(&req.password, &user.password_hash)? {
        tracing::debug!(user_id = %user.id, "Password mismatch");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    let claims = jwt::Claims::new(user.id, state.config.jwt.access_token_ttl());
    let access_token = jwt::create_token(&claims, state.jwt_secret())?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
        user: UserSummary::from(&user),
    }))
}

/// The authenticated user, as loaded by the auth layer
pub async fn me(Extension(user): Extension<User>) -> Json<UserSummary> {
    Json(UserSummary::from(&user))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_validation() {
        let ok = RegisterRequest {
            email: "ada@example.com".to_string(),
            password: "long-enough".to_string(),
            full_name: None,
        };
        assert!(ok.validate().is_ok());

        let bad = RegisterRequest {
            email: "not-an-email".to_string(),
            password: "short".to_string(),
            full_name: None,
        };
        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn test_token_response_shape() {
        let response = TokenResponse {
            access_token: "abc".to_string(),
            token_type: "bearer".to_string(),
            user: UserSummary {
                id: uuid::Uuid::nil(),
                email: "ada@example.com".to_string(),
                full_name: None,
            },
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["token_type"], "bearer");
        assert_eq!(json["user"]["email"], "ada@example.com");
    }
}
