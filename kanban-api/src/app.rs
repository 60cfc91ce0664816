//! Application state and router builder
//!
//! # Example
//!
//! ```no_run
//! use kanban_api::{app::{build_router, AppState}, config::Config};
//! use sqlx::PgPool;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::from_env()?;
//! let pool = PgPool::connect(&config.database.url).await?;
//! let app = build_router(AppState::new(pool, config));
//! # Ok(())
//! # }
//! ```

use crate::{config::Config, error::ApiError, middleware::security::SecurityHeadersLayer};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post, put},
    Router,
};
use kanban_shared::{auth::middleware::authenticate, models::user::User};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state, cloned into every handler
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Routes
///
/// ```text
/// /health                                   GET    (public)
/// /api/v1/auth/register                     POST   (public)
/// /api/v1/auth/token                        POST   (public)
/// /api/v1/auth/me                           GET
/// /api/v1/users/assignable                  GET
/// /api/v1/boards                            GET POST
/// /api/v1/boards/:board_id                  GET
/// /api/v1/boards/:board_id/columns          POST
/// /api/v1/boards/:board_id/columns/:id      PUT DELETE
/// /api/v1/boards/:board_id/columns/:id/move PUT
/// /api/v1/tasks                             POST
/// /api/v1/tasks/:task_id                    PUT DELETE
/// /api/v1/tasks/:task_id/move               PUT
/// ```
///
/// # Middleware Stack
///
/// Outermost first: security headers, CORS, request tracing, then JWT
/// authentication on the protected routes.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let public_auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/token", post(routes::auth::token));

    let protected_routes = Router::new()
        .route("/auth/me", get(routes::auth::me))
        .route("/users/assignable", get(routes::users::list_assignable))
        .route(
            "/boards",
            get(routes::boards::list_boards).post(routes::boards::create_board),
        )
        .route("/boards/:board_id", get(routes::boards::get_board))
        .route("/boards/:board_id/columns", post(routes::boards::add_column))
        .route(
            "/boards/:board_id/columns/:column_id",
            put(routes::boards::rename_column).delete(routes::boards::delete_column),
        )
        .route(
            "/boards/:board_id/columns/:column_id/move",
            put(routes::boards::move_column),
        )
        .route("/tasks", post(routes::tasks::create_task))
        .route(
            "/tasks/:task_id",
            put(routes::tasks::update_task).delete(routes::tasks::delete_task),
        )
        .route("/tasks/:task_id/move", put(routes::tasks::move_task))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let v1_routes = Router::new()
        .nest("/auth", public_auth_routes)
        .merge(protected_routes);

    Router::new()
        .merge(health_routes)
        .nest("/api/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config.api.cors_origins))
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

/// CORS for the configured origins; `*` anywhere in the list is permissive
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}

/// Validates the bearer token and inserts `AuthContext` and the caller's
/// `User` into extensions
///
/// A well-signed token whose subject no longer exists is rejected like a bad
/// token.
async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth = authenticate(req.headers(), state.jwt_secret())?;

    let user = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| {
            tracing::debug!(user_id = %auth.user_id, "Token subject does not exist");
            ApiError::Unauthorized("Could not validate credentials".to_string())
        })?;

    req.extensions_mut().insert(auth);
    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}
