//! Application state and router builder.
//!
//! Defines the shared application state and builds the Axum router with all
//! routes and middleware.
//!
//! # Example
//!
//! ```no_run
//! use taskhub_api::{app::{build_router, AppState}, config::Config};
//! use sqlx::postgres::PgPoolOptions;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::from_env()?;
//! let pool = PgPoolOptions::new().connect(&config.database.url).await?;
//! let state = AppState::new(pool, config);
//!
//! let app = build_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, patch, post},
    Router,
};
use chrono::Duration;
use sqlx::PgPool;
use std::sync::Arc;
use taskhub_shared::auth::{middleware::require_bearer, service::AuthService, token::TokenIssuer};
use taskhub_shared::tasks::TaskService;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::config::Config;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Token issuer shared with the auth middleware
    pub tokens: Arc<TokenIssuer>,

    /// Registration and login operations
    pub auth: AuthService,

    /// Task CRUD operations
    pub tasks: TaskService,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        let tokens = Arc::new(TokenIssuer::new(
            &config.auth.jwt_secret,
            Duration::minutes(config.auth.token_ttl_minutes),
        ));

        Self {
            auth: AuthService::new(db.clone(), tokens.clone()),
            tasks: TaskService::new(db.clone()),
            db,
            config: Arc::new(config),
            tokens,
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// The router is organized as follows:
/// ```text
/// /
/// ├── GET  /                    # Service banner (public)
/// ├── GET  /health              # Health check (public)
/// ├── /auth/                    # Authentication endpoints (public)
/// │   ├── POST /register
/// │   └── POST /login
/// └── /tasks/                   # Task endpoints (bearer token required)
///     ├── POST   /
///     ├── GET    /
///     ├── GET    /:id
///     ├── PUT    /:id
///     ├── DELETE /:id
///     └── PATCH  /:id/status
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Authentication (on the task group only)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Service banner and health check (public, no auth)
    let health_routes = Router::new()
        .route("/", get(routes::health::root))
        .route("/health", get(routes::health::health_check));

    // Auth routes (public, no auth required)
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login));

    // Task routes (require a valid bearer token)
    let task_routes = Router::new()
        .route("/", post(routes::tasks::create_task))
        .route("/", get(routes::tasks::list_tasks))
        .route("/:id", get(routes::tasks::get_task))
        .route("/:id", axum::routing::put(routes::tasks::update_task))
        .route("/:id", axum::routing::delete(routes::tasks::delete_task))
        .route("/:id/status", patch(routes::tasks::set_task_status))
        .layer(axum::middleware::from_fn(require_bearer(
            state.tokens.clone(),
        )));

    // Configure CORS based on environment
    let origins = &state.config.api.cors_origins;
    let cors = if origins.is_empty() || origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        // Production mode: configure allowed origins
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
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    // Combine all routes with middleware stack
    Router::new()
        .merge(health_routes)
        .nest("/auth", auth_routes)
        .nest("/tasks", task_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}
