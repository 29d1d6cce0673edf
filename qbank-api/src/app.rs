/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use qbank_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = qbank_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{
    config::Config,
    error::ApiError,
    middleware::{
        security::SecurityHeadersLayer,
        session::{require_admin, require_login},
    },
};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned into every handler through axum's `State` extractor.
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

    /// Key that signs session tokens
    pub fn session_secret(&self) -> &str {
        &self.config.session.secret
    }

    /// Whether session cookies carry the `Secure` flag
    pub fn secure_cookies(&self) -> bool {
        self.config.api.production
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// ```text
/// /
/// ├── GET  /health                      public
/// ├── GET  /                            public
/// ├── POST /login                       public
/// ├── GET|POST /logout                  public
/// ├── GET  /dashboard                   login
/// ├── POST /submit-interview            login
/// ├── GET  /question-bank               login
/// ├── GET  /api/submissions             login
/// ├── GET  /api/questions/:id           login
/// ├── GET  /admin/dashboard             admin
/// └── POST /admin/bulk-update           admin
/// ```
///
/// Guards are layered onto each protected router explicitly.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let public_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/", get(routes::auth::index))
        .route("/login", post(routes::auth::login))
        .route("/logout", get(routes::auth::logout).post(routes::auth::logout));

    let member_routes = Router::new()
        .route("/dashboard", get(routes::auth::dashboard))
        .route("/submit-interview", post(routes::interviews::submit_interview))
        .route("/question-bank", get(routes::interviews::question_bank))
        .route("/api/submissions", get(routes::interviews::list_submissions))
        .route(
            "/api/questions/:submission_id",
            get(routes::interviews::submission_questions),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_login,
        ));

    let admin_routes = Router::new()
        .route("/dashboard", get(routes::admin::dashboard))
        .route(
            "/bulk-update",
            post(routes::admin::bulk_update)
                .layer(DefaultBodyLimit::max(state.config.api.max_upload_bytes)),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_admin,
        ));

    let cors = if state.config.api.cors_origins.iter().any(|o| o == "*") {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(public_routes)
        .merge(member_routes)
        .nest("/admin", admin_routes)
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

async fn not_found() -> ApiError {
    ApiError::NotFound("Page not found".to_string())
}
