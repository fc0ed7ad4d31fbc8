/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use projecthub_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = projecthub_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, notify::Notifier, realtime::ProjectChannels};
use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{delete, get, post, put},
    Router,
};
use projecthub_shared::{
    auth::{
        jwt,
        middleware::{AuthError, CurrentUser},
    },
    models::user::User,
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
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Live update fan-out registry
    pub channels: Arc<ProjectChannels>,

    /// Notification dispatcher
    pub notifier: Notifier,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            notifier: Notifier::new(db.clone()),
            db,
            config: Arc::new(config),
            channels: Arc::new(ProjectChannels::new()),
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// The router is organized as follows:
/// ```text
/// /
/// ├── /health                      # Health check (public)
/// └── /api/
///     ├── /auth/                   # Authentication (public)
///     ├── /users/                  # Profile and user search
///     ├── /teams/                  # Teams and rosters
///     ├── /projects/               # Projects and project rosters
///     ├── /tasks/                  # Tasks and lifecycle events
///     ├── /notifications/          # Per-user inbox
///     ├── /roles/                  # Role catalog
///     └── /ws/:project_id          # Live updates (token via query)
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Authentication (per-route basis)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth routes (public, no auth required)
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh));

    let user_routes = Router::new()
        .route("/me", get(routes::users::me))
        .route("/me", put(routes::users::update_me))
        .route("/search", get(routes::users::search))
        .route("/:id", get(routes::users::get_user));

    let team_routes = Router::new()
        .route("/", post(routes::teams::create_team))
        .route("/", get(routes::teams::list_teams))
        .route("/:id", get(routes::teams::get_team))
        .route("/:id", put(routes::teams::update_team))
        .route("/:id", delete(routes::teams::delete_team))
        .route("/:id/members", get(routes::teams::list_members))
        .route("/:id/members", post(routes::teams::add_member))
        .route("/:id/members/search", get(routes::teams::search_members))
        .route("/:id/members/:user_id", delete(routes::teams::remove_member))
        .route("/:id/projects", get(routes::projects::list_team_projects));

    let project_routes = Router::new()
        .route("/", post(routes::projects::create_project))
        .route("/", get(routes::projects::list_projects))
        .route("/personal", get(routes::projects::list_personal_projects))
        .route("/:id", get(routes::projects::get_project))
        .route("/:id", delete(routes::projects::delete_project))
        .route("/:id/members", get(routes::project_members::list_members))
        .route("/:id/members", post(routes::project_members::add_member))
        .route(
            "/:id/members/:user_id",
            put(routes::project_members::change_role)
                .delete(routes::project_members::remove_member),
        );

    let task_routes = Router::new()
        .route("/", post(routes::tasks::create_task))
        .route("/my", get(routes::tasks::my_tasks))
        .route("/personal", get(routes::tasks::personal_tasks))
        .route("/project/:project_id", get(routes::tasks::project_tasks))
        .route(
            "/project/:project_id/pending-approval",
            get(routes::tasks::pending_approval),
        )
        .route("/:id", get(routes::tasks::get_task))
        .route("/:id", put(routes::tasks::update_task))
        .route("/:id", delete(routes::tasks::delete_task))
        .route("/:id/submit", post(routes::tasks::submit_task))
        .route("/:id/recall", post(routes::tasks::recall_task))
        .route("/:id/approve", post(routes::tasks::approve_task))
        .route("/:id/request-changes", post(routes::tasks::request_changes))
        .route("/:id/reopen", post(routes::tasks::reopen_task))
        .route("/:id/complete-personal", post(routes::tasks::complete_task))
        .route("/:id/content", post(routes::tasks::save_content));

    let notification_routes = Router::new()
        .route("/", get(routes::notifications::list_notifications))
        .route("/unread-count", get(routes::notifications::unread_count))
        .route("/read-all", post(routes::notifications::mark_all_read))
        .route("/:id/read", post(routes::notifications::mark_read));

    let role_routes = Router::new()
        .route("/", get(routes::roles::list_roles))
        .route("/:id", get(routes::roles::get_role));

    // Everything except auth requires a valid bearer token
    let protected = Router::new()
        .nest("/users", user_routes)
        .nest("/teams", team_routes)
        .nest("/projects", project_routes)
        .nest("/tasks", task_routes)
        .nest("/notifications", notification_routes)
        .nest("/roles", role_routes)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    // WebSocket endpoint authenticates via query token inside the handler
    let ws_routes = Router::new().route("/ws/:project_id", get(routes::ws::project_updates));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .merge(protected)
        .merge(ws_routes);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        // Production mode: configure allowed origins
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
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
    };

    // Combine all routes with middleware stack
    Router::new()
        .merge(health_routes)
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// JWT authentication middleware layer
///
/// Extracts and validates the bearer token, loads the user from the
/// database, and injects [`CurrentUser`] into request extensions.
/// Tokens for deleted or deactivated users are rejected.
async fn jwt_auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, crate::error::ApiError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

    let claims = jwt::validate_access_token(token, state.jwt_secret())
        .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

    let user = User::find_by_id(&state.db, claims.sub)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?
        .filter(|u| u.is_active)
        .ok_or(AuthError::UnknownUser)?;

    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}
