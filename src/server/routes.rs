//! Router configuration for the classroom API.
//!
//! This module defines the HTTP routes and applies middleware for session
//! authentication, CORS and request tracing.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                          - Welcome message (public)
//! GET  /healthcheck               - Plain-text health check (public)
//! GET  /health                    - JSON health check (public)
//! GET  /classrooms/most-visited   - Top five by visits (public)
//! GET  /classrooms/{code}         - Lookup, counts a visit (public)
//! POST /classrooms                - Register (admin session)
//! POST /login                     - Issue admin session cookie (public)
//! *                               - 404 JSON fallback
//! ```
//!
//! # Example
//!
//! ```ignore
//! use where_is_this_class::server::routes::{create_router, RouterConfig};
//! use where_is_this_class::store::PgClassroomStore;
//!
//! let store = PgClassroomStore::connect(&database_url, 10).await?;
//! let config = RouterConfig::new("admin-password", "signing-key")
//!     .with_cors_origins(vec!["https://campus.example.com".to_string()]);
//!
//! let router = create_router(store, config);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, router).await?;
//! ```

use std::time::Duration;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, ORIGIN};
use http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use super::auth::{session_middleware, AdminPassword, SessionAuth};
use super::handlers::{
    health_handler, healthcheck_handler, login_handler, lookup_handler, most_visited_handler,
    not_found_handler, register_handler, welcome_handler, AppState,
};
use crate::store::ClassroomStore;

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Clone)]
pub struct RouterConfig {
    /// Password accepted by `POST /login`
    pub admin_password: String,

    /// Key used to sign admin session tokens
    pub session_secret: String,

    /// Allowed CORS origins (None = allow any origin, without credentials)
    pub cors_origins: Option<Vec<String>>,

    /// Whether session cookies carry the `Secure` attribute
    pub secure_cookies: bool,

    /// Whether to enable request tracing
    pub enable_tracing: bool,
}

impl RouterConfig {
    /// Create a new router configuration.
    ///
    /// By default:
    /// - CORS allows any origin
    /// - Session cookies are `Secure`
    /// - Tracing is enabled
    pub fn new(admin_password: impl Into<String>, session_secret: impl Into<String>) -> Self {
        Self {
            admin_password: admin_password.into(),
            session_secret: session_secret.into(),
            cors_origins: None,
            secure_cookies: true,
            enable_tracing: true,
        }
    }

    /// Set specific allowed CORS origins.
    ///
    /// Credentialed requests (the session cookie) are only allowed for
    /// explicitly listed origins. Pass an empty vec to disallow all
    /// cross-origin requests.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    /// Enable or disable the `Secure` cookie attribute.
    ///
    /// **Warning**: only disable for plain-HTTP local development.
    pub fn with_secure_cookies(mut self, secure: bool) -> Self {
        self.secure_cookies = secure;
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the main application router.
///
/// This function builds the complete Axum router with:
/// - Public routes (welcome, health checks, lookups, ranking, login)
/// - The session-gated registration route
/// - A JSON 404 fallback
/// - CORS configuration
/// - Request tracing (optional)
pub fn create_router<S>(store: S, config: RouterConfig) -> Router
where
    S: ClassroomStore + 'static,
{
    let sessions = SessionAuth::new(&config.session_secret);
    let app_state = AppState::new(
        store,
        sessions.clone(),
        AdminPassword::new(&config.admin_password),
    )
    .with_secure_cookies(config.secure_cookies);

    let cors = build_cors_layer(&config);

    // Only registration sits behind the session gate
    let protected_routes = Router::new()
        .route("/classrooms", post(register_handler::<S>))
        .route_layer(middleware::from_fn_with_state(sessions, session_middleware))
        .with_state(app_state.clone());

    let public_routes = Router::new()
        .route("/", get(welcome_handler))
        .route("/healthcheck", get(healthcheck_handler))
        .route("/health", get(health_handler))
        .route("/classrooms/most-visited", get(most_visited_handler::<S>))
        .route("/classrooms/{code}", get(lookup_handler::<S>))
        .route("/login", post(login_handler::<S>))
        .with_state(app_state);

    let router = Router::new()
        .merge(protected_routes)
        .merge(public_routes)
        .fallback(not_found_handler)
        .layer(cors);

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Build the CORS layer based on configuration.
fn build_cors_layer(config: &RouterConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([ORIGIN, CONTENT_TYPE, ACCEPT, AUTHORIZATION])
        .max_age(Duration::from_secs(86400)); // 24 hours

    match &config.cors_origins {
        None => cors.allow_origin(Any),
        Some(origins) if origins.is_empty() => {
            // No origins allowed - this effectively disables CORS
            cors
        }
        Some(origins) => {
            let parsed_origins: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|o| match o.parse() {
                    Ok(origin) => Some(origin),
                    Err(_) => {
                        warn!(origin = %o, "Ignoring invalid CORS origin");
                        None
                    }
                })
                .collect();
            cors.allow_origin(parsed_origins).allow_credentials(true)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
