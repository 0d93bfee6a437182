//! HTTP server layer.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │     GET /classrooms/{code}    POST /classrooms    POST /login    │
//! │                                                                 │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────────┐  │
//! │  │  handlers   │  │    auth     │  │        routes           │  │
//! │  │ (requests)  │  │ (sessions)  │  │  (router config)        │  │
//! │  └─────────────┘  └─────────────┘  └─────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod handlers;
pub mod routes;

pub use auth::{
    session_middleware, AdminPassword, AuthError, SessionAuth, SESSION_COOKIE, SESSION_TTL,
};
pub use handlers::{
    health_handler, healthcheck_handler, login_handler, lookup_handler, most_visited_handler,
    not_found_handler, register_handler, welcome_handler, AppState, ErrorResponse,
    HealthResponse, LoginRequest, LookupQueryParams, WelcomeResponse,
};
pub use routes::{create_router, RouterConfig};
