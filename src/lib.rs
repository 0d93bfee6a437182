//! # Where Is This Class
//!
//! A small HTTP service that maps a physical classroom code (e.g. `A204`) to
//! human-readable location information (building, floor, directions) in
//! English, Turkish or Arabic, and ranks classrooms by how often they are
//! looked up.
//!
//! ## Features
//!
//! - **Lookup**: `GET /classrooms/{code}?language=en` returns directions and
//!   counts the visit in the same transaction
//! - **Registration**: `POST /classrooms` stores a classroom and all of its
//!   translations atomically
//! - **Ranking**: `GET /classrooms/most-visited` returns the top five codes
//! - **Admin sessions**: `POST /login` exchanges the admin password for a
//!   signed, 24-hour, HTTP-only session cookie that gates registration
//!
//! ## Architecture
//!
//! - [`classroom`] - Data model, code normalization and the language set
//! - [`validate`] - Registration payload validation
//! - [`store`] - The [`ClassroomStore`] trait and its PostgreSQL implementation
//! - [`server`] - Axum handlers, session auth and router
//! - [`config`] - CLI and environment configuration
//! - [`error`] - Error types
//!
//! ## Example
//!
//! ```rust,no_run
//! use where_is_this_class::{create_router, PgClassroomStore, RouterConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = PgClassroomStore::connect("postgres://localhost/classrooms", 10).await?;
//!     let router = create_router(store, RouterConfig::new("admin-password", "signing-key"));
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//!     axum::serve(listener, router).await?;
//!     Ok(())
//! }
//! ```

pub mod classroom;
pub mod config;
pub mod error;
pub mod server;
pub mod store;
pub mod validate;

// Re-export commonly used types
pub use classroom::{
    normalize_code, ClassroomInfo, Language, NewClassroom, NewTranslation, VisitCount,
    MAX_CODE_LENGTH, MOST_VISITED_LIMIT,
};
pub use config::Config;
pub use error::{ApiError, StoreError, ValidationError};
pub use server::{
    create_router, session_middleware, AdminPassword, AppState, AuthError, ErrorResponse,
    RouterConfig, SessionAuth, SESSION_COOKIE, SESSION_TTL,
};
pub use store::{ClassroomStore, PgClassroomStore};
pub use validate::{validate_registration, RegisterClassroomRequest, TranslationRequest};
