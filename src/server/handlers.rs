//! HTTP request handlers for the classroom API.
//!
//! # Endpoints
//!
//! - `GET /` - Welcome message
//! - `GET /healthcheck`, `GET /health` - Health checks
//! - `GET /classrooms/{code}?language=` - Look up a classroom (counts a visit)
//! - `GET /classrooms/most-visited` - Top five classrooms by visits
//! - `POST /classrooms` - Register a classroom (admin session required)
//! - `POST /login` - Exchange the admin password for a session cookie

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::classroom::{normalize_code, ClassroomInfo, VisitCount, MOST_VISITED_LIMIT};
use crate::error::{ApiError, ValidationError};
use crate::store::ClassroomStore;
use crate::validate::{parse_query_language, validate_registration, RegisterClassroomRequest};

use super::auth::{set_session_cookie, AdminPassword, AuthError, SessionAuth};

// =============================================================================
// Application State
// =============================================================================

/// Shared application state passed to all handlers via Axum's State extractor.
pub struct AppState<S: ClassroomStore> {
    /// Classroom storage
    pub store: Arc<S>,

    /// Session token issuer for `/login`
    pub sessions: SessionAuth,

    /// Configured admin password
    pub admin_password: AdminPassword,

    /// Whether session cookies carry the `Secure` attribute
    pub secure_cookies: bool,
}

impl<S: ClassroomStore> AppState<S> {
    pub fn new(store: S, sessions: SessionAuth, admin_password: AdminPassword) -> Self {
        Self {
            store: Arc::new(store),
            sessions,
            admin_password,
            secure_cookies: true,
        }
    }

    /// Enable or disable the `Secure` cookie attribute.
    pub fn with_secure_cookies(mut self, secure: bool) -> Self {
        self.secure_cookies = secure;
        self
    }
}

impl<S: ClassroomStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            sessions: self.sessions.clone(),
            admin_password: self.admin_password.clone(),
            secure_cookies: self.secure_cookies,
        }
    }
}

// =============================================================================
// Request Parameters
// =============================================================================

/// Query parameters for classroom lookups.
#[derive(Debug, Deserialize)]
pub struct LookupQueryParams {
    /// Target language (`en`, `tr` or `ar`)
    #[serde(default)]
    pub language: Option<String>,
}

/// Body of `POST /login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub password: Option<String>,
}

// =============================================================================
// Response Types
// =============================================================================

/// JSON error response returned for all error conditions.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error type identifier (e.g., "not_found", "validation_failed")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code (included for convenience)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ErrorResponse {
    /// Create a new error response with status code.
    pub fn with_status(
        error: impl Into<String>,
        message: impl Into<String>,
        status: StatusCode,
    ) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: Some(status.as_u16()),
        }
    }
}

/// Welcome message for `GET /`.
#[derive(Debug, Serialize)]
pub struct WelcomeResponse {
    pub message: String,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}

// =============================================================================
// Error Mapping
// =============================================================================

impl ApiError {
    /// HTTP status for this error kind.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::AlreadyExists { .. } => StatusCode::CONFLICT,
            ApiError::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_type(&self) -> &'static str {
        match self {
            ApiError::NotFound { .. } => "not_found",
            ApiError::AlreadyExists { .. } => "already_exists",
            ApiError::ValidationFailed(_) => "validation_failed",
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::Internal { .. } => "internal_error",
        }
    }
}

/// Convert ApiError to HTTP response.
///
/// Internal errors are logged with their operation, classroom code and
/// cause; the client only ever sees the generic message.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Unauthorized(auth_err) = self {
            return auth_err.into_response();
        }

        let status = self.status();
        let error_type = self.error_type();
        let message = self.to_string();

        match &self {
            ApiError::Internal {
                operation,
                code,
                detail,
            } => {
                error!(
                    error_type = error_type,
                    status = status.as_u16(),
                    operation = *operation,
                    code = code.as_deref().unwrap_or("-"),
                    "Server error: {}",
                    detail
                );
            }
            ApiError::NotFound { code } => {
                debug!(
                    error_type = error_type,
                    status = status.as_u16(),
                    code = code.as_str(),
                    "Classroom not found"
                );
            }
            ApiError::AlreadyExists { code } => {
                warn!(
                    error_type = error_type,
                    status = status.as_u16(),
                    code = code.as_str(),
                    "Classroom already exists"
                );
            }
            _ => {
                warn!(
                    error_type = error_type,
                    status = status.as_u16(),
                    "Client error: {}",
                    message
                );
            }
        }

        let error_response = ErrorResponse::with_status(error_type, message, status);
        (status, Json(error_response)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::ValidationFailed(ValidationError::MalformedBody(rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::ValidationFailed(ValidationError::MalformedRequest(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::ValidationFailed(ValidationError::MalformedRequest(rejection.body_text()))
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle `GET /`.
pub async fn welcome_handler() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: "Welcome to the Classroom API. Look up a room with \
                  GET /classrooms/{code}?language=en"
            .to_string(),
    })
}

/// Handle `GET /healthcheck`.
///
/// Returns `200 OK` with the plain-text body `OK`.
pub async fn healthcheck_handler() -> &'static str {
    "OK"
}

/// Handle `GET /health`.
///
/// # Response
///
/// `200 OK` with JSON body:
/// ```json
/// {
///   "status": "ok",
///   "version": "0.1.0"
/// }
/// ```
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Handle classroom lookups.
///
/// # Endpoint
///
/// `GET /classrooms/{code}?language={en|tr|ar}`
///
/// The code is normalized (uppercased, whitespace and literal `%20`
/// removed) before lookup. A successful lookup increments the classroom's
/// visit counter.
///
/// # Response
///
/// - `200 OK`: `{building, floor, imageUrl, description, detail}`
/// - `400 Bad Request`: `language` missing, or the path/query is malformed
/// - `404 Not Found`: No classroom with that code has a translation in that
///   language (including languages outside the supported set)
/// - `500 Internal Server Error`: Storage failure
pub async fn lookup_handler<S: ClassroomStore>(
    State(state): State<AppState<S>>,
    path: Result<Path<String>, PathRejection>,
    query: Result<Query<LookupQueryParams>, QueryRejection>,
) -> Result<Json<ClassroomInfo>, ApiError> {
    let Path(code) = path?;
    let Query(query) = query?;
    let code = normalize_code(&code);

    // No translation can exist outside the supported set, so this is a miss
    let language = match parse_query_language(query.language.as_deref()) {
        Ok(language) => language,
        Err(ValidationError::UnsupportedLanguage { .. }) => {
            return Err(ApiError::NotFound { code });
        }
        Err(e) => return Err(e.into()),
    };

    let classroom = state
        .store
        .find_classroom(&code, language)
        .await
        .map_err(|e| ApiError::from_store(e, "lookup").with_code(&code))?;

    Ok(Json(classroom))
}

/// Handle classroom registration.
///
/// # Endpoint
///
/// `POST /classrooms` (admin session cookie required)
///
/// # Request Body
///
/// ```json
/// {
///   "code": "A204",
///   "floor": 2,
///   "imageUrl": "https://cdn.example.com/a204.jpg",
///   "translations": [
///     {"language": "en", "building": "Engineering", "description": "...", "detail": "..."}
///   ]
/// }
/// ```
///
/// # Response
///
/// - `204 No Content`: Classroom and translations stored
/// - `400 Bad Request`: Validation failure (nothing stored)
/// - `401 Unauthorized`: Missing or invalid session (rejected by middleware)
/// - `409 Conflict`: Code already registered
/// - `500 Internal Server Error`: Storage failure
pub async fn register_handler<S: ClassroomStore>(
    State(state): State<AppState<S>>,
    payload: Result<Json<RegisterClassroomRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(request) = payload?;
    let classroom = validate_registration(request)?;

    state
        .store
        .create_classroom(&classroom)
        .await
        .map_err(|e| ApiError::from_store(e, "register").with_code(&classroom.code))?;

    info!(
        code = %classroom.code,
        translations = classroom.translations.len(),
        "Classroom registered"
    );
    Ok(StatusCode::NO_CONTENT)
}

/// Handle `GET /classrooms/most-visited`.
///
/// # Response
///
/// `200 OK` with a JSON array of at most five entries, highest first:
/// ```json
/// [{"code": "A204", "visited": 42}, {"code": "B101", "visited": 17}]
/// ```
pub async fn most_visited_handler<S: ClassroomStore>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<VisitCount>>, ApiError> {
    let ranking = state
        .store
        .most_visited(MOST_VISITED_LIMIT)
        .await
        .map_err(|e| ApiError::from_store(e, "most_visited"))?;

    Ok(Json(ranking))
}

/// Handle admin login.
///
/// # Endpoint
///
/// `POST /login` with body `{"password": "..."}`
///
/// # Response
///
/// - `204 No Content` with a `Set-Cookie: token=...` session cookie
/// - `400 Bad Request`: Body is not valid JSON
/// - `401 Unauthorized`: Wrong or missing password (no cookie set)
pub async fn login_handler<S: ClassroomStore>(
    State(state): State<AppState<S>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload?;
    let password = request.password.unwrap_or_default();

    if !state.admin_password.matches(&password) {
        return Err(AuthError::InvalidPassword.into());
    }

    let (token, expiry) = state.sessions.issue();
    let mut response = StatusCode::NO_CONTENT.into_response();
    set_session_cookie(&mut response, &token, state.secure_cookies);

    info!(expires_at = expiry, "Admin session issued");
    Ok(response)
}

/// Handle requests that match no route.
pub async fn not_found_handler() -> Response {
    let status = StatusCode::NOT_FOUND;
    let error_response = ErrorResponse::with_status(
        "not_found",
        "The route you are looking for does not exist",
        status,
    );
    (status, Json(error_response)).into_response()
}

// =============================================================================
// Tests
// =============================================================================
