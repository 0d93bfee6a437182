//! Admin session authentication.
//!
//! There are no user accounts. An administrator proves knowledge of the
//! configured admin password once via `POST /login` and receives a signed,
//! time-limited session token in an HTTP-only cookie. The registration route
//! is gated by [`session_middleware`], which verifies that cookie.
//!
//! # Token Format
//!
//! ```text
//! token     = "{expiry}.{signature}"
//! signature = hex(HMAC-SHA256(secret_key, "admin-session:{expiry}"))
//! ```
//!
//! `expiry` is a Unix timestamp in seconds, 24 hours after issuance.
//!
//! # Security Properties
//!
//! - **Time-limited**: tokens are rejected once `expiry` has passed
//! - **Constant-time comparison**: both the password check and the signature
//!   check use `subtle`; the password check compares SHA-256 digests so the
//!   comparison does not depend on the password length
//!
//! # Example
//!
//! ```rust
//! use where_is_this_class::server::auth::SessionAuth;
//!
//! let auth = SessionAuth::new("signing-key");
//! let (token, _expiry) = auth.issue();
//! assert!(auth.verify(&token).is_ok());
//! ```

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

use super::handlers::ErrorResponse;

// =============================================================================
// Constants
// =============================================================================

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "token";

/// Lifetime of an admin session.
pub const SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Domain separator mixed into every signature.
const SIGNATURE_CONTEXT: &str = "admin-session";

type HmacSha256 = Hmac<Sha256>;

// =============================================================================
// Errors
// =============================================================================

/// Authentication error types. All map to 401.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No session cookie on the request
    MissingToken,

    /// Cookie value is not `{expiry}.{hex}`
    MalformedToken,

    /// Session has expired
    Expired {
        /// When the session expired
        expired_at: u64,
        /// Current time
        current_time: u64,
    },

    /// Signature does not match
    InvalidSignature,

    /// Submitted admin password is wrong
    InvalidPassword,
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingToken => write!(f, "Missing session token"),
            AuthError::MalformedToken => write!(f, "Malformed session token"),
            AuthError::Expired {
                expired_at,
                current_time,
            } => write!(
                f,
                "Session expired at {} (current time: {})",
                expired_at, current_time
            ),
            AuthError::InvalidSignature => write!(f, "Invalid session token"),
            AuthError::InvalidPassword => write!(f, "Invalid password"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = StatusCode::UNAUTHORIZED;
        let error_type = match &self {
            AuthError::MissingToken => "missing_token",
            AuthError::MalformedToken => "malformed_token",
            AuthError::Expired { .. } => "session_expired",
            AuthError::InvalidSignature => "invalid_token",
            AuthError::InvalidPassword => "invalid_password",
        };
        let message = self.to_string();

        // Forged tokens and wrong passwords could indicate an attack
        match &self {
            AuthError::InvalidSignature | AuthError::InvalidPassword => {
                warn!(
                    error_type = error_type,
                    status = status.as_u16(),
                    "Authentication failed: {}",
                    message
                );
            }
            _ => {
                debug!(
                    error_type = error_type,
                    status = status.as_u16(),
                    "Authentication failed: {}",
                    message
                );
            }
        }

        let error_response = ErrorResponse::with_status(error_type, message, status);
        (status, Json(error_response)).into_response()
    }
}

// =============================================================================
// Session Tokens
// =============================================================================

/// Issues and verifies admin session tokens using HMAC-SHA256.
#[derive(Clone)]
pub struct SessionAuth {
    /// Secret key for HMAC computation
    secret_key: Vec<u8>,
}

impl SessionAuth {
    /// Create a new authenticator with the given signing key.
    pub fn new(secret_key: impl AsRef<[u8]>) -> Self {
        Self {
            secret_key: secret_key.as_ref().to_vec(),
        }
    }

    /// Issue a token valid for [`SESSION_TTL`].
    ///
    /// Returns the token and its expiry timestamp.
    pub fn issue(&self) -> (String, u64) {
        let expiry = unix_now() + SESSION_TTL.as_secs();
        (self.issue_with_expiry(expiry), expiry)
    }

    /// Issue a token with a specific expiry timestamp.
    pub fn issue_with_expiry(&self, expiry: u64) -> String {
        format!("{}.{}", expiry, self.compute_signature(expiry))
    }

    /// Verify a token's format, expiry and signature.
    pub fn verify(&self, token: &str) -> Result<(), AuthError> {
        let (expiry, signature) = token.split_once('.').ok_or(AuthError::MalformedToken)?;
        let expiry: u64 = expiry.parse().map_err(|_| AuthError::MalformedToken)?;
        let provided_sig = hex::decode(signature).map_err(|_| AuthError::MalformedToken)?;

        let current_time = unix_now();
        if current_time > expiry {
            return Err(AuthError::Expired {
                expired_at: expiry,
                current_time,
            });
        }

        let expected_sig = self.compute_mac(expiry);
        if provided_sig.ct_eq(&expected_sig).into() {
            Ok(())
        } else {
            Err(AuthError::InvalidSignature)
        }
    }

    fn compute_mac(&self, expiry: u64) -> Vec<u8> {
        let mut mac =
            HmacSha256::new_from_slice(&self.secret_key).expect("HMAC can take key of any size");
        mac.update(format!("{}:{}", SIGNATURE_CONTEXT, expiry).as_bytes());
        mac.finalize().into_bytes().to_vec()
    }

    fn compute_signature(&self, expiry: u64) -> String {
        hex::encode(self.compute_mac(expiry))
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

// =============================================================================
// Admin Password
// =============================================================================

/// The configured admin password, held as a SHA-256 digest.
#[derive(Clone)]
pub struct AdminPassword {
    digest: Vec<u8>,
}

impl AdminPassword {
    pub fn new(password: impl AsRef<[u8]>) -> Self {
        Self {
            digest: Sha256::digest(password.as_ref()).to_vec(),
        }
    }

    /// Compare a submitted password in constant time.
    pub fn matches(&self, candidate: &str) -> bool {
        let candidate = Sha256::digest(candidate.as_bytes());
        candidate.as_slice().ct_eq(self.digest.as_slice()).into()
    }
}

// =============================================================================
// Cookies
// =============================================================================

/// Build the `Set-Cookie` value carrying a session token.
pub fn session_cookie(token: &str, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Strict",
        SESSION_COOKIE,
        token,
        SESSION_TTL.as_secs()
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Find a cookie value by name across all `Cookie` headers.
pub fn find_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"'))
}

/// Attach a session cookie to a response.
pub fn set_session_cookie(response: &mut Response, token: &str, secure: bool) {
    if let Ok(value) = HeaderValue::from_str(&session_cookie(token, secure)) {
        response.headers_mut().append(header::SET_COOKIE, value);
    }
}

// =============================================================================
// Axum Middleware
// =============================================================================

/// Axum middleware requiring a valid admin session cookie.
///
/// The request passes through unchanged on success.
///
/// # Example
///
/// ```ignore
/// use axum::{Router, middleware, routing::post};
/// use where_is_this_class::server::auth::{SessionAuth, session_middleware};
///
/// let auth = SessionAuth::new("signing-key");
/// let app = Router::new()
///     .route("/classrooms", post(register_handler))
///     .layer(middleware::from_fn_with_state(auth, session_middleware));
/// ```
pub async fn session_middleware(
    State(auth): State<SessionAuth>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = find_cookie(request.headers(), SESSION_COOKIE).ok_or(AuthError::MissingToken)?;
    auth.verify(token)?;

    Ok(next.run(request).await)
}

// =============================================================================
// Tests
// =============================================================================
