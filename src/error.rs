use thiserror::Error;

use crate::server::auth::AuthError;

/// Errors returned by a [`ClassroomStore`](crate::store::ClassroomStore).
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// No classroom row matched the code/language pair
    #[error("Classroom not found: {code}")]
    NotFound { code: String },

    /// A classroom with the same code is already registered
    #[error("Classroom already exists: {code}")]
    AlreadyExists { code: String },

    /// Connection, query or transaction failure
    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Database(err.to_string())
    }
}

/// Reasons an incoming request is rejected before touching the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Normalized code is empty or longer than the allowed maximum
    #[error("code must be between 1 and {max} characters, got {actual}")]
    CodeLength { actual: usize, max: usize },

    #[error("floor is required")]
    MissingFloor,

    /// imageUrl is missing or does not parse as an absolute URL
    #[error("imageUrl is not a valid URL: {0}")]
    InvalidImageUrl(String),

    #[error("translations must contain at least one entry")]
    EmptyTranslations,

    #[error("translations[{index}].language is required")]
    MissingLanguage { index: usize },

    #[error("unsupported language '{value}' (expected one of: en, tr, ar)")]
    UnsupportedLanguage { value: String },

    #[error("translations[{index}].building is required")]
    MissingBuilding { index: usize },

    #[error("translations[{index}].description is required")]
    MissingDescription { index: usize },

    /// The same language appears twice in one registration
    #[error("duplicate translation for language '{language}'")]
    DuplicateLanguage { language: String },

    #[error("You must specify 'language' in the query")]
    MissingQueryLanguage,

    /// Path segment or query string could not be decoded
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// Request body was not valid JSON for the expected shape
    #[error("Malformed request body: {0}")]
    MalformedBody(String),
}

/// Error kinds surfaced at the HTTP boundary.
///
/// Store and validation failures are translated into one of these exactly
/// once, in the handlers. The `IntoResponse` mapping lives in
/// [`server::handlers`](crate::server::handlers).
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("Classroom not found")]
    NotFound { code: String },

    #[error("Classroom already exists")]
    AlreadyExists { code: String },

    #[error("{0}")]
    ValidationFailed(#[from] ValidationError),

    #[error("{0}")]
    Unauthorized(#[from] AuthError),

    /// Unexpected failure; the detail is logged, never sent to the client
    #[error("Internal server error")]
    Internal {
        operation: &'static str,
        code: Option<String>,
        detail: String,
    },
}

impl ApiError {
    /// Translate a store failure for the given operation.
    pub fn from_store(err: StoreError, operation: &'static str) -> Self {
        match err {
            StoreError::NotFound { code } => ApiError::NotFound { code },
            StoreError::AlreadyExists { code } => ApiError::AlreadyExists { code },
            StoreError::Database(detail) => ApiError::Internal {
                operation,
                code: None,
                detail,
            },
        }
    }

    /// Attach the classroom code to an internal error for logging.
    pub fn with_code(self, code: &str) -> Self {
        match self {
            ApiError::Internal {
                operation, detail, ..
            } => ApiError::Internal {
                operation,
                code: Some(code.to_string()),
                detail,
            },
            other => other,
        }
    }
}
