//! Classroom storage layer.
//!
//! Handlers talk to storage only through the [`ClassroomStore`] trait, so the
//! HTTP layer can run against PostgreSQL in production and an in-memory fake
//! in tests.
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            Request Handlers             │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │          ClassroomStore Trait           │
//! │  find / create / most visited           │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │           PgClassroomStore              │
//! │  (sqlx pool, one transaction per call)  │
//! └─────────────────────────────────────────┘
//! ```

mod postgres;

use std::sync::Arc;

use async_trait::async_trait;

use crate::classroom::{ClassroomInfo, Language, NewClassroom, VisitCount};
use crate::error::StoreError;

pub use postgres::{PgClassroomStore, DEFAULT_MAX_CONNECTIONS};

/// Persistent storage for classrooms and their translations.
#[async_trait]
pub trait ClassroomStore: Send + Sync {
    /// Look up a classroom in one language and count the visit.
    ///
    /// The read and the `visited` increment commit together: a miss returns
    /// [`StoreError::NotFound`] and leaves every counter untouched.
    ///
    /// `code` must already be normalized.
    async fn find_classroom(
        &self,
        code: &str,
        language: Language,
    ) -> Result<ClassroomInfo, StoreError>;

    /// Insert a classroom together with all of its translations.
    ///
    /// Either everything is written or nothing is. An existing code yields
    /// [`StoreError::AlreadyExists`].
    async fn create_classroom(&self, classroom: &NewClassroom) -> Result<(), StoreError>;

    /// Return up to `limit` classrooms ordered by `visited`, highest first.
    async fn most_visited(&self, limit: i64) -> Result<Vec<VisitCount>, StoreError>;
}

#[async_trait]
impl<T: ClassroomStore + ?Sized> ClassroomStore for Arc<T> {
    async fn find_classroom(
        &self,
        code: &str,
        language: Language,
    ) -> Result<ClassroomInfo, StoreError> {
        (**self).find_classroom(code, language).await
    }

    async fn create_classroom(&self, classroom: &NewClassroom) -> Result<(), StoreError> {
        (**self).create_classroom(classroom).await
    }

    async fn most_visited(&self, limit: i64) -> Result<Vec<VisitCount>, StoreError> {
        (**self).most_visited(limit).await
    }
}
