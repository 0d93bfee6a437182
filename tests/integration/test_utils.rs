//! Test utilities for integration tests.
//!
//! This module provides an in-memory [`ClassroomStore`] with mutation
//! tracking, plus helpers for building requests and reading responses.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, Response};
use http_body_util::BodyExt;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use where_is_this_class::{
    create_router, ClassroomInfo, ClassroomStore, Language, NewClassroom, NewTranslation,
    RouterConfig, StoreError, VisitCount,
};

pub const TEST_ADMIN_PASSWORD: &str = "let-me-in";
pub const TEST_SECRET: &str = "test-secret-key-for-hmac-signing";

// =============================================================================
// In-memory Store
// =============================================================================

#[derive(Debug, Clone)]
struct StoredClassroom {
    floor: i32,
    image_url: String,
    visited: i64,
    translations: HashMap<Language, NewTranslation>,
}

/// An in-memory classroom store that counts successful writes.
///
/// Lookups that hit count as a write (the visit increment), so tests can
/// assert that failed requests left the store untouched.
#[derive(Default)]
pub struct MemoryClassroomStore {
    classrooms: RwLock<HashMap<String, StoredClassroom>>,
    mutation_count: AtomicUsize,
    fail_with: Option<String>,
}

impl MemoryClassroomStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every call fails with a database error.
    pub fn failing(detail: impl Into<String>) -> Self {
        Self {
            fail_with: Some(detail.into()),
            ..Self::default()
        }
    }

    /// Number of successful writes (registrations and visit increments).
    pub fn mutation_count(&self) -> usize {
        self.mutation_count.load(Ordering::SeqCst)
    }

    pub async fn classroom_count(&self) -> usize {
        self.classrooms.read().await.len()
    }

    pub async fn visits(&self, code: &str) -> Option<i64> {
        self.classrooms.read().await.get(code).map(|c| c.visited)
    }

    /// Insert a classroom directly, bypassing mutation tracking.
    pub async fn seed(&self, classroom: NewClassroom, visited: i64) {
        let stored = StoredClassroom {
            floor: classroom.floor,
            image_url: classroom.image_url,
            visited,
            translations: classroom
                .translations
                .into_iter()
                .map(|t| (t.language, t))
                .collect(),
        };
        self.classrooms
            .write()
            .await
            .insert(classroom.code, stored);
    }

    fn check_failure(&self) -> Result<(), StoreError> {
        match &self.fail_with {
            Some(detail) => Err(StoreError::Database(detail.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ClassroomStore for MemoryClassroomStore {
    async fn find_classroom(
        &self,
        code: &str,
        language: Language,
    ) -> Result<ClassroomInfo, StoreError> {
        self.check_failure()?;

        let mut classrooms = self.classrooms.write().await;
        let not_found = || StoreError::NotFound {
            code: code.to_string(),
        };
        let classroom = classrooms.get_mut(code).ok_or_else(not_found)?;
        let translation = classroom.translations.get(&language).ok_or_else(not_found)?;

        let info = ClassroomInfo {
            building: translation.building.clone(),
            floor: classroom.floor,
            image_url: classroom.image_url.clone(),
            description: translation.description.clone(),
            detail: translation.detail.clone().unwrap_or_default(),
        };

        classroom.visited += 1;
        self.mutation_count.fetch_add(1, Ordering::SeqCst);
        Ok(info)
    }

    async fn create_classroom(&self, classroom: &NewClassroom) -> Result<(), StoreError> {
        self.check_failure()?;

        let mut classrooms = self.classrooms.write().await;
        if classrooms.contains_key(&classroom.code) {
            return Err(StoreError::AlreadyExists {
                code: classroom.code.clone(),
            });
        }

        classrooms.insert(
            classroom.code.clone(),
            StoredClassroom {
                floor: classroom.floor,
                image_url: classroom.image_url.clone(),
                visited: 0,
                translations: classroom
                    .translations
                    .iter()
                    .map(|t| (t.language, t.clone()))
                    .collect(),
            },
        );
        self.mutation_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn most_visited(&self, limit: i64) -> Result<Vec<VisitCount>, StoreError> {
        self.check_failure()?;

        let classrooms = self.classrooms.read().await;
        let mut ranking: Vec<VisitCount> = classrooms
            .iter()
            .map(|(code, c)| VisitCount {
                code: code.clone(),
                visited: c.visited,
            })
            .collect();
        ranking.sort_by(|a, b| b.visited.cmp(&a.visited).then_with(|| a.code.cmp(&b.code)));
        ranking.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(ranking)
    }
}

// =============================================================================
// Fixtures
// =============================================================================

/// A classroom with English and Turkish translations.
pub fn sample_classroom(code: &str) -> NewClassroom {
    NewClassroom {
        code: code.to_string(),
        floor: 2,
        image_url: format!("https://cdn.example.com/{}.jpg", code.to_lowercase()),
        translations: vec![
            NewTranslation {
                language: Language::En,
                building: "Engineering".to_string(),
                description: "Second floor, east wing".to_string(),
                detail: Some("Next to the elevators".to_string()),
            },
            NewTranslation {
                language: Language::Tr,
                building: "Mühendislik".to_string(),
                description: "İkinci kat, doğu kanadı".to_string(),
                detail: None,
            },
        ],
    }
}

/// A JSON registration body for `POST /classrooms`.
pub fn registration_body(code: &str) -> serde_json::Value {
    serde_json::json!({
        "code": code,
        "floor": 1,
        "imageUrl": "https://cdn.example.com/room.jpg",
        "translations": [
            {
                "language": "en",
                "building": "Library",
                "description": "Ground floor, turn left",
                "detail": "Quiet zone"
            },
            {
                "language": "ar",
                "building": "المكتبة",
                "description": "الطابق الأرضي"
            }
        ]
    })
}

/// Build a router over a shared store, with tracing disabled.
pub fn test_router(store: Arc<MemoryClassroomStore>) -> axum::Router {
    create_router(
        store,
        RouterConfig::new(TEST_ADMIN_PASSWORD, TEST_SECRET).with_tracing(false),
    )
}

// =============================================================================
// Request Helpers
// =============================================================================

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: &serde_json::Value, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Extract `name=value` from the first `Set-Cookie` header, if any.
pub fn set_cookie_pair(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|pair| pair.trim().to_string())
}
