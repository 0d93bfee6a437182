//! PostgreSQL-backed [`ClassroomStore`].
//!
//! Expects the tables described in `schema.sql`:
//!
//! ```text
//! class_rooms(id, code UNIQUE, floor, image_url, visited)
//! class_room_translations(id, class_room_id, language, building, description, detail)
//!     UNIQUE (class_room_id, language)
//! ```
//!
//! Every value reaches the database as a bound parameter.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Postgres, QueryBuilder};
use tracing::debug;
use uuid::Uuid;

use crate::classroom::{ClassroomInfo, Language, NewClassroom, VisitCount};
use crate::error::StoreError;

use super::ClassroomStore;

/// Default size of the connection pool.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// How long to wait for a pooled connection before failing the request.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

const FIND_CLASSROOM_SQL: &str = r#"
    SELECT crt.building, cr.floor, cr.image_url, crt.description, crt.detail
    FROM class_rooms cr
    JOIN class_room_translations crt ON cr.id = crt.class_room_id
    WHERE cr.code = $1 AND crt.language = $2
"#;

const INCREMENT_VISITED_SQL: &str = "UPDATE class_rooms SET visited = visited + 1 WHERE code = $1";

const INSERT_CLASSROOM_SQL: &str =
    "INSERT INTO class_rooms (id, code, floor, image_url) VALUES ($1, $2, $3, $4)";

const MOST_VISITED_SQL: &str =
    "SELECT code, visited FROM class_rooms ORDER BY visited DESC LIMIT $1";

#[derive(Debug, sqlx::FromRow)]
struct ClassroomRow {
    building: String,
    floor: i32,
    image_url: String,
    description: String,
    detail: Option<String>,
}

impl From<ClassroomRow> for ClassroomInfo {
    fn from(row: ClassroomRow) -> Self {
        ClassroomInfo {
            building: row.building,
            floor: row.floor,
            image_url: row.image_url,
            description: row.description,
            detail: row.detail.unwrap_or_default(),
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct VisitRow {
    code: String,
    visited: i64,
}

/// Classroom store backed by a PostgreSQL connection pool.
#[derive(Clone)]
pub struct PgClassroomStore {
    pool: PgPool,
}

impl PgClassroomStore {
    /// Connect to `database_url` and verify the connection with a ping.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect(database_url)
            .await?;

        let store = Self::from_pool(pool);
        store.ping().await?;
        Ok(store)
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Round-trip a trivial query.
    pub async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// The underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ClassroomStore for PgClassroomStore {
    async fn find_classroom(
        &self,
        code: &str,
        language: Language,
    ) -> Result<ClassroomInfo, StoreError> {
        // Dropping `tx` without commit rolls it back
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, ClassroomRow>(FIND_CLASSROOM_SQL)
            .bind(code)
            .bind(language.as_str())
            .fetch_optional(&mut *tx)
            .await?;

        let Some(row) = row else {
            return Err(StoreError::NotFound {
                code: code.to_string(),
            });
        };

        sqlx::query(INCREMENT_VISITED_SQL)
            .bind(code)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        debug!(code = code, language = %language, "Classroom visit recorded");
        Ok(row.into())
    }

    async fn create_classroom(&self, classroom: &NewClassroom) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        let classroom_id = Uuid::new_v4();
        sqlx::query(INSERT_CLASSROOM_SQL)
            .bind(classroom_id)
            .bind(&classroom.code)
            .bind(classroom.floor)
            .bind(&classroom.image_url)
            .execute(&mut *tx)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                    StoreError::AlreadyExists {
                        code: classroom.code.clone(),
                    }
                }
                other => other.into(),
            })?;

        let mut insert = QueryBuilder::<Postgres>::new(
            "INSERT INTO class_room_translations \
             (id, class_room_id, language, building, description, detail) ",
        );
        insert.push_values(&classroom.translations, |mut row, translation| {
            row.push_bind(Uuid::new_v4())
                .push_bind(classroom_id)
                .push_bind(translation.language.as_str())
                .push_bind(&translation.building)
                .push_bind(&translation.description)
                .push_bind(&translation.detail);
        });
        insert.build().execute(&mut *tx).await?;

        tx.commit().await?;

        debug!(
            code = %classroom.code,
            translations = classroom.translations.len(),
            "Classroom registered"
        );
        Ok(())
    }

    async fn most_visited(&self, limit: i64) -> Result<Vec<VisitCount>, StoreError> {
        let rows = sqlx::query_as::<_, VisitRow>(MOST_VISITED_SQL)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| VisitCount {
                code: row.code,
                visited: row.visited,
            })
            .collect())
    }
}
