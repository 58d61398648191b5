use crate::error::{AppError, Result};
use crate::models::{Meetup, MeetupFields};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

/// SQLSTATE for foreign key violations
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// A slice of the organizer's meetups. `limit: None` means everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
    pub limit: Option<i64>,
    pub offset: i64,
}

/// Persistence for meetups.
///
/// Implementations perform no authorization; ownership and date rules live
/// in `MeetupService`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MeetupRepository: Send + Sync {
    /// Meetups organized by `user_id`, ordered by date then id
    async fn list_by_organizer(&self, user_id: Uuid, page: Page) -> Result<Vec<Meetup>>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Meetup>>;

    async fn create(&self, user_id: Uuid, fields: &MeetupFields) -> Result<Meetup>;

    /// Overwrite the editable attributes. `None` if the row vanished.
    async fn update(&self, id: i64, fields: &MeetupFields) -> Result<Option<Meetup>>;

    /// Hard delete. `false` if nothing was deleted.
    async fn delete(&self, id: i64) -> Result<bool>;
}

/// PostgreSQL-backed repository
#[derive(Clone)]
pub struct PgMeetupRepository {
    pool: PgPool,
}

impl PgMeetupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_write_error(err: sqlx::Error, file_id: i64) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) {
            return AppError::UnknownFile(file_id);
        }
    }
    AppError::Database(err)
}

#[async_trait]
impl MeetupRepository for PgMeetupRepository {
    async fn list_by_organizer(&self, user_id: Uuid, page: Page) -> Result<Vec<Meetup>> {
        // LIMIT NULL means no limit in PostgreSQL
        let meetups = sqlx::query_as::<_, Meetup>(
            r#"
            SELECT id, title, description, location, date, user_id, file_id,
                   created_at, updated_at
            FROM meetups
            WHERE user_id = $1
            ORDER BY date ASC, id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(meetups)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Meetup>> {
        let meetup = sqlx::query_as::<_, Meetup>(
            r#"
            SELECT id, title, description, location, date, user_id, file_id,
                   created_at, updated_at
            FROM meetups
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(meetup)
    }

    async fn create(&self, user_id: Uuid, fields: &MeetupFields) -> Result<Meetup> {
        sqlx::query_as::<_, Meetup>(
            r#"
            INSERT INTO meetups (title, description, location, date, user_id, file_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, title, description, location, date, user_id, file_id,
                      created_at, updated_at
            "#,
        )
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(&fields.location)
        .bind(fields.date)
        .bind(user_id)
        .bind(fields.file_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, fields.file_id))
    }

    async fn update(&self, id: i64, fields: &MeetupFields) -> Result<Option<Meetup>> {
        sqlx::query_as::<_, Meetup>(
            r#"
            UPDATE meetups
            SET title = $2, description = $3, location = $4, date = $5, file_id = $6,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, description, location, date, user_id, file_id,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(&fields.location)
        .bind(fields.date)
        .bind(fields.file_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, fields.file_id))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM meetups WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
