/// Meetup service - the rules around listing, scheduling and editing meetups
use crate::db::{MeetupRepository, Page};
use crate::error::{AppError, Result};
use crate::metrics::record_operation;
use crate::models::{start_of_hour, ListQuery, Meetup, MeetupPayload};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

pub const DEFAULT_MAX_PAGE_SIZE: i64 = 100;

/// Parse a meetup id from the path. Zero and non-integers are rejected.
pub fn parse_meetup_id(raw: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|id| *id != 0)
        .ok_or(AppError::InvalidMeetupId)
}

/// Reject dates whose hour has already started.
fn ensure_not_past(date: DateTime<Utc>, now: DateTime<Utc>) -> Result<()> {
    if start_of_hour(date) < now {
        return Err(AppError::PastDate);
    }
    Ok(())
}

fn outcome_label(err: &AppError) -> &'static str {
    match err {
        AppError::Validation(_) => "validation",
        AppError::PastDate => "past_date",
        AppError::InvalidMeetupId => "invalid_id",
        AppError::MeetupNotFound => "not_found",
        AppError::NotAuthorized => "not_authorized",
        AppError::Unauthenticated(_) => "unauthenticated",
        AppError::PastMeetup(_) => "past_meetup",
        AppError::UnknownFile(_) => "unknown_file",
        AppError::Database(_) | AppError::Internal(_) => "error",
    }
}

fn observe<T>(operation: &str, result: Result<T>) -> Result<T> {
    match &result {
        Ok(_) => record_operation(operation, "ok"),
        Err(err) => record_operation(operation, outcome_label(err)),
    }
    result
}

#[derive(Clone)]
pub struct MeetupService {
    repo: Arc<dyn MeetupRepository>,
    max_page_size: i64,
}

impl MeetupService {
    pub fn new(repo: Arc<dyn MeetupRepository>) -> Self {
        Self::with_page_size(repo, DEFAULT_MAX_PAGE_SIZE)
    }

    pub fn with_page_size(repo: Arc<dyn MeetupRepository>, max_page_size: i64) -> Self {
        Self {
            repo,
            max_page_size: max_page_size.max(1),
        }
    }

    fn page(&self, query: &ListQuery) -> Page {
        Page {
            limit: query.limit.map(|l| l.clamp(1, self.max_page_size)),
            offset: query.offset.unwrap_or(0).max(0),
        }
    }

    /// Meetups organized by `user_id`
    pub async fn list(&self, user_id: Uuid, query: &ListQuery) -> Result<Vec<Meetup>> {
        let result = self.repo.list_by_organizer(user_id, self.page(query)).await;
        observe("list", result)
    }

    /// One of the caller's meetups
    pub async fn get(&self, user_id: Uuid, raw_id: &str) -> Result<Meetup> {
        observe("get", self.get_owned(user_id, raw_id).await)
    }

    /// Schedule a new meetup organized by `user_id`
    pub async fn create(&self, user_id: Uuid, payload: MeetupPayload) -> Result<Meetup> {
        observe("create", self.create_meetup(user_id, payload).await)
    }

    /// Replace the attributes of one of the caller's upcoming meetups
    pub async fn update(&self, user_id: Uuid, raw_id: &str, payload: MeetupPayload) -> Result<Meetup> {
        observe("update", self.update_meetup(user_id, raw_id, payload).await)
    }

    /// Cancel one of the caller's upcoming meetups
    pub async fn delete(&self, user_id: Uuid, raw_id: &str) -> Result<()> {
        observe("delete", self.delete_meetup(user_id, raw_id).await)
    }

    async fn get_owned(&self, user_id: Uuid, raw_id: &str) -> Result<Meetup> {
        let id = parse_meetup_id(raw_id)?;
        let meetup = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::MeetupNotFound)?;

        if !meetup.is_organized_by(user_id) {
            tracing::warn!(%user_id, meetup_id = id, "meetup read by non-organizer rejected");
            return Err(AppError::NotAuthorized);
        }
        Ok(meetup)
    }

    async fn create_meetup(&self, user_id: Uuid, payload: MeetupPayload) -> Result<Meetup> {
        let fields = payload.into_fields()?;
        ensure_not_past(fields.date, Utc::now())?;

        let meetup = self.repo.create(user_id, &fields).await?;
        tracing::info!(%user_id, meetup_id = meetup.id, date = %meetup.date, "meetup created");
        Ok(meetup)
    }

    async fn update_meetup(
        &self,
        user_id: Uuid,
        raw_id: &str,
        payload: MeetupPayload,
    ) -> Result<Meetup> {
        let fields = payload.into_fields()?;
        ensure_not_past(fields.date, Utc::now())?;

        let id = parse_meetup_id(raw_id)?;
        self.load_editable(user_id, id, "update").await?;

        let meetup = self
            .repo
            .update(id, &fields)
            .await?
            .ok_or(AppError::MeetupNotFound)?;
        tracing::info!(%user_id, meetup_id = id, "meetup updated");
        Ok(meetup)
    }

    async fn delete_meetup(&self, user_id: Uuid, raw_id: &str) -> Result<()> {
        let id = parse_meetup_id(raw_id)?;
        self.load_editable(user_id, id, "delete").await?;

        if !self.repo.delete(id).await? {
            return Err(AppError::MeetupNotFound);
        }
        tracing::info!(%user_id, meetup_id = id, "meetup deleted");
        Ok(())
    }

    /// Existence, ownership and past checks shared by update and delete.
    async fn load_editable(&self, user_id: Uuid, id: i64, action: &'static str) -> Result<Meetup> {
        let meetup = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::MeetupNotFound)?;

        if !meetup.is_organized_by(user_id) {
            tracing::warn!(%user_id, meetup_id = id, action, "meetup change by non-organizer rejected");
            return Err(AppError::NotAuthorized);
        }

        if meetup.is_past() {
            return Err(AppError::PastMeetup(action));
        }

        Ok(meetup)
    }
}
