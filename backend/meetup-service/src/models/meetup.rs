use crate::error::{AppError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Naive formats accepted besides RFC 3339; interpreted as UTC.
const NAIVE_DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
];

/// Meetup row as stored in PostgreSQL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Meetup {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub location: String,
    pub date: DateTime<Utc>,
    /// Organizer
    pub user_id: Uuid,
    /// Banner image
    pub file_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Meetup {
    pub fn is_past_at(&self, now: DateTime<Utc>) -> bool {
        self.date < now
    }

    pub fn is_past(&self) -> bool {
        self.is_past_at(Utc::now())
    }

    pub fn is_organized_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

/// Body of create and update requests.
///
/// Fields are optional on the wire so that a missing field surfaces as a
/// validation failure instead of a deserialization error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct MeetupPayload {
    #[validate(required, length(min = 1))]
    #[schema(example = "Rust Meetup #12")]
    pub title: Option<String>,

    #[validate(required, length(min = 1))]
    pub description: Option<String>,

    #[validate(required, length(min = 1))]
    #[schema(example = "Av. Paulista, 1000")]
    pub location: Option<String>,

    #[validate(required)]
    pub file_id: Option<i64>,

    /// RFC 3339 date-time; naive values are read as UTC
    #[validate(required, length(min = 1))]
    #[schema(example = "2030-05-01T19:00:00-03:00")]
    pub date: Option<String>,
}

/// Validated meetup attributes, ready to persist
#[derive(Debug, Clone, PartialEq)]
pub struct MeetupFields {
    pub title: String,
    pub description: String,
    pub location: String,
    pub file_id: i64,
    pub date: DateTime<Utc>,
}

impl MeetupPayload {
    /// Validate and convert into typed fields.
    ///
    /// Every failure collapses into `AppError::Validation("Validation fails")`.
    pub fn into_fields(self) -> Result<MeetupFields> {
        if let Err(errors) = self.validate() {
            tracing::debug!(%errors, "meetup payload rejected");
            return Err(AppError::validation());
        }

        let (Some(title), Some(description), Some(location), Some(file_id), Some(raw_date)) = (
            self.title,
            self.description,
            self.location,
            self.file_id,
            self.date,
        ) else {
            return Err(AppError::validation());
        };

        let date = parse_meetup_date(&raw_date).ok_or_else(|| {
            tracing::debug!(date = %raw_date, "meetup date is not parseable");
            AppError::validation()
        })?;

        Ok(MeetupFields {
            title,
            description,
            location,
            file_id,
            date,
        })
    }
}

/// Parse a meetup date: RFC 3339, a naive date-time (UTC) or a bare date
/// (midnight UTC).
pub fn parse_meetup_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Truncate to the start of the hour.
pub fn start_of_hour(date: DateTime<Utc>) -> DateTime<Utc> {
    date.with_minute(0)
        .and_then(|d| d.with_second(0))
        .and_then(|d| d.with_nanosecond(0))
        .unwrap_or(date)
}

/// Meetup as returned by the API, with the computed `past` flag
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MeetupResponse {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub location: String,
    pub date: DateTime<Utc>,
    pub past: bool,
    pub user_id: Uuid,
    pub file_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MeetupResponse {
    pub fn from_meetup(meetup: Meetup, now: DateTime<Utc>) -> Self {
        let past = meetup.is_past_at(now);
        Self {
            id: meetup.id,
            title: meetup.title,
            description: meetup.description,
            location: meetup.location,
            date: meetup.date,
            past,
            user_id: meetup.user_id,
            file_id: meetup.file_id,
            created_at: meetup.created_at,
            updated_at: meetup.updated_at,
        }
    }
}

impl From<Meetup> for MeetupResponse {
    fn from(meetup: Meetup) -> Self {
        Self::from_meetup(meetup, Utc::now())
    }
}

/// Optional pagination for the meetup listing
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Maximum number of meetups to return (capped by the service)
    pub limit: Option<i64>,
    /// Number of meetups to skip
    pub offset: Option<i64>,
}
