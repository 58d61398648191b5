/// Error types for meetup-service
///
/// Every failure a handler can produce is an `AppError`; actix renders it as
/// `{"error": <message>, "status": <code>}`.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use thiserror::Error;

/// Result type for meetup-service operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Message returned for any payload that fails validation.
pub const VALIDATION_FAILS: &str = "Validation fails";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{0}")]
    Validation(String),

    #[error("Meetup past date are not permitted")]
    PastDate,

    #[error("Invalid meetup id")]
    InvalidMeetupId,

    #[error("Meetup not found")]
    MeetupNotFound,

    #[error("Not authorized.")]
    NotAuthorized,

    /// Missing or invalid credentials
    #[error("{0}")]
    Unauthenticated(&'static str),

    /// The stored meetup already happened; carries the attempted action.
    #[error("Can't {0} past meetups.")]
    PastMeetup(&'static str),

    #[error("Banner file {0} not found")]
    UnknownFile(i64),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation() -> Self {
        AppError::Validation(VALIDATION_FAILS.to_string())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_)
            | AppError::PastDate
            | AppError::InvalidMeetupId
            | AppError::MeetupNotFound
            | AppError::PastMeetup(_)
            | AppError::UnknownFile(_) => StatusCode::BAD_REQUEST,
            AppError::NotAuthorized | AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        // Server-side details stay in the logs.
        let error_msg = if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        HttpResponse::build(status).json(serde_json::json!({
            "error": error_msg,
            "status": status.as_u16(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::validation().status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::PastDate.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::InvalidMeetupId.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::MeetupNotFound.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::PastMeetup("update").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::UnknownFile(3).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::NotAuthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::Unauthenticated("Invalid token").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Database(sqlx::Error::PoolTimedOut).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(AppError::validation().to_string(), "Validation fails");
        assert_eq!(AppError::PastDate.to_string(), "Meetup past date are not permitted");
        assert_eq!(AppError::PastMeetup("delete").to_string(), "Can't delete past meetups.");
        assert_eq!(AppError::NotAuthorized.to_string(), "Not authorized.");
    }

    #[actix_web::test]
    async fn test_error_body_shape() {
        let resp = AppError::MeetupNotFound.error_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Meetup not found");
        assert_eq!(json["status"], 400);
    }

    #[actix_web::test]
    async fn test_server_errors_are_not_leaked() {
        let resp = AppError::Internal("connection string postgres://secret".into()).error_response();

        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Internal server error");
        assert_eq!(json["status"], 500);
    }
}
