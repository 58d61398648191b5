//! Shared helpers for meetup-service HTTP tests.
//!
//! Tests run against the real route table and JWT middleware, backed by the
//! in-memory repository.
#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};
use meetup_service::db::InMemoryMeetupRepository;
use meetup_service::models::Meetup;
use meetup_service::services::MeetupService;
use std::sync::{Arc, Once};
use uuid::Uuid;

const TEST_PRIVATE_KEY: &str =
    include_str!("../../../libs/crypto-core/tests/fixtures/test_private_key.pem");
const TEST_PUBLIC_KEY: &str =
    include_str!("../../../libs/crypto-core/tests/fixtures/test_public_key.pem");

static INIT: Once = Once::new();

pub fn init_jwt() {
    INIT.call_once(|| {
        crypto_core::jwt::initialize_jwt_keys(TEST_PRIVATE_KEY, TEST_PUBLIC_KEY)
            .expect("test keys should load");
    });
}

/// `Authorization` header value for `user_id`.
pub fn bearer(user_id: Uuid) -> (&'static str, String) {
    init_jwt();
    let token = crypto_core::jwt::generate_access_token(user_id).expect("token");
    ("Authorization", format!("Bearer {token}"))
}

pub fn service_for(repo: Arc<InMemoryMeetupRepository>) -> MeetupService {
    MeetupService::new(repo)
}

pub fn future_date() -> String {
    (Utc::now() + Duration::days(30)).to_rfc3339()
}

pub fn payload(title: &str, file_id: i64, date: &str) -> serde_json::Value {
    serde_json::json!({
        "title": title,
        "description": "Talks and pizza",
        "location": "Main hall",
        "file_id": file_id,
        "date": date,
    })
}

/// Seed a meetup directly, bypassing the date rules.
pub async fn seed(
    repo: &InMemoryMeetupRepository,
    user_id: Uuid,
    title: &str,
    date: DateTime<Utc>,
) -> i64 {
    let now = Utc::now();
    repo.insert_raw(Meetup {
        id: 0,
        title: title.to_string(),
        description: "Seeded".to_string(),
        location: "Somewhere".to_string(),
        date,
        user_id,
        file_id: 1,
        created_at: now,
        updated_at: now,
    })
    .await
}

/// Build an initialized test service wired like production.
#[macro_export]
macro_rules! test_app {
    ($service:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($service))
                .configure(meetup_service::handlers::configure_routes),
        )
        .await
    };
}
