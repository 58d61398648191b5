/// Database access layer
///
/// - `meetup_repo`: the `MeetupRepository` seam and its PostgreSQL implementation
/// - `memory`: in-process implementation for tests and local runs
pub mod meetup_repo;
pub mod memory;

pub use meetup_repo::{MeetupRepository, Page, PgMeetupRepository};
pub use memory::InMemoryMeetupRepository;

use sqlx::PgPool;

/// Apply the embedded migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
