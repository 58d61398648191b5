/// Meetup Service Library
///
/// Lets an authenticated organizer list, create, update and cancel the
/// meetups they run. Meetups that already happened are read-only.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers and route table
/// - `models`: meetup rows, request payloads and responses
/// - `services`: business rules (dates, ownership, past meetups)
/// - `db`: repository trait with PostgreSQL and in-memory implementations
/// - `middleware`: JWT authentication and request metrics
/// - `error`: error types and their HTTP mapping
/// - `config`: configuration management
/// - `metrics`: Prometheus counters and the `/metrics` handler
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod openapi;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
