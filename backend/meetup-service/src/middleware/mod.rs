/// HTTP middleware for meetup-service
///
/// JWT authentication (yielding the `UserId` extractor) and Prometheus
/// request metrics.
pub mod jwt_auth;
pub mod metrics;

pub use jwt_auth::{authenticate, JwtAuthMiddleware, UserId};
pub use metrics::MetricsMiddleware;
