/// HTTP handlers for meetup-service
pub mod health;
pub mod meetups;

pub use health::{health_summary, liveness_check, readiness_summary, HealthState};
pub use meetups::{delete, index, show, store, update};

use crate::error::AppError;
use crate::middleware::{JwtAuthMiddleware, MetricsMiddleware};
use actix_web::web;

/// Register the authenticated meetup routes under `/api/v1/meetups`.
///
/// Body and query extraction failures are reported the same way as field
/// validation failures.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    let json_config = web::JsonConfig::default()
        .limit(64 * 1024)
        .error_handler(|err, _req| {
            tracing::debug!("rejected JSON body: {}", err);
            AppError::validation().into()
        });

    let query_config = web::QueryConfig::default().error_handler(|err, _req| {
        tracing::debug!("rejected query string: {}", err);
        AppError::validation().into()
    });

    cfg.service(
        web::scope("/api/v1/meetups")
            .app_data(json_config)
            .app_data(query_config)
            .wrap(JwtAuthMiddleware)
            .wrap(MetricsMiddleware)
            .service(
                web::resource("")
                    .route(web::get().to(meetups::index))
                    .route(web::post().to(meetups::store)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(meetups::show))
                    .route(web::put().to(meetups::update))
                    .route(web::delete().to(meetups::delete)),
            ),
    );
}
