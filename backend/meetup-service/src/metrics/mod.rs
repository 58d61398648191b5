//! Prometheus metrics for meetup-service.
//!
//! Business counters plus the HTTP handler for the `/metrics` endpoint.

use actix_web::HttpResponse;
use prometheus::{register_int_counter_vec, Encoder, IntCounterVec, TextEncoder};

lazy_static::lazy_static! {
    pub static ref MEETUP_OPERATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "meetup_operations_total",
        "Meetup operations by kind and outcome",
        &["operation", "outcome"]
    ).expect("Prometheus metrics registration should succeed at startup");
}

/// Count one meetup operation. `outcome` is `ok` or the rejection reason.
pub fn record_operation(operation: &str, outcome: &str) {
    MEETUP_OPERATIONS_TOTAL
        .with_label_values(&[operation, outcome])
        .inc();
}

/// Actix handler that renders Prometheus metrics in text format.
pub async fn serve_metrics() -> HttpResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        return HttpResponse::InternalServerError().body(err.to_string());
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_operation_increments() {
        let before = MEETUP_OPERATIONS_TOTAL
            .with_label_values(&["test_op", "ok"])
            .get();
        record_operation("test_op", "ok");
        let after = MEETUP_OPERATIONS_TOTAL
            .with_label_values(&["test_op", "ok"])
            .get();
        assert_eq!(after, before + 1);
    }
}
