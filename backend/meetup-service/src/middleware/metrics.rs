use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::Error;
use futures::future::LocalBoxFuture;
use prometheus::{register_histogram_vec, register_int_counter_vec, HistogramVec, IntCounterVec};
use std::future::{ready, Ready};
use std::rc::Rc;
use std::time::Instant;

lazy_static::lazy_static! {
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "meetup_http_requests_total",
        "Total HTTP requests",
        &["method", "route", "status"]
    ).expect("Prometheus metrics registration should succeed at startup");

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "meetup_http_request_duration_seconds",
        "HTTP request latency",
        &["method", "route", "status"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]
    ).expect("Prometheus metrics registration should succeed at startup");
}

/// Prometheus request metrics, labelled by route pattern rather than raw path
/// so meetup ids do not explode label cardinality.
pub struct MetricsMiddleware;

impl<S, B> Transform<S, ServiceRequest> for MetricsMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = MetricsMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(MetricsMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct MetricsMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for MetricsMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let method = req.method().to_string();
        let route = req
            .match_pattern()
            .unwrap_or_else(|| "unmatched".to_string());
        let start = Instant::now();

        Box::pin(async move {
            let res = service.call(req).await;

            let status = match &res {
                Ok(resp) => resp.status().as_u16().to_string(),
                Err(err) => err.as_response_error().status_code().as_u16().to_string(),
            };
            let elapsed = start.elapsed();

            HTTP_REQUESTS_TOTAL
                .with_label_values(&[&method, &route, &status])
                .inc();
            HTTP_REQUEST_DURATION_SECONDS
                .with_label_values(&[&method, &route, &status])
                .observe(elapsed.as_secs_f64());

            tracing::debug!(%method, %route, %status, elapsed_ms = elapsed.as_millis() as u64, "request completed");
            res
        })
    }
}
