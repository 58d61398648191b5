use crate::error::AppError;
use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest, ResponseError};
use crypto_core::jwt;
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;
use uuid::Uuid;

/// Authenticated caller, stored in request extensions by [`JwtAuthMiddleware`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserId(pub Uuid);

/// Pull the user id out of an `Authorization` header value.
pub fn authenticate(auth_header: Option<&str>) -> Result<UserId, AppError> {
    let auth_header =
        auth_header.ok_or(AppError::Unauthenticated("Missing Authorization header"))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AppError::Unauthenticated("Invalid Authorization scheme"))?;

    let claims = jwt::validate_token(token.trim()).map_err(|e| {
        tracing::debug!("JWT validation failed: {}", e);
        AppError::Unauthenticated("Invalid or expired token")
    })?;

    let user_id = Uuid::parse_str(&claims.claims.sub)
        .map_err(|_| AppError::Unauthenticated("Invalid token: malformed user id"))?;

    Ok(UserId(user_id))
}

/// Actix middleware that validates a Bearer token with the shared JWT helpers.
pub struct JwtAuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for JwtAuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct JwtAuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        Box::pin(async move {
            let header = req
                .headers()
                .get("Authorization")
                .and_then(|h| h.to_str().ok());
            let user_id = match authenticate(header) {
                Ok(user_id) => user_id,
                Err(err) => {
                    let response = err.error_response().map_into_right_body();
                    return Ok(req.into_response(response));
                }
            };

            req.extensions_mut().insert(user_id);

            service.call(req).await.map(ServiceResponse::map_into_left_body)
        })
    }
}

impl FromRequest for UserId {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<UserId>()
                .copied()
                .ok_or_else(|| AppError::Unauthenticated("User not authenticated").into()),
        )
    }
}
