/// Meetup handlers - HTTP endpoints for the organizer's meetups
use crate::error::Result;
use crate::middleware::UserId;
use crate::models::{ListQuery, MeetupPayload, MeetupResponse};
use crate::services::MeetupService;
use actix_web::{web, HttpResponse};
use chrono::Utc;

/// List meetups organized by the caller, ordered by date
#[utoipa::path(
    get,
    path = "/api/v1/meetups",
    tag = "meetups",
    params(ListQuery),
    responses(
        (status = 200, description = "Meetups organized by the caller", body = [MeetupResponse]),
        (status = 401, description = "Missing or invalid token"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn index(
    service: web::Data<MeetupService>,
    user_id: UserId,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse> {
    let meetups = service.list(user_id.0, &query).await?;

    let now = Utc::now();
    let body: Vec<MeetupResponse> = meetups
        .into_iter()
        .map(|m| MeetupResponse::from_meetup(m, now))
        .collect();

    Ok(HttpResponse::Ok().json(body))
}

/// Fetch one meetup organized by the caller
#[utoipa::path(
    get,
    path = "/api/v1/meetups/{id}",
    tag = "meetups",
    params(("id" = String, Path, description = "Meetup id")),
    responses(
        (status = 200, description = "The meetup", body = MeetupResponse),
        (status = 400, description = "Invalid id or meetup not found"),
        (status = 401, description = "Caller is not the organizer"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn show(
    service: web::Data<MeetupService>,
    user_id: UserId,
    id: web::Path<String>,
) -> Result<HttpResponse> {
    let meetup = service.get(user_id.0, &id).await?;
    Ok(HttpResponse::Ok().json(MeetupResponse::from(meetup)))
}

/// Create a meetup organized by the caller
#[utoipa::path(
    post,
    path = "/api/v1/meetups",
    tag = "meetups",
    request_body = MeetupPayload,
    responses(
        (status = 200, description = "Meetup created", body = MeetupResponse),
        (status = 400, description = "Validation failed or date in the past"),
        (status = 401, description = "Missing or invalid token"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn store(
    service: web::Data<MeetupService>,
    user_id: UserId,
    req: web::Json<MeetupPayload>,
) -> Result<HttpResponse> {
    let meetup = service.create(user_id.0, req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(MeetupResponse::from(meetup)))
}

/// Replace the fields of a meetup organized by the caller
#[utoipa::path(
    put,
    path = "/api/v1/meetups/{id}",
    tag = "meetups",
    params(("id" = String, Path, description = "Meetup id")),
    request_body = MeetupPayload,
    responses(
        (status = 200, description = "Meetup updated", body = MeetupResponse),
        (status = 400, description = "Validation failed, unknown meetup or past meetup"),
        (status = 401, description = "Caller is not the organizer"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update(
    service: web::Data<MeetupService>,
    user_id: UserId,
    id: web::Path<String>,
    req: web::Json<MeetupPayload>,
) -> Result<HttpResponse> {
    let meetup = service.update(user_id.0, &id, req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(MeetupResponse::from(meetup)))
}

/// Cancel a meetup organized by the caller
#[utoipa::path(
    delete,
    path = "/api/v1/meetups/{id}",
    tag = "meetups",
    params(("id" = String, Path, description = "Meetup id")),
    responses(
        (status = 200, description = "Meetup deleted"),
        (status = 400, description = "Invalid id, unknown meetup or past meetup"),
        (status = 401, description = "Caller is not the organizer"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete(
    service: web::Data<MeetupService>,
    user_id: UserId,
    id: web::Path<String>,
) -> Result<HttpResponse> {
    service.delete(user_id.0, &id).await?;
    Ok(HttpResponse::Ok().finish())
}
