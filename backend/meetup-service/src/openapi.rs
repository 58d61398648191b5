/// OpenAPI documentation for the Meetapp Meetup Service
use crate::handlers::meetups;
use crate::models::{MeetupPayload, MeetupResponse};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Meetapp Meetup Service API",
        version = "1.0.0",
        description = "Meetups organized by the authenticated user: listing, creation, updates and cancellation. Meetups in the past are read-only.",
        contact(
            name = "Meetapp Team",
            email = "team@meetapp.dev"
        ),
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:8085", description = "Development server"),
    ),
    paths(
        meetups::index,
        meetups::show,
        meetups::store,
        meetups::update,
        meetups::delete,
    ),
    components(schemas(MeetupPayload, MeetupResponse)),
    tags(
        (name = "meetups", description = "Meetups organized by the caller"),
    ),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("RS256 access token issued by the session service"))
                        .build(),
                ),
            )
        }
    }
}

impl ApiDoc {
    pub fn openapi_json_path() -> &'static str {
        "/api/v1/openapi.json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_meetup_routes() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        assert!(paths.contains_key("/api/v1/meetups"));
        assert!(paths.contains_key("/api/v1/meetups/{id}"));

        let json = serde_json::to_value(&doc).unwrap();
        assert!(json["components"]["securitySchemes"]["bearer_auth"].is_object());
        assert!(json["components"]["schemas"]["MeetupResponse"].is_object());
    }
}
