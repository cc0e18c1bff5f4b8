//! OpenAPI documentation for the vote API.
//!
//! Registers the vote and health handlers plus the schema wrappers from
//! [`crate::inbound::http::schemas`]. Served by Swagger UI in debug builds and
//! printed by the `openapi-dump` binary.

use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema, TallySnapshotSchema};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Adds the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Private session cookie written by the external login flow.",
            ))),
        );
    }
}

/// OpenAPI document for the vote API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "fact.check vote API",
        description = "Up/down votes and running tallies for web domains."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::votes::get_votes,
        crate::inbound::http::votes::vote,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(TallySnapshotSchema, ErrorSchema, ErrorCodeSchema)),
    tags(
        (name = "votes", description = "Vote tallies per domain or subpage"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
