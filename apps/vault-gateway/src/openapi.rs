use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Registers the `bearer_auth` scheme referenced by protected operations.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(crate::api::admin::admin_health),
    components(
        schemas(axum_helpers::ErrorResponse, axum_helpers::HealthResponse)
    ),
    info(
        title = "Vault Gateway API",
        version = "0.1.0",
        description = "Member signup/login, vault record ingestion and semantic search"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    modifiers(&BearerAuth),
    nest(
        (path = "/v1/auth", api = domain_accounts::ApiDoc),
        (path = "/v1/vault", api = domain_vault::ApiDoc)
    ),
    tags(
        (name = crate::api::admin::TAG, description = "Operational status")
    )
)]
pub struct ApiDoc;
