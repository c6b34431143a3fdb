//! OpenAPI documentation configuration

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Combined OpenAPI documentation for all APIs
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Marketplace API",
        version = "0.1.0",
        description = "Second-hand fashion marketplace: categories, product listings, carts and seller profiles",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:4040", description = "Local development server")
    ),
    modifiers(&BearerAuth),
    nest(
        (path = "/api/v1/categories", api = domain_categories::ApiDoc),
        (path = "/api/v1/products", api = domain_products::ApiDoc),
        (path = "/api/v1/cart", api = domain_carts::ApiDoc),
        (path = "/api/v1/profile", api = domain_users::ApiDoc)
    )
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` scheme the handlers reference.
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
