//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    auth_handler, certificate_handler, order_handler, tag_handler, user_handler,
};
use crate::domain::{
    CreateCertificate, CreateTag, CreateUser, ReadCertificate, ReadOrder, ReadTag, ReadUser,
    Role, SortField, SortOrder, UpdateCertificate, UpdateTag, UpdateUser,
};
use crate::services::TokenResponse;
use crate::types::{Link, PaginationMeta};

/// OpenAPI documentation for the Gift Certificates API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Gift Certificates API",
        version = "0.1.0",
        description = "Gift certificates, tags, users and orders behind JWT authentication",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        auth_handler::register,
        auth_handler::login,
        user_handler::list_users,
        user_handler::get_user,
        user_handler::get_user_by_name,
        user_handler::update_user,
        user_handler::delete_user,
        order_handler::list_orders,
        order_handler::purchase_certificate,
        order_handler::list_user_orders,
        order_handler::get_user_order,
        order_handler::delete_order,
        tag_handler::list_tags,
        tag_handler::most_popular_tag,
        tag_handler::get_tag,
        tag_handler::create_tag,
        tag_handler::update_tag,
        tag_handler::delete_tag,
        certificate_handler::search_certificates,
        certificate_handler::get_certificate,
        certificate_handler::create_certificate,
        certificate_handler::update_certificate,
        certificate_handler::delete_certificate,
        certificate_handler::attach_tag,
    ),
    components(
        schemas(
            Role,
            ReadUser,
            CreateUser,
            UpdateUser,
            ReadTag,
            CreateTag,
            UpdateTag,
            ReadCertificate,
            CreateCertificate,
            UpdateCertificate,
            SortField,
            SortOrder,
            ReadOrder,
            Link,
            PaginationMeta,
            auth_handler::LoginRequest,
            TokenResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "User registration and login"),
        (name = "Users", description = "User management operations"),
        (name = "Orders", description = "Certificate purchases"),
        (name = "Tags", description = "Tag management"),
        (name = "Certificates", description = "Gift certificate management and search")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /auth/login"))
                        .build(),
                ),
            );
        }
    }
}
