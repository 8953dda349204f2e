//! Gift certificate handlers.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, put},
    Router,
};

use crate::api::extractors::ValidatedJson;
use crate::api::links::{certificate_links, with_links};
use crate::api::middleware::{require_admin, require_any_role, Principal};
use crate::api::AppState;
use crate::domain::{
    CertificateFilter, CertificateQuery, CreateCertificate, ReadCertificate, Role,
    UpdateCertificate,
};
use crate::errors::AppResult;
use crate::types::{CollectionModel, EntityModel, PageLinkBase, PaginationParams};

/// Create certificate routes
pub fn certificate_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(search_certificates).post(create_certificate))
        .route(
            "/:id",
            get(get_certificate)
                .patch(update_certificate)
                .delete(delete_certificate),
        )
        .route("/:id/tags/:tag_id", put(attach_tag))
}

/// Page links repeat the search criteria so navigation keeps the filter
fn search_link_base(filter: &CertificateFilter) -> PageLinkBase {
    let tags = (!filter.tags.is_empty()).then(|| filter.tags.join(","));

    PageLinkBase::new("/certificates")
        .with_optional_param("tags", tags)
        .with_optional_param("search", filter.search.clone())
        .with_param("sort", filter.sort.as_str())
        .with_param("order", filter.order.as_str())
}

/// Search certificates by tags and text, sorted and paged
#[utoipa::path(
    get,
    path = "/certificates",
    tag = "Certificates",
    security(("bearer_auth" = [])),
    params(PaginationParams, CertificateQuery),
    responses(
        (status = 200, description = "Page of certificates with navigation links"),
        (status = 400, description = "Unknown sort field or order"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn search_certificates(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
    Query(query): Query<CertificateQuery>,
) -> AppResult<Json<CollectionModel<ReadCertificate>>> {
    require_any_role(&principal, &[Role::Admin, Role::User])?;

    let filter = CertificateFilter::from(query);
    let base = search_link_base(&filter);

    let page = state
        .certificate_service
        .search(filter, params)
        .await?
        .map(ReadCertificate::from);

    Ok(Json(CollectionModel::from_page(page, &base, certificate_links)))
}

/// Get certificate by ID
#[utoipa::path(
    get,
    path = "/certificates/{id}",
    tag = "Certificates",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Certificate ID")),
    responses(
        (status = 200, description = "Certificate", body = ReadCertificate),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Certificate not found")
    )
)]
pub async fn get_certificate(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<EntityModel<ReadCertificate>>> {
    require_any_role(&principal, &[Role::Admin, Role::User])?;

    let certificate = state.certificate_service.find_by_id(id).await?;
    Ok(Json(with_links(
        ReadCertificate::from(certificate),
        certificate_links,
    )))
}

/// Create a certificate (admin only). Missing tags are created.
#[utoipa::path(
    post,
    path = "/certificates",
    tag = "Certificates",
    security(("bearer_auth" = [])),
    request_body = CreateCertificate,
    responses(
        (status = 201, description = "Certificate created", body = ReadCertificate),
        (status = 400, description = "Validation error or duplicate tags"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only")
    )
)]
pub async fn create_certificate(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateCertificate>,
) -> AppResult<(StatusCode, Json<EntityModel<ReadCertificate>>)> {
    require_admin(&principal)?;

    let certificate = state.certificate_service.save(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(with_links(
            ReadCertificate::from(certificate),
            certificate_links,
        )),
    ))
}

/// Partially update a certificate (admin only)
#[utoipa::path(
    patch,
    path = "/certificates/{id}",
    tag = "Certificates",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Certificate ID")),
    request_body = UpdateCertificate,
    responses(
        (status = 200, description = "Certificate updated", body = ReadCertificate),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Certificate not found")
    )
)]
pub async fn update_certificate(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateCertificate>,
) -> AppResult<Json<EntityModel<ReadCertificate>>> {
    require_admin(&principal)?;

    let certificate = state.certificate_service.update(id, payload).await?;
    Ok(Json(with_links(
        ReadCertificate::from(certificate),
        certificate_links,
    )))
}

/// Delete a certificate that was never ordered (admin only)
#[utoipa::path(
    delete,
    path = "/certificates/{id}",
    tag = "Certificates",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Certificate ID")),
    responses(
        (status = 204, description = "Certificate deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Certificate not found"),
        (status = 409, description = "Certificate has orders")
    )
)]
pub async fn delete_certificate(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    require_admin(&principal)?;

    state.certificate_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Attach an existing tag to a certificate (admin only)
#[utoipa::path(
    put,
    path = "/certificates/{id}/tags/{tag_id}",
    tag = "Certificates",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Certificate ID"),
        ("tag_id" = i32, Path, description = "Tag ID")
    ),
    responses(
        (status = 200, description = "Certificate with the tag attached", body = ReadCertificate),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Certificate or tag not found")
    )
)]
pub async fn attach_tag(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path((id, tag_id)): Path<(i32, i32)>,
) -> AppResult<Json<EntityModel<ReadCertificate>>> {
    require_admin(&principal)?;

    let certificate = state.tag_service.attach_to_certificate(tag_id, id).await?;
    Ok(Json(with_links(
        ReadCertificate::from(certificate),
        certificate_links,
    )))
}
