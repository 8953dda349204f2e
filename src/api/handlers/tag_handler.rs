//! Tag handlers.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};

use crate::api::extractors::ValidatedJson;
use crate::api::links::{tag_links, with_links};
use crate::api::middleware::{require_admin, require_any_role, Principal};
use crate::api::AppState;
use crate::domain::{CreateTag, ReadTag, Role, UpdateTag};
use crate::errors::AppResult;
use crate::types::{CollectionModel, EntityModel, PageLinkBase, PaginationParams};

/// Create tag routes
pub fn tag_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tags).post(create_tag))
        .route("/popular", get(most_popular_tag))
        .route("/:id", get(get_tag).patch(update_tag).delete(delete_tag))
}

/// List tags page by page
#[utoipa::path(
    get,
    path = "/tags",
    tag = "Tags",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "Page of tags with navigation links"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_tags(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<CollectionModel<ReadTag>>> {
    require_any_role(&principal, &[Role::Admin, Role::User])?;

    let page = state.tag_service.list(params).await?.map(ReadTag::from);
    Ok(Json(CollectionModel::from_page(
        page,
        &PageLinkBase::new("/tags"),
        tag_links,
    )))
}

/// Most used tag of the user with the highest total order cost
#[utoipa::path(
    get,
    path = "/tags/popular",
    tag = "Tags",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Most popular tag", body = ReadTag),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No orders yet")
    )
)]
pub async fn most_popular_tag(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
) -> AppResult<Json<EntityModel<ReadTag>>> {
    require_any_role(&principal, &[Role::Admin, Role::User])?;

    let tag = state.tag_service.most_popular_tag().await?;
    Ok(Json(with_links(ReadTag::from(tag), tag_links)))
}

/// Get tag by ID
#[utoipa::path(
    get,
    path = "/tags/{id}",
    tag = "Tags",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Tag ID")),
    responses(
        (status = 200, description = "Tag", body = ReadTag),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Tag not found")
    )
)]
pub async fn get_tag(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<EntityModel<ReadTag>>> {
    require_any_role(&principal, &[Role::Admin, Role::User])?;

    let tag = state.tag_service.find_by_id(id).await?;
    Ok(Json(with_links(ReadTag::from(tag), tag_links)))
}

/// Create a tag (admin only)
#[utoipa::path(
    post,
    path = "/tags",
    tag = "Tags",
    security(("bearer_auth" = [])),
    request_body = CreateTag,
    responses(
        (status = 201, description = "Tag created", body = ReadTag),
        (status = 400, description = "Validation error or name already taken"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only")
    )
)]
pub async fn create_tag(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateTag>,
) -> AppResult<(StatusCode, Json<EntityModel<ReadTag>>)> {
    require_admin(&principal)?;

    let tag = state.tag_service.save(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(with_links(ReadTag::from(tag), tag_links)),
    ))
}

/// Rename a tag (admin only)
#[utoipa::path(
    patch,
    path = "/tags/{id}",
    tag = "Tags",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Tag ID")),
    request_body = UpdateTag,
    responses(
        (status = 200, description = "Tag renamed", body = ReadTag),
        (status = 400, description = "Validation error or name already taken"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Tag not found")
    )
)]
pub async fn update_tag(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateTag>,
) -> AppResult<Json<EntityModel<ReadTag>>> {
    require_admin(&principal)?;

    let tag = state.tag_service.update(id, payload).await?;
    Ok(Json(with_links(ReadTag::from(tag), tag_links)))
}

/// Delete a tag (admin only)
#[utoipa::path(
    delete,
    path = "/tags/{id}",
    tag = "Tags",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Tag ID")),
    responses(
        (status = 204, description = "Tag deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Tag not found")
    )
)]
pub async fn delete_tag(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    require_admin(&principal)?;

    state.tag_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
