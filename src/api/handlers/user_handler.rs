//! User handlers.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};

use crate::api::extractors::ValidatedJson;
use crate::api::links::{user_links, with_links};
use crate::api::middleware::{require_admin, require_owner, Principal};
use crate::api::AppState;
use crate::domain::{ReadUser, UpdateUser};
use crate::errors::AppResult;
use crate::types::{CollectionModel, EntityModel, PageLinkBase, PaginationParams};

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/by-name/:name", get(get_user_by_name))
        .route("/:id", get(get_user).patch(update_user).delete(delete_user))
}

/// List all users (admin only)
#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "Page of users with navigation links"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only")
    )
)]
pub async fn list_users(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<CollectionModel<ReadUser>>> {
    require_admin(&principal)?;

    let page = state.user_service.list(params).await?.map(ReadUser::from);
    Ok(Json(CollectionModel::from_page(
        page,
        &PageLinkBase::new("/users"),
        user_links,
    )))
}

/// Get user by ID (own profile or admin)
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User profile", body = ReadUser),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Can only view own profile unless admin"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<EntityModel<ReadUser>>> {
    require_owner(&principal, id)?;

    let user = state.user_service.find_by_id(id).await?;
    Ok(Json(with_links(ReadUser::from(user), user_links)))
}

/// Get user by username (own profile or admin)
#[utoipa::path(
    get,
    path = "/users/by-name/{name}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("name" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "User profile", body = ReadUser),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Can only view own profile unless admin"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_by_name(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<EntityModel<ReadUser>>> {
    // Ownership is decided by id; the username carried in a token may be stale
    let user = state.user_service.find_by_username(&name).await?;
    require_owner(&principal, user.id)?;

    Ok(Json(with_links(ReadUser::from(user), user_links)))
}

/// Update username, email or password (own profile or admin)
#[utoipa::path(
    patch,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated successfully", body = ReadUser),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Can only update own profile unless admin"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Username or email already taken")
    )
)]
pub async fn update_user(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateUser>,
) -> AppResult<Json<EntityModel<ReadUser>>> {
    require_owner(&principal, id)?;

    let user = state.user_service.update(id, payload).await?;
    Ok(Json(with_links(ReadUser::from(user), user_links)))
}

/// Delete a user account and its orders (own account or admin)
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted successfully"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Can only delete own account unless admin"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    require_owner(&principal, id)?;

    state.user_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
