//! Order handlers, nested under `/users`.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};

use crate::api::links::{order_links, user_href, with_links};
use crate::api::middleware::{require_admin, require_owner, Principal};
use crate::api::AppState;
use crate::domain::{PurchaseQuery, ReadOrder};
use crate::errors::AppResult;
use crate::types::{CollectionModel, EntityModel, PageLinkBase, PaginationParams};

/// Create order routes
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list_orders))
        .route("/:id/orders", get(list_user_orders).post(purchase_certificate))
        .route(
            "/:id/orders/:order_id",
            get(get_user_order).delete(delete_order),
        )
}

/// List every order (admin only)
#[utoipa::path(
    get,
    path = "/users/orders",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "Page of orders with navigation links"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only")
    )
)]
pub async fn list_orders(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<CollectionModel<ReadOrder>>> {
    require_admin(&principal)?;

    let page = state.order_service.list(params).await?.map(ReadOrder::from);
    Ok(Json(CollectionModel::from_page(
        page,
        &PageLinkBase::new("/users/orders"),
        order_links,
    )))
}

/// Buy a certificate for the user (owner or admin)
#[utoipa::path(
    post,
    path = "/users/{id}/orders",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID"), PurchaseQuery),
    responses(
        (status = 201, description = "Order created", body = ReadOrder),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Can only buy for yourself unless admin"),
        (status = 404, description = "User or certificate not found")
    )
)]
pub async fn purchase_certificate(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<PurchaseQuery>,
) -> AppResult<(StatusCode, Json<EntityModel<ReadOrder>>)> {
    require_owner(&principal, id)?;

    let order = state
        .user_service
        .purchase_certificate(id, query.certificate_id)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(with_links(ReadOrder::from(order), order_links)),
    ))
}

/// List the orders of one user (owner or admin)
#[utoipa::path(
    get,
    path = "/users/{id}/orders",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID"), PaginationParams),
    responses(
        (status = 200, description = "Page of the user's orders with navigation links"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Can only view own orders unless admin"),
        (status = 404, description = "User not found")
    )
)]
pub async fn list_user_orders(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<CollectionModel<ReadOrder>>> {
    require_owner(&principal, id)?;

    let page = state
        .order_service
        .list_by_user(id, params)
        .await?
        .map(ReadOrder::from);
    let base = PageLinkBase::new(format!("{}/orders", user_href(id)));
    Ok(Json(CollectionModel::from_page(page, &base, order_links)))
}

/// Get one order of a user (owner or admin)
#[utoipa::path(
    get,
    path = "/users/{id}/orders/{order_id}",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "User ID"),
        ("order_id" = i32, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order", body = ReadOrder),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Can only view own orders unless admin"),
        (status = 404, description = "Order not found for this user")
    )
)]
pub async fn get_user_order(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path((id, order_id)): Path<(i32, i32)>,
) -> AppResult<Json<EntityModel<ReadOrder>>> {
    require_owner(&principal, id)?;

    let order = state.order_service.find_for_user(id, order_id).await?;
    Ok(Json(with_links(ReadOrder::from(order), order_links)))
}

/// Delete an order (admin only)
#[utoipa::path(
    delete,
    path = "/users/{id}/orders/{order_id}",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "User ID"),
        ("order_id" = i32, Path, description = "Order ID")
    ),
    responses(
        (status = 204, description = "Order deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Order not found for this user")
    )
)]
pub async fn delete_order(
    Extension(principal): Extension<Principal>,
    State(state): State<AppState>,
    Path((id, order_id)): Path<(i32, i32)>,
) -> AppResult<StatusCode> {
    require_admin(&principal)?;

    // The order must belong to the user named in the path
    state.order_service.find_for_user(id, order_id).await?;
    state.order_service.delete(order_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
