use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch},
};
use uuid::Uuid;

use crate::{
    dto::preorders::{CreatePreOrderRequest, PreOrderList, UpdatePreOrderStatusRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::PreOrder,
    response::ApiResponse,
    routes::params::PreOrderQuery,
    services::preorder_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_preorders).post(create_preorder))
        .route("/{id}", get(get_preorder).delete(delete_preorder))
        .route("/{id}/status", patch(update_preorder_status))
}

#[utoipa::path(
    get,
    path = "/api/preorders",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("q" = Option<String>, Query, description = "Match against code, customer or phone"),
        ("status" = Option<String>, Query, description = "Filter by status: pending, confirmed, ready, picked_up, cancelled"),
        ("priority" = Option<String>, Query, description = "Filter by priority: normal, high, urgent")
    ),
    responses(
        (status = 200, description = "List pre-orders", body = ApiResponse<PreOrderList>)
    ),
    security(("bearer_auth" = [])),
    tag = "PreOrders"
)]
pub async fn list_preorders(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<PreOrderQuery>,
) -> AppResult<Json<ApiResponse<PreOrderList>>> {
    let resp = preorder_service::list_preorders(&state, query)?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/preorders/{id}",
    params(
        ("id" = Uuid, Path, description = "Pre-order ID")
    ),
    responses(
        (status = 200, description = "Get pre-order", body = ApiResponse<PreOrder>),
        (status = 404, description = "Pre-order not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "PreOrders"
)]
pub async fn get_preorder(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<PreOrder>>> {
    let resp = preorder_service::get_preorder(&state, id)?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/preorders",
    request_body = CreatePreOrderRequest,
    responses(
        (status = 200, description = "Create pre-order", body = ApiResponse<PreOrder>),
        (status = 400, description = "No items, bad quantity or unknown product"),
    ),
    security(("bearer_auth" = [])),
    tag = "PreOrders"
)]
pub async fn create_preorder(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreatePreOrderRequest>,
) -> AppResult<Json<ApiResponse<PreOrder>>> {
    let resp = preorder_service::create_preorder(&state, &user, payload)?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/preorders/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Pre-order ID")
    ),
    request_body = UpdatePreOrderStatusRequest,
    responses(
        (status = 200, description = "Update pre-order status", body = ApiResponse<PreOrder>),
        (status = 404, description = "Pre-order not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "PreOrders"
)]
pub async fn update_preorder_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePreOrderStatusRequest>,
) -> AppResult<Json<ApiResponse<PreOrder>>> {
    let resp = preorder_service::update_preorder_status(&state, &user, id, payload)?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/preorders/{id}",
    params(
        ("id" = Uuid, Path, description = "Pre-order ID")
    ),
    responses(
        (status = 200, description = "Deleted pre-order", body = ApiResponse<serde_json::Value>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Pre-order not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "PreOrders"
)]
pub async fn delete_preorder(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = preorder_service::delete_preorder(&state, &user, id)?;
    Ok(Json(resp))
}
