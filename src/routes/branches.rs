use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch},
};
use uuid::Uuid;

use crate::{
    dto::branches::{
        BranchList, CreateTransferRequest, TransferList, UpdateBranchRequest,
        UpdateTransferStatusRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::{Branch, StockTransfer},
    response::ApiResponse,
    routes::params::{BranchQuery, TransferQuery},
    services::branch_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_branches))
        .route("/transfers", get(list_transfers).post(create_transfer))
        .route("/transfers/{id}", get(get_transfer))
        .route("/transfers/{id}/status", patch(update_transfer_status))
        .route("/{id}", get(get_branch).put(update_branch))
}

#[utoipa::path(
    get,
    path = "/api/branches",
    params(
        ("q" = Option<String>, Query, description = "Match against name, code or manager")
    ),
    responses(
        (status = 200, description = "List branches", body = ApiResponse<BranchList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Branches"
)]
pub async fn list_branches(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<BranchQuery>,
) -> AppResult<Json<ApiResponse<BranchList>>> {
    let resp = branch_service::list_branches(&state, query)?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/branches/{id}",
    params(
        ("id" = Uuid, Path, description = "Branch ID")
    ),
    responses(
        (status = 200, description = "Get branch", body = ApiResponse<Branch>),
        (status = 404, description = "Branch not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Branches"
)]
pub async fn get_branch(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Branch>>> {
    let resp = branch_service::get_branch(&state, id)?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/branches/{id}",
    params(
        ("id" = Uuid, Path, description = "Branch ID")
    ),
    request_body = UpdateBranchRequest,
    responses(
        (status = 200, description = "Updated branch", body = ApiResponse<Branch>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Branch not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Branches"
)]
pub async fn update_branch(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateBranchRequest>,
) -> AppResult<Json<ApiResponse<Branch>>> {
    let resp = branch_service::update_branch(&state, &user, id, payload)?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/branches/transfers",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("q" = Option<String>, Query, description = "Match against transfer code"),
        ("status" = Option<String>, Query, description = "Filter by status: pending, in_transit, completed, cancelled"),
        ("branch_id" = Option<Uuid>, Query, description = "Transfers touching this branch, either side")
    ),
    responses(
        (status = 200, description = "List stock transfers", body = ApiResponse<TransferList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Branches"
)]
pub async fn list_transfers(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<TransferQuery>,
) -> AppResult<Json<ApiResponse<TransferList>>> {
    let resp = branch_service::list_transfers(&state, query)?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/branches/transfers/{id}",
    params(
        ("id" = Uuid, Path, description = "Transfer ID")
    ),
    responses(
        (status = 200, description = "Get stock transfer", body = ApiResponse<StockTransfer>),
        (status = 404, description = "Transfer not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Branches"
)]
pub async fn get_transfer(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<StockTransfer>>> {
    let resp = branch_service::get_transfer(&state, id)?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/branches/transfers",
    request_body = CreateTransferRequest,
    responses(
        (status = 200, description = "Create stock transfer", body = ApiResponse<StockTransfer>),
        (status = 400, description = "Same branch twice, no items or unknown product"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Branches"
)]
pub async fn create_transfer(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateTransferRequest>,
) -> AppResult<Json<ApiResponse<StockTransfer>>> {
    let resp = branch_service::create_transfer(&state, &user, payload)?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/branches/transfers/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Transfer ID")
    ),
    request_body = UpdateTransferStatusRequest,
    responses(
        (status = 200, description = "Update transfer status", body = ApiResponse<StockTransfer>),
        (status = 400, description = "Transfer already finalized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Transfer not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Branches"
)]
pub async fn update_transfer_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTransferStatusRequest>,
) -> AppResult<Json<ApiResponse<StockTransfer>>> {
    let resp = branch_service::update_transfer_status(&state, &user, id, payload)?;
    Ok(Json(resp))
}
