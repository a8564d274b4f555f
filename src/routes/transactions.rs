use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::transactions::{TransactionList, TransactionStats},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Transaction,
    response::ApiResponse,
    routes::params::TransactionQuery,
    services::transaction_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_transactions))
        .route("/stats", get(transaction_stats))
        .route("/{id}", get(get_transaction))
        .route("/{id}/void", post(void_transaction))
}

#[utoipa::path(
    get,
    path = "/api/transactions",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("q" = Option<String>, Query, description = "Match against receipt number or cashier"),
        ("status" = Option<String>, Query, description = "Filter by status: completed, voided"),
        ("payment_method" = Option<String>, Query, description = "Filter by method: cash, debit, credit, qris"),
        ("from" = Option<String>, Query, description = "Earliest sale date, YYYY-MM-DD"),
        ("to" = Option<String>, Query, description = "Latest sale date, YYYY-MM-DD"),
        ("sort_order" = Option<String>, Query, description = "Sort order: asc, desc")
    ),
    responses(
        (status = 200, description = "Sales history", body = ApiResponse<TransactionList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Transactions"
)]
pub async fn list_transactions(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<TransactionQuery>,
) -> AppResult<Json<ApiResponse<TransactionList>>> {
    let resp = transaction_service::list_transactions(&state, query)?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/transactions/stats",
    responses(
        (status = 200, description = "Sales statistics", body = ApiResponse<TransactionStats>)
    ),
    security(("bearer_auth" = [])),
    tag = "Transactions"
)]
pub async fn transaction_stats(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<ApiResponse<TransactionStats>>> {
    let resp = transaction_service::transaction_stats(&state)?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/transactions/{id}",
    params(
        ("id" = Uuid, Path, description = "Transaction ID")
    ),
    responses(
        (status = 200, description = "Receipt detail", body = ApiResponse<Transaction>),
        (status = 404, description = "Transaction not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Transactions"
)]
pub async fn get_transaction(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Transaction>>> {
    let resp = transaction_service::get_transaction(&state, id)?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/transactions/{id}/void",
    params(
        ("id" = Uuid, Path, description = "Transaction ID")
    ),
    responses(
        (status = 200, description = "Void a sale", body = ApiResponse<Transaction>),
        (status = 400, description = "Already voided"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Transaction not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Transactions"
)]
pub async fn void_transaction(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Transaction>>> {
    let resp = transaction_service::void_transaction(&state, &user, id)?;
    Ok(Json(resp))
}
