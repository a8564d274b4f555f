use axum::{Json, Router, extract::State, routing::post};

use crate::{
    dto::pos::CheckoutRequest,
    error::AppResult,
    middleware::auth::AuthUser,
    models::Transaction,
    response::ApiResponse,
    services::pos_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/checkout", post(checkout))
}

#[utoipa::path(
    post,
    path = "/api/pos/checkout",
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Finalize a sale", body = ApiResponse<Transaction>),
        (status = 400, description = "Empty cart, bad quantity or unknown product"),
    ),
    security(("bearer_auth" = [])),
    tag = "POS"
)]
pub async fn checkout(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<Json<ApiResponse<Transaction>>> {
    let resp = pos_service::checkout(&state, &user, payload)?;
    Ok(Json(resp))
}
