use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    audit,
    error::AppResult,
    middleware::auth::AuthUser,
    models::AuditEntry,
    response::ApiResponse,
    routes::params::AuditQuery,
    state::AppState,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct AuditList {
    pub items: Vec<AuditEntry>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/audit", get(list_audit))
}

#[utoipa::path(
    get,
    path = "/api/admin/audit",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("action" = Option<String>, Query, description = "Match against the action name")
    ),
    responses(
        (status = 200, description = "Audit trail, newest first", body = ApiResponse<AuditList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_audit(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<AuditQuery>,
) -> AppResult<Json<ApiResponse<AuditList>>> {
    let resp = audit::list_audit(&state, &user, query)?;
    Ok(Json(resp))
}
