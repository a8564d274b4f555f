use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::members::{CreateMemberRequest, MemberList, PurchaseHistory, UpdateMemberRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Member,
    response::ApiResponse,
    routes::params::{MemberQuery, MemberSearchQuery},
    services::member_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_members).post(create_member))
        .route("/search", get(search_members))
        .route(
            "/{id}",
            get(get_member).put(update_member).delete(delete_member),
        )
        .route("/{id}/history", get(purchase_history))
}

#[utoipa::path(
    get,
    path = "/api/members",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("q" = Option<String>, Query, description = "Match against name, phone or email"),
        ("membership_type" = Option<String>, Query, description = "Filter by tier: regular, silver, gold")
    ),
    responses(
        (status = 200, description = "List members", body = ApiResponse<MemberList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Members"
)]
pub async fn list_members(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<MemberQuery>,
) -> AppResult<Json<ApiResponse<MemberList>>> {
    let resp = member_service::list_members(&state, query)?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/members/search",
    params(
        ("q" = String, Query, description = "Match against name, phone or email"),
        ("limit" = Option<i64>, Query, description = "Result cap, default 10")
    ),
    responses(
        (status = 200, description = "Member lookup for the register", body = ApiResponse<MemberList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Members"
)]
pub async fn search_members(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<MemberSearchQuery>,
) -> AppResult<Json<ApiResponse<MemberList>>> {
    let resp = member_service::search_members(&state, query)?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/members/{id}",
    params(
        ("id" = Uuid, Path, description = "Member ID")
    ),
    responses(
        (status = 200, description = "Get member", body = ApiResponse<Member>),
        (status = 404, description = "Member not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Members"
)]
pub async fn get_member(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Member>>> {
    let resp = member_service::get_member(&state, id)?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/members",
    request_body = CreateMemberRequest,
    responses(
        (status = 200, description = "Create member", body = ApiResponse<Member>),
        (status = 400, description = "Duplicate phone number"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Members"
)]
pub async fn create_member(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateMemberRequest>,
) -> AppResult<Json<ApiResponse<Member>>> {
    let resp = member_service::create_member(&state, &user, payload)?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/members/{id}",
    params(
        ("id" = Uuid, Path, description = "Member ID")
    ),
    request_body = UpdateMemberRequest,
    responses(
        (status = 200, description = "Updated member", body = ApiResponse<Member>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Member not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Members"
)]
pub async fn update_member(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMemberRequest>,
) -> AppResult<Json<ApiResponse<Member>>> {
    let resp = member_service::update_member(&state, &user, id, payload)?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/members/{id}",
    params(
        ("id" = Uuid, Path, description = "Member ID")
    ),
    responses(
        (status = 200, description = "Deleted member", body = ApiResponse<serde_json::Value>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Member not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Members"
)]
pub async fn delete_member(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = member_service::delete_member(&state, &user, id)?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/members/{id}/history",
    params(
        ("id" = Uuid, Path, description = "Member ID")
    ),
    responses(
        (status = 200, description = "Purchase history", body = ApiResponse<PurchaseHistory>),
        (status = 404, description = "Member not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Members"
)]
pub async fn purchase_history(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<PurchaseHistory>>> {
    let resp = member_service::purchase_history(&state, id)?;
    Ok(Json(resp))
}
