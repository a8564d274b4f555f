use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch},
};
use uuid::Uuid;

use crate::{
    dto::prescriptions::{
        CreatePrescriptionRequest, PrescriptionList, UpdatePrescriptionStatusRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::Prescription,
    response::ApiResponse,
    routes::params::PrescriptionQuery,
    services::prescription_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_prescriptions).post(create_prescription))
        .route("/{id}", get(get_prescription))
        .route("/{id}/status", patch(update_prescription_status))
}

#[utoipa::path(
    get,
    path = "/api/prescriptions",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("q" = Option<String>, Query, description = "Match against RX number, patient or doctor"),
        ("status" = Option<String>, Query, description = "Filter by status: pending_review, approved, rejected, dispensed")
    ),
    responses(
        (status = 200, description = "List prescriptions", body = ApiResponse<PrescriptionList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Prescriptions"
)]
pub async fn list_prescriptions(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<PrescriptionQuery>,
) -> AppResult<Json<ApiResponse<PrescriptionList>>> {
    let resp = prescription_service::list_prescriptions(&state, query)?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/prescriptions/{id}",
    params(
        ("id" = Uuid, Path, description = "Prescription ID")
    ),
    responses(
        (status = 200, description = "Get prescription", body = ApiResponse<Prescription>),
        (status = 404, description = "Prescription not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Prescriptions"
)]
pub async fn get_prescription(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Prescription>>> {
    let resp = prescription_service::get_prescription(&state, id)?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/prescriptions",
    request_body = CreatePrescriptionRequest,
    responses(
        (status = 200, description = "Create prescription", body = ApiResponse<Prescription>),
        (status = 400, description = "No medications or bad quantity"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Prescriptions"
)]
pub async fn create_prescription(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreatePrescriptionRequest>,
) -> AppResult<Json<ApiResponse<Prescription>>> {
    let resp = prescription_service::create_prescription(&state, &user, payload)?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/prescriptions/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Prescription ID")
    ),
    request_body = UpdatePrescriptionStatusRequest,
    responses(
        (status = 200, description = "Review prescription", body = ApiResponse<Prescription>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Prescription not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Prescriptions"
)]
pub async fn update_prescription_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePrescriptionStatusRequest>,
) -> AppResult<Json<ApiResponse<Prescription>>> {
    let resp = prescription_service::update_prescription_status(&state, &user, id, payload)?;
    Ok(Json(resp))
}
