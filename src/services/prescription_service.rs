use chrono::Utc;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::prescriptions::{
        CreatePrescriptionRequest, PrescriptionList, UpdatePrescriptionStatusRequest,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_min_role},
    models::{Prescription, PrescriptionMedication, PrescriptionStatus, Role},
    response::{ApiResponse, Meta},
    routes::params::PrescriptionQuery,
    state::AppState,
    store::{document_code, text_match},
};

pub fn list_prescriptions(
    state: &AppState,
    query: PrescriptionQuery,
) -> AppResult<ApiResponse<PrescriptionList>> {
    let (page, limit, offset) = query.pagination.normalize();
    let tables = state.store.read()?;

    let mut items: Vec<Prescription> = tables
        .prescriptions
        .iter()
        .filter(|rx| match query.q.as_ref().filter(|s| !s.is_empty()) {
            Some(q) => text_match(q, &[&rx.rx_number, &rx.patient_name, &rx.doctor_name]),
            None => true,
        })
        .filter(|rx| match query.status {
            Some(status) => rx.status == status,
            None => true,
        })
        .cloned()
        .collect();
    items.sort_by_key(|rx| std::cmp::Reverse(rx.created_at));

    let total = items.len() as i64;
    let items: Vec<Prescription> = items
        .into_iter()
        .skip(offset as usize)
        .take(limit as usize)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Prescriptions",
        PrescriptionList { items },
        Some(meta),
    ))
}

pub fn get_prescription(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Prescription>> {
    let tables = state.store.read()?;
    let prescription = tables
        .prescriptions
        .iter()
        .find(|rx| rx.id == id)
        .cloned()
        .ok_or(AppError::NotFound)?;

    Ok(ApiResponse::success("Prescription", prescription, None))
}

pub fn create_prescription(
    state: &AppState,
    user: &AuthUser,
    payload: CreatePrescriptionRequest,
) -> AppResult<ApiResponse<Prescription>> {
    ensure_min_role(user, Role::Pharmacist)?;

    if payload.medications.is_empty() {
        return Err(AppError::BadRequest(
            "Prescription has no medications".into(),
        ));
    }
    if payload.medications.iter().any(|med| med.quantity <= 0) {
        return Err(AppError::BadRequest(
            "quantity must be greater than 0".into(),
        ));
    }

    let prescription = {
        let mut tables = state.store.write()?;

        if let Some(member_id) = payload.member_id {
            if !tables.members.iter().any(|m| m.id == member_id) {
                return Err(AppError::BadRequest("Member not found".into()));
            }
        }

        let now = Utc::now();
        let id = Uuid::new_v4();
        let prescription = Prescription {
            id,
            rx_number: document_code("RX", id),
            patient_name: payload.patient_name,
            member_id: payload.member_id,
            doctor_name: payload.doctor_name,
            medications: payload
                .medications
                .into_iter()
                .map(|med| PrescriptionMedication {
                    name: med.name,
                    dosage: med.dosage,
                    quantity: med.quantity,
                    instructions: med.instructions,
                })
                .collect(),
            status: PrescriptionStatus::PendingReview,
            reviewed_by: None,
            reviewed_at: None,
            notes: payload.notes,
            created_at: now,
            updated_at: now,
        };
        tables.prescriptions.push(prescription.clone());
        prescription
    };

    if let Err(err) = log_audit(
        state,
        Some(user.user_id),
        "prescription_create",
        Some("prescriptions"),
        Some(serde_json::json!({
            "prescription_id": prescription.id,
            "rx_number": prescription.rx_number,
        })),
    ) {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Prescription created",
        prescription,
        Some(Meta::empty()),
    ))
}

/// Any status can be set from any status; the screen offers the full list.
pub fn update_prescription_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdatePrescriptionStatusRequest,
) -> AppResult<ApiResponse<Prescription>> {
    ensure_min_role(user, Role::Pharmacist)?;

    let prescription = {
        let mut tables = state.store.write()?;
        let existing = tables
            .prescriptions
            .iter_mut()
            .find(|rx| rx.id == id)
            .ok_or(AppError::NotFound)?;

        let now = Utc::now();
        existing.status = payload.status;
        existing.reviewed_by = Some(user.name.clone());
        existing.reviewed_at = Some(now);
        if payload.notes.is_some() {
            existing.notes = payload.notes;
        }
        existing.updated_at = now;
        existing.clone()
    };

    if let Err(err) = log_audit(
        state,
        Some(user.user_id),
        "prescription_review",
        Some("prescriptions"),
        Some(serde_json::json!({
            "prescription_id": prescription.id,
            "status": prescription.status,
        })),
    ) {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Prescription updated",
        prescription,
        Some(Meta::empty()),
    ))
}
