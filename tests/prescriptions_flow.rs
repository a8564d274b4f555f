use std::sync::Arc;

use pharmacare_api::{
    dto::prescriptions::{
        CreatePrescriptionRequest, MedicationEntry, UpdatePrescriptionStatusRequest,
    },
    error::AppError,
    middleware::auth::AuthUser,
    models::PrescriptionStatus,
    routes::params::{Pagination, PrescriptionQuery},
    services::prescription_service,
    state::AppState,
    store::MemStore,
};

#[test]
fn intake_then_review() -> anyhow::Result<()> {
    let state = seeded_state()?;
    let pharmacist = staff_user(&state, "pharmacist@pharmacy.com")?;

    let created = prescription_service::create_prescription(
        &state,
        &pharmacist,
        CreatePrescriptionRequest {
            patient_name: "Bambang Sutrisno".into(),
            member_id: None,
            doctor_name: "dr. Santoso".into(),
            medications: vec![MedicationEntry {
                name: "Cetirizine 10mg".into(),
                dosage: "1x daily".into(),
                quantity: 10,
                instructions: "Before bed".into(),
            }],
            notes: None,
        },
    )?
    .data
    .unwrap();
    assert!(created.rx_number.starts_with("RX-"));
    assert_eq!(created.status, PrescriptionStatus::PendingReview);
    assert!(created.reviewed_by.is_none());

    let reviewed = prescription_service::update_prescription_status(
        &state,
        &pharmacist,
        created.id,
        UpdatePrescriptionStatusRequest {
            status: PrescriptionStatus::Approved,
            notes: Some("Verified with the prescriber".into()),
        },
    )?
    .data
    .unwrap();
    assert_eq!(reviewed.status, PrescriptionStatus::Approved);
    assert_eq!(reviewed.reviewed_by.as_deref(), Some("Budi Hartono"));
    assert!(reviewed.reviewed_at.is_some());
    assert_eq!(reviewed.notes.as_deref(), Some("Verified with the prescriber"));

    let fetched = prescription_service::get_prescription(&state, created.id)?
        .data
        .unwrap();
    assert_eq!(fetched.status, PrescriptionStatus::Approved);

    Ok(())
}

#[test]
fn intake_validates_medications() -> anyhow::Result<()> {
    let state = seeded_state()?;
    let pharmacist = staff_user(&state, "pharmacist@pharmacy.com")?;

    let empty = prescription_service::create_prescription(
        &state,
        &pharmacist,
        CreatePrescriptionRequest {
            patient_name: "No Meds".into(),
            member_id: None,
            doctor_name: "dr. Pratiwi".into(),
            medications: vec![],
            notes: None,
        },
    );
    assert!(
        empty
            .unwrap_err()
            .to_string()
            .contains("Prescription has no medications")
    );

    Ok(())
}

#[test]
fn prescriptions_are_pharmacist_territory() -> anyhow::Result<()> {
    let state = seeded_state()?;
    let cashier = staff_user(&state, "cashier@pharmacy.com")?;

    let denied = prescription_service::create_prescription(
        &state,
        &cashier,
        CreatePrescriptionRequest {
            patient_name: "Blocked".into(),
            member_id: None,
            doctor_name: "dr. Santoso".into(),
            medications: vec![MedicationEntry {
                name: "Anything".into(),
                dosage: "1x".into(),
                quantity: 1,
                instructions: String::new(),
            }],
            notes: None,
        },
    );
    assert!(matches!(denied.unwrap_err(), AppError::Forbidden));

    let pending_id = {
        let tables = state.store.read()?;
        tables
            .prescriptions
            .iter()
            .find(|rx| rx.status == PrescriptionStatus::PendingReview)
            .map(|rx| rx.id)
            .expect("seeded pending prescription")
    };
    let denied_review = prescription_service::update_prescription_status(
        &state,
        &cashier,
        pending_id,
        UpdatePrescriptionStatusRequest {
            status: PrescriptionStatus::Approved,
            notes: None,
        },
    );
    assert!(matches!(denied_review.unwrap_err(), AppError::Forbidden));

    Ok(())
}

// There is no state machine here; the screen can move a slip anywhere.
#[test]
fn review_can_reverse_a_dispensed_slip() -> anyhow::Result<()> {
    let state = seeded_state()?;
    let pharmacist = staff_user(&state, "pharmacist@pharmacy.com")?;

    let dispensed_id = {
        let tables = state.store.read()?;
        tables
            .prescriptions
            .iter()
            .find(|rx| rx.status == PrescriptionStatus::Dispensed)
            .map(|rx| rx.id)
            .expect("seeded dispensed prescription")
    };

    let reversed = prescription_service::update_prescription_status(
        &state,
        &pharmacist,
        dispensed_id,
        UpdatePrescriptionStatusRequest {
            status: PrescriptionStatus::Rejected,
            notes: Some("Dispensed in error".into()),
        },
    )?
    .data
    .unwrap();
    assert_eq!(reversed.status, PrescriptionStatus::Rejected);

    Ok(())
}

#[test]
fn list_filters_by_status_and_text() -> anyhow::Result<()> {
    let state = seeded_state()?;

    let pending = prescription_service::list_prescriptions(
        &state,
        PrescriptionQuery {
            pagination: Pagination {
                page: None,
                per_page: None,
            },
            q: None,
            status: Some(PrescriptionStatus::PendingReview),
        },
    )?
    .data
    .unwrap()
    .items;
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].patient_name, "Tono Prasetyo");

    let by_doctor = prescription_service::list_prescriptions(
        &state,
        PrescriptionQuery {
            pagination: Pagination {
                page: None,
                per_page: None,
            },
            q: Some("santoso".into()),
            status: None,
        },
    )?
    .data
    .unwrap()
    .items;
    assert_eq!(by_doctor.len(), 2);

    Ok(())
}

fn seeded_state() -> anyhow::Result<AppState> {
    Ok(AppState::new(Arc::new(MemStore::seeded()?)))
}

fn staff_user(state: &AppState, email: &str) -> anyhow::Result<AuthUser> {
    let tables = state.store.read()?;
    let user = tables
        .users
        .iter()
        .find(|u| u.email == email)
        .ok_or_else(|| anyhow::anyhow!("missing fixture user {email}"))?;
    Ok(AuthUser {
        user_id: user.id,
        name: user.name.clone(),
        role: user.role,
    })
}
