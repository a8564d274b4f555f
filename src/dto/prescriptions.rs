use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Prescription, PrescriptionStatus};

#[derive(Debug, Deserialize, ToSchema)]
pub struct MedicationEntry {
    pub name: String,
    pub dosage: String,
    pub quantity: i32,
    pub instructions: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePrescriptionRequest {
    pub patient_name: String,
    pub member_id: Option<Uuid>,
    pub doctor_name: String,
    pub medications: Vec<MedicationEntry>,
    pub notes: Option<String>,
}

/// Review action from the prescriptions screen; the acting reviewer is
/// stamped from the session, not the body.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePrescriptionStatusRequest {
    pub status: PrescriptionStatus,
    pub notes: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct PrescriptionList {
    pub items: Vec<Prescription>,
}
