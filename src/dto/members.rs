use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Member, MembershipType, PurchaseRecord};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateMemberRequest {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub membership_type: MembershipType,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub medical_conditions: Vec<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateMemberRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub membership_type: Option<MembershipType>,
    pub allergies: Option<Vec<String>>,
    pub medical_conditions: Option<Vec<String>>,
}

#[derive(Serialize, ToSchema)]
pub struct MemberList {
    pub items: Vec<Member>,
}

#[derive(Serialize, ToSchema)]
pub struct PurchaseHistory {
    pub items: Vec<PurchaseRecord>,
}
