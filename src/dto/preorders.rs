use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{PreOrder, PreOrderPriority, PreOrderStatus};

#[derive(Debug, Deserialize, ToSchema)]
pub struct PreOrderLine {
    pub product_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePreOrderRequest {
    pub customer_name: String,
    pub member_id: Option<Uuid>,
    pub phone: String,
    pub items: Vec<PreOrderLine>,
    pub pickup_date: NaiveDate,
    pub priority: Option<PreOrderPriority>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePreOrderStatusRequest {
    pub status: PreOrderStatus,
}

#[derive(Serialize, ToSchema)]
pub struct PreOrderList {
    pub items: Vec<PreOrder>,
}
