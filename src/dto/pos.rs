use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::PaymentMethod;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutLine {
    pub product_id: Uuid,
    pub quantity: i32,
}

/// The POS cart at the moment the cashier presses "charge".
#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    pub items: Vec<CheckoutLine>,
    pub member_id: Option<Uuid>,
    pub payment_method: PaymentMethod,
    pub amount_paid: i64,
    pub note: Option<String>,
}
