use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Branch, StockTransfer, TransferStatus};

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateBranchRequest {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub manager: Option<String>,
    pub daily_sales: Option<i64>,
    pub monthly_target: Option<i64>,
    pub low_stock_items: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Serialize, ToSchema)]
pub struct BranchList {
    pub items: Vec<Branch>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TransferLine {
    pub product_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTransferRequest {
    pub from_branch_id: Uuid,
    pub to_branch_id: Uuid,
    pub items: Vec<TransferLine>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTransferStatusRequest {
    pub status: TransferStatus,
}

#[derive(Serialize, ToSchema)]
pub struct TransferList {
    pub items: Vec<StockTransfer>,
}
