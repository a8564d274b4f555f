use serde::Serialize;
use utoipa::ToSchema;

/// The overview screen's headline numbers, recomputed from the live
/// collections on every request.
#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardSummary {
    pub product_count: i64,
    pub low_stock_count: i64,
    pub out_of_stock_count: i64,
    pub expiring_soon_count: i64,
    pub low_stock_percent: f64,
    pub member_count: i64,
    pub today_sales: i64,
    pub today_transactions: i64,
    pub pending_prescriptions: i64,
    pub pending_preorders: i64,
    pub active_branches: i64,
    pub combined_daily_sales: i64,
    pub monthly_target_progress_percent: f64,
}
