use chrono::{Duration, Utc};

use crate::{
    dto::dashboard::DashboardSummary,
    error::AppResult,
    models::{PreOrderStatus, PrescriptionStatus, TransactionStatus},
    response::ApiResponse,
    services::product_service::EXPIRING_SOON_DAYS,
    state::AppState,
};

pub fn summary(state: &AppState) -> AppResult<ApiResponse<DashboardSummary>> {
    let tables = state.store.read()?;
    let today = Utc::now().date_naive();
    let soon = today + Duration::days(EXPIRING_SOON_DAYS);

    let product_count = tables.products.len() as i64;
    let low_stock_count = tables
        .products
        .iter()
        .filter(|p| p.is_low_stock())
        .count() as i64;
    let out_of_stock_count = tables.products.iter().filter(|p| p.stock == 0).count() as i64;
    let expiring_soon_count = tables
        .products
        .iter()
        .filter(|p| p.expiry_date <= soon)
        .count() as i64;
    let low_stock_percent = if product_count == 0 {
        0.0
    } else {
        low_stock_count as f64 / product_count as f64 * 100.0
    };

    let member_count = tables.members.len() as i64;

    let today_sales: i64 = tables
        .transactions
        .iter()
        .filter(|t| t.status == TransactionStatus::Completed)
        .filter(|t| t.created_at.date_naive() == today)
        .map(|t| t.total)
        .sum();
    let today_transactions = tables
        .transactions
        .iter()
        .filter(|t| t.status == TransactionStatus::Completed)
        .filter(|t| t.created_at.date_naive() == today)
        .count() as i64;

    let pending_prescriptions = tables
        .prescriptions
        .iter()
        .filter(|rx| rx.status == PrescriptionStatus::PendingReview)
        .count() as i64;
    let pending_preorders = tables
        .preorders
        .iter()
        .filter(|po| po.status == PreOrderStatus::Pending)
        .count() as i64;

    let active_branches = tables.branches.iter().filter(|b| b.is_active).count() as i64;
    // Branch figures are the stored ones, not recomputed from sales.
    let combined_daily_sales: i64 = tables
        .branches
        .iter()
        .filter(|b| b.is_active)
        .map(|b| b.daily_sales)
        .sum();
    let combined_target: i64 = tables
        .branches
        .iter()
        .filter(|b| b.is_active)
        .map(|b| b.monthly_target)
        .sum();
    let monthly_target_progress_percent = if combined_target == 0 {
        0.0
    } else {
        combined_daily_sales as f64 / combined_target as f64 * 100.0
    };

    let summary = DashboardSummary {
        product_count,
        low_stock_count,
        out_of_stock_count,
        expiring_soon_count,
        low_stock_percent,
        member_count,
        today_sales,
        today_transactions,
        pending_prescriptions,
        pending_preorders,
        active_branches,
        combined_daily_sales,
        monthly_target_progress_percent,
    };

    Ok(ApiResponse::success("Dashboard summary", summary, None))
}
