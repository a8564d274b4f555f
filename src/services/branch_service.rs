use chrono::Utc;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::branches::{
        BranchList, CreateTransferRequest, TransferList, UpdateBranchRequest,
        UpdateTransferStatusRequest,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_super_admin},
    models::{Branch, StockTransfer, TransferItem, TransferStatus},
    response::{ApiResponse, Meta},
    routes::params::{BranchQuery, TransferQuery},
    state::AppState,
    store::{document_code, text_match},
};

pub fn list_branches(state: &AppState, query: BranchQuery) -> AppResult<ApiResponse<BranchList>> {
    let tables = state.store.read()?;

    let mut items: Vec<Branch> = tables
        .branches
        .iter()
        .filter(|b| match query.q.as_ref().filter(|s| !s.is_empty()) {
            Some(q) => text_match(q, &[&b.name, &b.code, &b.manager]),
            None => true,
        })
        .cloned()
        .collect();
    items.sort_by(|a, b| a.code.cmp(&b.code));

    let total = items.len() as i64;
    Ok(ApiResponse::success(
        "Branches",
        BranchList { items },
        Some(Meta::total_only(total)),
    ))
}

pub fn get_branch(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Branch>> {
    let tables = state.store.read()?;
    let branch = tables
        .branches
        .iter()
        .find(|b| b.id == id)
        .cloned()
        .ok_or(AppError::NotFound)?;

    Ok(ApiResponse::success("Branch", branch, None))
}

pub fn update_branch(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateBranchRequest,
) -> AppResult<ApiResponse<Branch>> {
    ensure_super_admin(user)?;

    let branch = {
        let mut tables = state.store.write()?;
        let existing = tables
            .branches
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(AppError::NotFound)?;

        if let Some(name) = payload.name {
            existing.name = name;
        }
        if let Some(address) = payload.address {
            existing.address = address;
        }
        if let Some(phone) = payload.phone {
            existing.phone = phone;
        }
        if let Some(manager) = payload.manager {
            existing.manager = manager;
        }
        if let Some(daily_sales) = payload.daily_sales {
            existing.daily_sales = daily_sales;
        }
        if let Some(monthly_target) = payload.monthly_target {
            existing.monthly_target = monthly_target;
        }
        if let Some(low_stock_items) = payload.low_stock_items {
            existing.low_stock_items = low_stock_items;
        }
        if let Some(is_active) = payload.is_active {
            existing.is_active = is_active;
        }
        existing.clone()
    };

    if let Err(err) = log_audit(
        state,
        Some(user.user_id),
        "branch_update",
        Some("branches"),
        Some(serde_json::json!({ "branch_id": branch.id })),
    ) {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success("Updated", branch, Some(Meta::empty())))
}

pub fn list_transfers(
    state: &AppState,
    query: TransferQuery,
) -> AppResult<ApiResponse<TransferList>> {
    let (page, limit, offset) = query.pagination.normalize();
    let tables = state.store.read()?;

    let mut items: Vec<StockTransfer> = tables
        .transfers
        .iter()
        .filter(|t| match query.q.as_ref().filter(|s| !s.is_empty()) {
            Some(q) => text_match(q, &[&t.code]),
            None => true,
        })
        .filter(|t| match query.status {
            Some(status) => t.status == status,
            None => true,
        })
        .filter(|t| match query.branch_id {
            Some(branch_id) => t.from_branch_id == branch_id || t.to_branch_id == branch_id,
            None => true,
        })
        .cloned()
        .collect();
    items.sort_by_key(|t| std::cmp::Reverse(t.created_at));

    let total = items.len() as i64;
    let items: Vec<StockTransfer> = items
        .into_iter()
        .skip(offset as usize)
        .take(limit as usize)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Stock transfers",
        TransferList { items },
        Some(meta),
    ))
}

pub fn get_transfer(state: &AppState, id: Uuid) -> AppResult<ApiResponse<StockTransfer>> {
    let tables = state.store.read()?;
    let transfer = tables
        .transfers
        .iter()
        .find(|t| t.id == id)
        .cloned()
        .ok_or(AppError::NotFound)?;

    Ok(ApiResponse::success("Stock transfer", transfer, None))
}

pub fn create_transfer(
    state: &AppState,
    user: &AuthUser,
    payload: CreateTransferRequest,
) -> AppResult<ApiResponse<StockTransfer>> {
    ensure_super_admin(user)?;

    if payload.from_branch_id == payload.to_branch_id {
        return Err(AppError::BadRequest(
            "Source and destination branches must differ".into(),
        ));
    }
    if payload.items.is_empty() {
        return Err(AppError::BadRequest("Transfer has no items".into()));
    }
    if payload.items.iter().any(|line| line.quantity <= 0) {
        return Err(AppError::BadRequest(
            "quantity must be greater than 0".into(),
        ));
    }

    let transfer = {
        let mut tables = state.store.write()?;

        for branch_id in [payload.from_branch_id, payload.to_branch_id] {
            if !tables.branches.iter().any(|b| b.id == branch_id) {
                return Err(AppError::BadRequest(format!("Unknown branch {branch_id}")));
            }
        }

        let mut items = Vec::with_capacity(payload.items.len());
        for line in &payload.items {
            let product = tables
                .products
                .iter()
                .find(|p| p.id == line.product_id)
                .ok_or_else(|| {
                    AppError::BadRequest(format!("Unknown product {}", line.product_id))
                })?;
            items.push(TransferItem {
                product_id: product.id,
                name: product.name.clone(),
                quantity: line.quantity,
            });
        }

        let now = Utc::now();
        let id = Uuid::new_v4();
        let transfer = StockTransfer {
            id,
            code: document_code("TRF", id),
            from_branch_id: payload.from_branch_id,
            to_branch_id: payload.to_branch_id,
            items,
            status: TransferStatus::Pending,
            requested_by: user.name.clone(),
            notes: payload.notes,
            created_at: now,
            updated_at: now,
        };
        tables.transfers.push(transfer.clone());
        transfer
    };

    if let Err(err) = log_audit(
        state,
        Some(user.user_id),
        "transfer_create",
        Some("transfers"),
        Some(serde_json::json!({
            "transfer_id": transfer.id,
            "code": transfer.code,
        })),
    ) {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Transfer created",
        transfer,
        Some(Meta::empty()),
    ))
}

/// Completed and cancelled transfers are final. Paperwork only; branch
/// records carry no per-product stock to move.
pub fn update_transfer_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateTransferStatusRequest,
) -> AppResult<ApiResponse<StockTransfer>> {
    ensure_super_admin(user)?;

    let transfer = {
        let mut tables = state.store.write()?;
        let existing = tables
            .transfers
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(AppError::NotFound)?;

        if existing.status.is_terminal() {
            return Err(AppError::BadRequest("Transfer already finalized".into()));
        }

        existing.status = payload.status;
        existing.updated_at = Utc::now();
        existing.clone()
    };

    if let Err(err) = log_audit(
        state,
        Some(user.user_id),
        "transfer_status",
        Some("transfers"),
        Some(serde_json::json!({
            "transfer_id": transfer.id,
            "status": transfer.status,
        })),
    ) {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Transfer updated",
        transfer,
        Some(Meta::empty()),
    ))
}
