use chrono::Utc;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::preorders::{CreatePreOrderRequest, PreOrderList, UpdatePreOrderStatusRequest},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_min_role},
    models::{PreOrder, PreOrderItem, PreOrderPriority, PreOrderStatus, Role},
    response::{ApiResponse, Meta},
    routes::params::PreOrderQuery,
    state::AppState,
    store::{document_code, text_match},
};

pub fn list_preorders(
    state: &AppState,
    query: PreOrderQuery,
) -> AppResult<ApiResponse<PreOrderList>> {
    let (page, limit, offset) = query.pagination.normalize();
    let tables = state.store.read()?;

    let mut items: Vec<PreOrder> = tables
        .preorders
        .iter()
        .filter(|po| match query.q.as_ref().filter(|s| !s.is_empty()) {
            Some(q) => text_match(q, &[&po.code, &po.customer_name, &po.phone]),
            None => true,
        })
        .filter(|po| match query.status {
            Some(status) => po.status == status,
            None => true,
        })
        .filter(|po| match query.priority {
            Some(priority) => po.priority == priority,
            None => true,
        })
        .cloned()
        .collect();
    // Soonest pickup first, the order the counter works through them.
    items.sort_by_key(|po| po.pickup_date);

    let total = items.len() as i64;
    let items: Vec<PreOrder> = items
        .into_iter()
        .skip(offset as usize)
        .take(limit as usize)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Pre-orders",
        PreOrderList { items },
        Some(meta),
    ))
}

pub fn get_preorder(state: &AppState, id: Uuid) -> AppResult<ApiResponse<PreOrder>> {
    let tables = state.store.read()?;
    let preorder = tables
        .preorders
        .iter()
        .find(|po| po.id == id)
        .cloned()
        .ok_or(AppError::NotFound)?;

    Ok(ApiResponse::success("Pre-order", preorder, None))
}

pub fn create_preorder(
    state: &AppState,
    user: &AuthUser,
    payload: CreatePreOrderRequest,
) -> AppResult<ApiResponse<PreOrder>> {
    if payload.items.is_empty() {
        return Err(AppError::BadRequest("Pre-order has no items".into()));
    }
    if payload.items.iter().any(|line| line.quantity <= 0) {
        return Err(AppError::BadRequest(
            "quantity must be greater than 0".into(),
        ));
    }

    let preorder = {
        let mut tables = state.store.write()?;

        if let Some(member_id) = payload.member_id {
            if !tables.members.iter().any(|m| m.id == member_id) {
                return Err(AppError::BadRequest("Member not found".into()));
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
            items.push(PreOrderItem {
                product_id: product.id,
                name: product.name.clone(),
                quantity: line.quantity,
            });
        }

        let now = Utc::now();
        let id = Uuid::new_v4();
        let preorder = PreOrder {
            id,
            code: document_code("PO", id),
            customer_name: payload.customer_name,
            member_id: payload.member_id,
            phone: payload.phone,
            items,
            pickup_date: payload.pickup_date,
            priority: payload.priority.unwrap_or(PreOrderPriority::Normal),
            status: PreOrderStatus::Pending,
            notes: payload.notes,
            created_at: now,
            updated_at: now,
        };
        tables.preorders.push(preorder.clone());
        preorder
    };

    if let Err(err) = log_audit(
        state,
        Some(user.user_id),
        "preorder_create",
        Some("preorders"),
        Some(serde_json::json!({
            "preorder_id": preorder.id,
            "code": preorder.code,
        })),
    ) {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Pre-order created",
        preorder,
        Some(Meta::empty()),
    ))
}

pub fn update_preorder_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdatePreOrderStatusRequest,
) -> AppResult<ApiResponse<PreOrder>> {
    let preorder = {
        let mut tables = state.store.write()?;
        let existing = tables
            .preorders
            .iter_mut()
            .find(|po| po.id == id)
            .ok_or(AppError::NotFound)?;

        existing.status = payload.status;
        existing.updated_at = Utc::now();
        existing.clone()
    };

    if let Err(err) = log_audit(
        state,
        Some(user.user_id),
        "preorder_status",
        Some("preorders"),
        Some(serde_json::json!({
            "preorder_id": preorder.id,
            "status": preorder.status,
        })),
    ) {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Pre-order updated",
        preorder,
        Some(Meta::empty()),
    ))
}

pub fn delete_preorder(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_min_role(user, Role::Pharmacist)?;

    {
        let mut tables = state.store.write()?;
        let position = tables
            .preorders
            .iter()
            .position(|po| po.id == id)
            .ok_or(AppError::NotFound)?;
        tables.preorders.remove(position);
    }

    if let Err(err) = log_audit(
        state,
        Some(user.user_id),
        "preorder_delete",
        Some("preorders"),
        Some(serde_json::json!({ "preorder_id": id })),
    ) {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
