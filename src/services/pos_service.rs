use chrono::Utc;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::pos::CheckoutRequest,
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Transaction, TransactionItem, TransactionStatus},
    response::{ApiResponse, Meta},
    state::AppState,
    store::document_code,
};

const TAX_RATE_PERCENT: i64 = 11;

/// Sales tax on a subtotal in minor units, rounded half up.
pub fn tax_on(subtotal: i64) -> i64 {
    (subtotal * TAX_RATE_PERCENT + 50) / 100
}

pub fn checkout(
    state: &AppState,
    user: &AuthUser,
    payload: CheckoutRequest,
) -> AppResult<ApiResponse<Transaction>> {
    if payload.items.is_empty() {
        return Err(AppError::BadRequest("Sale has no items".into()));
    }
    if payload.items.iter().any(|line| line.quantity <= 0) {
        return Err(AppError::BadRequest(
            "quantity must be greater than 0".into(),
        ));
    }

    let transaction = {
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
            items.push(TransactionItem {
                product_id: product.id,
                name: product.name.clone(),
                unit_price: product.price,
                quantity: line.quantity,
                line_total: product.price * line.quantity as i64,
            });
        }

        let subtotal: i64 = items.iter().map(|item| item.line_total).sum();
        let tax = tax_on(subtotal);
        let total = subtotal + tax;
        // Change never goes negative; short payments record zero change.
        let change_due = (payload.amount_paid - total).max(0);

        let id = Uuid::new_v4();
        let transaction = Transaction {
            id,
            receipt_number: document_code("RCP", id),
            items,
            member_id: payload.member_id,
            cashier_id: user.user_id,
            cashier_name: user.name.clone(),
            subtotal,
            tax,
            total,
            payment_method: payload.payment_method,
            amount_paid: payload.amount_paid,
            change_due,
            status: TransactionStatus::Completed,
            note: payload.note,
            voided_by: None,
            voided_at: None,
            created_at: Utc::now(),
        };

        // Stock is left untouched; the inventory screen owns adjustments.
        tables.transactions.push(transaction.clone());
        transaction
    };

    if let Err(err) = log_audit(
        state,
        Some(user.user_id),
        "checkout",
        Some("transactions"),
        Some(serde_json::json!({
            "transaction_id": transaction.id,
            "receipt_number": transaction.receipt_number,
            "total": transaction.total,
        })),
    ) {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Checkout success",
        transaction,
        Some(Meta::empty()),
    ))
}
