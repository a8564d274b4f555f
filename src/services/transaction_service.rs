use chrono::Utc;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::transactions::{PaymentMethodShare, TransactionList, TransactionStats},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_min_role},
    models::{PaymentMethod, Role, Transaction, TransactionStatus},
    response::{ApiResponse, Meta},
    routes::params::{SortOrder, TransactionQuery},
    state::AppState,
    store::text_match,
};

pub fn list_transactions(
    state: &AppState,
    query: TransactionQuery,
) -> AppResult<ApiResponse<TransactionList>> {
    let (page, limit, offset) = query.pagination.normalize();
    let tables = state.store.read()?;

    let mut items: Vec<Transaction> = tables
        .transactions
        .iter()
        .filter(|t| match query.q.as_ref().filter(|s| !s.is_empty()) {
            Some(q) => text_match(q, &[&t.receipt_number, &t.cashier_name]),
            None => true,
        })
        .filter(|t| match query.status {
            Some(status) => t.status == status,
            None => true,
        })
        .filter(|t| match query.payment_method {
            Some(method) => t.payment_method == method,
            None => true,
        })
        .filter(|t| {
            let date = t.created_at.date_naive();
            query.from.is_none_or(|from| date >= from) && query.to.is_none_or(|to| date <= to)
        })
        .cloned()
        .collect();

    match query.sort_order {
        Some(SortOrder::Asc) => items.sort_by_key(|t| t.created_at),
        _ => items.sort_by_key(|t| std::cmp::Reverse(t.created_at)),
    }

    let total = items.len() as i64;
    let items: Vec<Transaction> = items
        .into_iter()
        .skip(offset as usize)
        .take(limit as usize)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Transactions",
        TransactionList { items },
        Some(meta),
    ))
}

pub fn get_transaction(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Transaction>> {
    let tables = state.store.read()?;
    let transaction = tables
        .transactions
        .iter()
        .find(|t| t.id == id)
        .cloned()
        .ok_or(AppError::NotFound)?;

    Ok(ApiResponse::success("Transaction", transaction, None))
}

/// Voiding marks the record; the sale totals stay on it for the books.
pub fn void_transaction(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Transaction>> {
    ensure_min_role(user, Role::Pharmacist)?;

    let transaction = {
        let mut tables = state.store.write()?;
        let existing = tables
            .transactions
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(AppError::NotFound)?;

        if existing.status == TransactionStatus::Voided {
            return Err(AppError::BadRequest("Transaction already voided".into()));
        }

        existing.status = TransactionStatus::Voided;
        existing.voided_by = Some(user.user_id);
        existing.voided_at = Some(Utc::now());
        existing.clone()
    };

    if let Err(err) = log_audit(
        state,
        Some(user.user_id),
        "transaction_void",
        Some("transactions"),
        Some(serde_json::json!({
            "transaction_id": transaction.id,
            "receipt_number": transaction.receipt_number,
        })),
    ) {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Transaction voided",
        transaction,
        Some(Meta::empty()),
    ))
}

pub fn transaction_stats(state: &AppState) -> AppResult<ApiResponse<TransactionStats>> {
    let tables = state.store.read()?;
    let today = Utc::now().date_naive();

    let transaction_count = tables.transactions.len() as i64;
    let voided_count = tables
        .transactions
        .iter()
        .filter(|t| t.status == TransactionStatus::Voided)
        .count() as i64;

    // Voided sales are excluded from every money figure below.
    let completed: Vec<&Transaction> = tables
        .transactions
        .iter()
        .filter(|t| t.status == TransactionStatus::Completed)
        .collect();

    let gross_sales: i64 = completed.iter().map(|t| t.total).sum();
    let average_sale = if completed.is_empty() {
        0
    } else {
        gross_sales / completed.len() as i64
    };

    let today_sales: i64 = completed
        .iter()
        .filter(|t| t.created_at.date_naive() == today)
        .map(|t| t.total)
        .sum();
    let today_transactions = completed
        .iter()
        .filter(|t| t.created_at.date_naive() == today)
        .count() as i64;

    let by_payment_method = [
        PaymentMethod::Cash,
        PaymentMethod::Debit,
        PaymentMethod::Credit,
        PaymentMethod::Qris,
    ]
    .into_iter()
    .map(|method| {
        let count = completed
            .iter()
            .filter(|t| t.payment_method == method)
            .count() as i64;
        let amount: i64 = completed
            .iter()
            .filter(|t| t.payment_method == method)
            .map(|t| t.total)
            .sum();
        let share_percent = if gross_sales == 0 {
            0.0
        } else {
            amount as f64 / gross_sales as f64 * 100.0
        };
        PaymentMethodShare {
            method,
            count,
            amount,
            share_percent,
        }
    })
    .collect();

    let stats = TransactionStats {
        transaction_count,
        voided_count,
        gross_sales,
        average_sale,
        today_sales,
        today_transactions,
        by_payment_method,
    };

    Ok(ApiResponse::success("Transaction stats", stats, None))
}
