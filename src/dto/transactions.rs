use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{PaymentMethod, Transaction};

#[derive(Debug, Serialize, ToSchema)]
pub struct TransactionList {
    pub items: Vec<Transaction>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentMethodShare {
    pub method: PaymentMethod,
    pub count: i64,
    pub amount: i64,
    pub share_percent: f64,
}

/// History-screen statistics: sums and percentages over the records.
#[derive(Debug, Serialize, ToSchema)]
pub struct TransactionStats {
    pub transaction_count: i64,
    pub voided_count: i64,
    pub gross_sales: i64,
    pub average_sale: i64,
    pub today_sales: i64,
    pub today_transactions: i64,
    pub by_payment_method: Vec<PaymentMethodShare>,
}
