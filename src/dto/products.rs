use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Product;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub sku: String,
    pub name: String,
    pub category: String,
    pub unit: String,
    pub price: i64,
    pub cost: i64,
    pub stock: i32,
    pub min_stock: i32,
    pub max_stock: i32,
    pub expiry_date: NaiveDate,
    #[serde(default)]
    pub prescription_required: bool,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub unit: Option<String>,
    pub price: Option<i64>,
    pub cost: Option<i64>,
    pub stock: Option<i32>,
    pub min_stock: Option<i32>,
    pub max_stock: Option<i32>,
    pub expiry_date: Option<NaiveDate>,
    pub prescription_required: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentType {
    In,
    Out,
}

/// The ad-hoc add/subtract stock form.
#[derive(Debug, Deserialize, ToSchema)]
pub struct StockAdjustmentRequest {
    pub adjustment_type: AdjustmentType,
    pub quantity: i32,
    pub reason: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct ProductList {
    pub items: Vec<Product>,
}
