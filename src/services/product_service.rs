use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::products::{
        AdjustmentType, CreateProductRequest, ProductList, StockAdjustmentRequest,
        UpdateProductRequest,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_min_role},
    models::{Product, Role},
    response::{ApiResponse, Meta},
    routes::params::{
        ExpiringQuery, LowStockQuery, ProductQuery, ProductSortBy, SortOrder, StockStatus,
    },
    state::AppState,
    store::text_match,
};

pub const EXPIRING_SOON_DAYS: i64 = 90;

pub fn list_products(state: &AppState, query: ProductQuery) -> AppResult<ApiResponse<ProductList>> {
    let (page, limit, offset) = query.pagination.normalize();
    let tables = state.store.read()?;
    let soon = Utc::now().date_naive() + Duration::days(EXPIRING_SOON_DAYS);

    let mut items: Vec<Product> = tables
        .products
        .iter()
        .filter(|p| match query.q.as_ref().filter(|s| !s.is_empty()) {
            Some(q) => text_match(q, &[&p.name, &p.sku, &p.category]),
            None => true,
        })
        .filter(|p| match query.category.as_ref().filter(|s| !s.is_empty()) {
            Some(category) => &p.category == category,
            None => true,
        })
        .filter(|p| match query.status {
            Some(StockStatus::InStock) => p.stock > p.min_stock,
            Some(StockStatus::LowStock) => p.stock > 0 && p.is_low_stock(),
            Some(StockStatus::OutOfStock) => p.stock == 0,
            Some(StockStatus::ExpiringSoon) => p.expiry_date <= soon,
            None => true,
        })
        .filter(|p| query.min_price.is_none_or(|min| p.price >= min))
        .filter(|p| query.max_price.is_none_or(|max| p.price <= max))
        .cloned()
        .collect();

    let sort_by = query.sort_by.unwrap_or(ProductSortBy::CreatedAt);
    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);
    items.sort_by(|a, b| {
        let ordering = match sort_by {
            ProductSortBy::CreatedAt => a.created_at.cmp(&b.created_at),
            ProductSortBy::Price => a.price.cmp(&b.price),
            ProductSortBy::Name => a.name.cmp(&b.name),
            ProductSortBy::Stock => a.stock.cmp(&b.stock),
            ProductSortBy::ExpiryDate => a.expiry_date.cmp(&b.expiry_date),
        };
        match sort_order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });

    let total = items.len() as i64;
    let items: Vec<Product> = items
        .into_iter()
        .skip(offset as usize)
        .take(limit as usize)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Products",
        ProductList { items },
        Some(meta),
    ))
}

pub fn get_product(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Product>> {
    let tables = state.store.read()?;
    let product = tables
        .products
        .iter()
        .find(|p| p.id == id)
        .cloned()
        .ok_or(AppError::NotFound)?;

    Ok(ApiResponse::success("Product", product, None))
}

pub fn create_product(
    state: &AppState,
    user: &AuthUser,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_min_role(user, Role::Pharmacist)?;

    if payload.stock < 0 {
        return Err(AppError::BadRequest("stock cannot be negative".into()));
    }

    let product = {
        let mut tables = state.store.write()?;
        if tables
            .products
            .iter()
            .any(|p| p.sku.eq_ignore_ascii_case(&payload.sku))
        {
            return Err(AppError::BadRequest("SKU is already taken".into()));
        }

        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4(),
            sku: payload.sku,
            name: payload.name,
            category: payload.category,
            unit: payload.unit,
            price: payload.price,
            cost: payload.cost,
            stock: payload.stock,
            min_stock: payload.min_stock,
            max_stock: payload.max_stock,
            expiry_date: payload.expiry_date,
            prescription_required: payload.prescription_required,
            created_at: now,
            updated_at: now,
        };
        tables.products.push(product.clone());
        product
    };

    if let Err(err) = log_audit(
        state,
        Some(user.user_id),
        "product_create",
        Some("products"),
        Some(serde_json::json!({ "product_id": product.id })),
    ) {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Product created",
        product,
        Some(Meta::empty()),
    ))
}

pub fn update_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_min_role(user, Role::Pharmacist)?;

    if payload.stock.is_some_and(|stock| stock < 0) {
        return Err(AppError::BadRequest("stock cannot be negative".into()));
    }

    let product = {
        let mut tables = state.store.write()?;
        let existing = tables
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(AppError::NotFound)?;

        if let Some(name) = payload.name {
            existing.name = name;
        }
        if let Some(category) = payload.category {
            existing.category = category;
        }
        if let Some(unit) = payload.unit {
            existing.unit = unit;
        }
        if let Some(price) = payload.price {
            existing.price = price;
        }
        if let Some(cost) = payload.cost {
            existing.cost = cost;
        }
        if let Some(stock) = payload.stock {
            existing.stock = stock;
        }
        if let Some(min_stock) = payload.min_stock {
            existing.min_stock = min_stock;
        }
        if let Some(max_stock) = payload.max_stock {
            existing.max_stock = max_stock;
        }
        if let Some(expiry_date) = payload.expiry_date {
            existing.expiry_date = expiry_date;
        }
        if let Some(prescription_required) = payload.prescription_required {
            existing.prescription_required = prescription_required;
        }
        existing.updated_at = Utc::now();
        existing.clone()
    };

    if let Err(err) = log_audit(
        state,
        Some(user.user_id),
        "product_update",
        Some("products"),
        Some(serde_json::json!({ "product_id": product.id })),
    ) {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success("Updated", product, Some(Meta::empty())))
}

pub fn delete_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_min_role(user, Role::Pharmacist)?;

    {
        let mut tables = state.store.write()?;
        let position = tables
            .products
            .iter()
            .position(|p| p.id == id)
            .ok_or(AppError::NotFound)?;
        // No cascade: sales, pre-orders and transfers keep their line items.
        tables.products.remove(position);
    }

    if let Err(err) = log_audit(
        state,
        Some(user.user_id),
        "product_delete",
        Some("products"),
        Some(serde_json::json!({ "product_id": id })),
    ) {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub fn adjust_stock(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: StockAdjustmentRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_min_role(user, Role::Pharmacist)?;

    if payload.quantity <= 0 {
        return Err(AppError::BadRequest(
            "quantity must be greater than 0".to_string(),
        ));
    }

    let product = {
        let mut tables = state.store.write()?;
        let existing = tables
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(AppError::NotFound)?;

        existing.stock = match payload.adjustment_type {
            AdjustmentType::In => existing.stock + payload.quantity,
            // Outbound adjustments clamp at zero instead of going negative.
            AdjustmentType::Out => (existing.stock - payload.quantity).max(0),
        };
        existing.updated_at = Utc::now();
        existing.clone()
    };

    if let Err(err) = log_audit(
        state,
        Some(user.user_id),
        "stock_adjust",
        Some("products"),
        Some(serde_json::json!({
            "product_id": product.id,
            "adjustment_type": payload.adjustment_type,
            "quantity": payload.quantity,
            "reason": payload.reason,
        })),
    ) {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Stock updated",
        product,
        Some(Meta::empty()),
    ))
}

pub fn list_low_stock(
    state: &AppState,
    query: LowStockQuery,
) -> AppResult<ApiResponse<ProductList>> {
    let (page, limit, offset) = query.pagination.normalize();
    let tables = state.store.read()?;

    let mut items: Vec<Product> = tables
        .products
        .iter()
        .filter(|p| match query.threshold {
            Some(threshold) => p.stock <= threshold,
            None => p.is_low_stock(),
        })
        .cloned()
        .collect();
    items.sort_by(|a, b| a.stock.cmp(&b.stock).then(b.created_at.cmp(&a.created_at)));

    let total = items.len() as i64;
    let items: Vec<Product> = items
        .into_iter()
        .skip(offset as usize)
        .take(limit as usize)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Low stock",
        ProductList { items },
        Some(meta),
    ))
}

pub fn list_expiring(
    state: &AppState,
    query: ExpiringQuery,
) -> AppResult<ApiResponse<ProductList>> {
    let (page, limit, offset) = query.pagination.normalize();
    let days = query.days.unwrap_or(EXPIRING_SOON_DAYS);
    let horizon = Utc::now().date_naive() + Duration::days(days);
    let tables = state.store.read()?;

    let mut items: Vec<Product> = tables
        .products
        .iter()
        .filter(|p| p.expiry_date <= horizon)
        .cloned()
        .collect();
    items.sort_by(|a, b| a.expiry_date.cmp(&b.expiry_date));

    let total = items.len() as i64;
    let items: Vec<Product> = items
        .into_iter()
        .skip(offset as usize)
        .take(limit as usize)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Expiring products",
        ProductList { items },
        Some(meta),
    ))
}
