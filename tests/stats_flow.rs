use std::sync::Arc;

use chrono::{Duration, Utc};
use pharmacare_api::{
    dto::{
        pos::{CheckoutLine, CheckoutRequest},
        preorders::{CreatePreOrderRequest, PreOrderLine},
        prescriptions::{CreatePrescriptionRequest, MedicationEntry},
        transactions::PaymentMethodShare,
    },
    error::AppError,
    middleware::auth::AuthUser,
    models::{Branch, PaymentMethod, Product, Role, TransactionStatus},
    routes::params::{Pagination, SortOrder, TransactionQuery},
    services::{
        dashboard_service, pos_service, preorder_service, prescription_service,
        transaction_service,
    },
    state::AppState,
    store::{MemStore, Tables},
};
use uuid::Uuid;

#[test]
fn stats_exclude_voided_sales_from_the_money() -> anyhow::Result<()> {
    let paracetamol = fixture_product("ST-0001", "Paracetamol 500mg", 1_000, 100, 10, 365);
    let vitamin = fixture_product("ST-0002", "Vitamin C 1000mg", 2_000, 100, 10, 365);
    let state = state_with(Tables {
        products: vec![paracetamol.clone(), vitamin.clone()],
        ..Tables::default()
    });
    let cashier = staff(Role::Cashier, "Dewi Lestari");
    let pharmacist = staff(Role::Pharmacist, "Budi Hartono");

    // price 1_000 carries 110 tax, price 2_000 carries 220.
    pos_service::checkout(&state, &cashier, cart(paracetamol.id, 1, PaymentMethod::Cash))?;
    let voided = pos_service::checkout(&state, &cashier, cart(vitamin.id, 1, PaymentMethod::Cash))?
        .data
        .unwrap();
    pos_service::checkout(&state, &cashier, cart(paracetamol.id, 2, PaymentMethod::Qris))?;

    transaction_service::void_transaction(&state, &pharmacist, voided.id)?;

    let stats = transaction_service::transaction_stats(&state)?.data.unwrap();
    assert_eq!(stats.transaction_count, 3);
    assert_eq!(stats.voided_count, 1);
    assert_eq!(stats.gross_sales, 3_330);
    assert_eq!(stats.average_sale, 1_665);
    assert_eq!(stats.today_sales, 3_330);
    assert_eq!(stats.today_transactions, 2);

    let cash = share_of(&stats.by_payment_method, PaymentMethod::Cash);
    assert_eq!(cash.count, 1);
    assert_eq!(cash.amount, 1_110);
    assert!((cash.share_percent - 33.33).abs() < 0.01);

    let qris = share_of(&stats.by_payment_method, PaymentMethod::Qris);
    assert_eq!(qris.count, 1);
    assert_eq!(qris.amount, 2_220);
    assert!((qris.share_percent - 66.67).abs() < 0.01);

    let debit = share_of(&stats.by_payment_method, PaymentMethod::Debit);
    assert_eq!(debit.count, 0);
    assert_eq!(debit.amount, 0);
    assert_eq!(debit.share_percent, 0.0);

    Ok(())
}

#[test]
fn voiding_is_guarded() -> anyhow::Result<()> {
    let aspirin = fixture_product("ST-0003", "Aspirin 80mg", 1_500, 60, 10, 365);
    let state = state_with(Tables {
        products: vec![aspirin.clone()],
        ..Tables::default()
    });
    let cashier = staff(Role::Cashier, "Dewi Lestari");
    let pharmacist = staff(Role::Pharmacist, "Budi Hartono");

    let sale = pos_service::checkout(&state, &cashier, cart(aspirin.id, 1, PaymentMethod::Cash))?
        .data
        .unwrap();

    let denied = transaction_service::void_transaction(&state, &cashier, sale.id);
    assert!(matches!(denied.unwrap_err(), AppError::Forbidden));

    transaction_service::void_transaction(&state, &pharmacist, sale.id)?;
    let again = transaction_service::void_transaction(&state, &pharmacist, sale.id);
    assert!(
        again
            .unwrap_err()
            .to_string()
            .contains("Transaction already voided")
    );

    Ok(())
}

#[test]
fn dashboard_summary_counts_the_shelves() -> anyhow::Result<()> {
    let empty_shelf = fixture_product("DB-0001", "Ibuprofen 400mg", 3_000, 0, 5, 365);
    let running_low = fixture_product("DB-0002", "Amoxicillin 500mg", 4_000, 5, 10, 365);
    let expiring = fixture_product("DB-0003", "Cough Syrup 60ml", 2_500, 50, 10, 30);
    let healthy = fixture_product("DB-0004", "Vitamin D3 1000IU", 2_000, 80, 10, 365);
    let state = state_with(Tables {
        products: vec![
            empty_shelf,
            running_low,
            expiring,
            healthy.clone(),
        ],
        branches: vec![
            fixture_branch("BR-101", true, 1_000_000, 10_000_000),
            fixture_branch("BR-102", false, 9_999_999, 99_999_999),
        ],
        ..Tables::default()
    });
    let cashier = staff(Role::Cashier, "Dewi Lestari");
    let pharmacist = staff(Role::Pharmacist, "Budi Hartono");

    pos_service::checkout(&state, &cashier, cart(healthy.id, 1, PaymentMethod::Cash))?;
    prescription_service::create_prescription(
        &state,
        &pharmacist,
        CreatePrescriptionRequest {
            patient_name: "Tono Prasetyo".into(),
            member_id: None,
            doctor_name: "dr. Ratna Sari".into(),
            medications: vec![MedicationEntry {
                name: "Amoxicillin 500mg".into(),
                dosage: "3x1".into(),
                quantity: 15,
                instructions: "After meals".into(),
            }],
            notes: None,
        },
    )?;
    preorder_service::create_preorder(
        &state,
        &cashier,
        CreatePreOrderRequest {
            customer_name: "Siti Aminah".into(),
            member_id: None,
            phone: "0813-7788-1100".into(),
            items: vec![PreOrderLine {
                product_id: healthy.id,
                quantity: 2,
            }],
            pickup_date: Utc::now().date_naive() + Duration::days(2),
            priority: None,
            notes: None,
        },
    )?;

    let summary = dashboard_service::summary(&state)?.data.unwrap();
    assert_eq!(summary.product_count, 4);
    assert_eq!(summary.low_stock_count, 2);
    assert_eq!(summary.out_of_stock_count, 1);
    assert_eq!(summary.expiring_soon_count, 1);
    assert_eq!(summary.low_stock_percent, 50.0);
    assert_eq!(summary.member_count, 0);
    // healthy sells at 2_000, so the day's take is 2_220 with tax.
    assert_eq!(summary.today_sales, 2_220);
    assert_eq!(summary.today_transactions, 1);
    assert_eq!(summary.pending_prescriptions, 1);
    assert_eq!(summary.pending_preorders, 1);

    // Only the active branch contributes to the combined figures.
    assert_eq!(summary.active_branches, 1);
    assert_eq!(summary.combined_daily_sales, 1_000_000);
    assert_eq!(summary.monthly_target_progress_percent, 10.0);

    Ok(())
}

#[test]
fn history_filters_and_finds_receipts() -> anyhow::Result<()> {
    let lozenge = fixture_product("TX-0001", "Throat Lozenges", 1_000, 90, 10, 365);
    let state = state_with(Tables {
        products: vec![lozenge.clone()],
        ..Tables::default()
    });
    let cashier = staff(Role::Cashier, "Dewi Lestari");
    let pharmacist = staff(Role::Pharmacist, "Budi Hartono");

    let first = pos_service::checkout(&state, &cashier, cart(lozenge.id, 1, PaymentMethod::Cash))?
        .data
        .unwrap();
    let second = pos_service::checkout(&state, &cashier, cart(lozenge.id, 2, PaymentMethod::Qris))?
        .data
        .unwrap();
    let third = pos_service::checkout(&state, &cashier, cart(lozenge.id, 3, PaymentMethod::Cash))?
        .data
        .unwrap();
    transaction_service::void_transaction(&state, &pharmacist, first.id)?;

    // Voided sales stay on the ledger; newest first unless asked otherwise.
    let all = transaction_service::list_transactions(&state, history())?
        .data
        .unwrap()
        .items;
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].receipt_number, third.receipt_number);

    let oldest_first = transaction_service::list_transactions(
        &state,
        TransactionQuery {
            sort_order: Some(SortOrder::Asc),
            ..history()
        },
    )?
    .data
    .unwrap()
    .items;
    assert_eq!(oldest_first[0].id, first.id);

    let qris = transaction_service::list_transactions(
        &state,
        TransactionQuery {
            payment_method: Some(PaymentMethod::Qris),
            ..history()
        },
    )?
    .data
    .unwrap()
    .items;
    assert_eq!(qris.len(), 1);
    assert_eq!(qris[0].id, second.id);

    let voided = transaction_service::list_transactions(
        &state,
        TransactionQuery {
            status: Some(TransactionStatus::Voided),
            ..history()
        },
    )?
    .data
    .unwrap()
    .items;
    assert_eq!(voided.len(), 1);
    assert_eq!(voided[0].id, first.id);

    let by_receipt = transaction_service::list_transactions(
        &state,
        TransactionQuery {
            q: Some(second.receipt_number.clone()),
            ..history()
        },
    )?
    .data
    .unwrap()
    .items;
    assert_eq!(by_receipt.len(), 1);
    assert_eq!(by_receipt[0].id, second.id);

    let today = Utc::now().date_naive();
    let todays_page = transaction_service::list_transactions(
        &state,
        TransactionQuery {
            from: Some(today),
            to: Some(today),
            ..history()
        },
    )?
    .data
    .unwrap()
    .items;
    assert_eq!(todays_page.len(), 3);

    // Everything rang up today, so yesterday's page is empty.
    let yesterday = today - Duration::days(1);
    let stale = transaction_service::list_transactions(
        &state,
        TransactionQuery {
            from: Some(yesterday),
            to: Some(yesterday),
            ..history()
        },
    )?
    .data
    .unwrap()
    .items;
    assert!(stale.is_empty());

    let fetched = transaction_service::get_transaction(&state, third.id)?
        .data
        .unwrap();
    assert_eq!(fetched.receipt_number, third.receipt_number);

    let missing = transaction_service::get_transaction(&state, Uuid::new_v4());
    assert!(matches!(missing.unwrap_err(), AppError::NotFound));

    Ok(())
}

fn state_with(tables: Tables) -> AppState {
    AppState::new(Arc::new(MemStore::new(tables)))
}

fn history() -> TransactionQuery {
    TransactionQuery {
        pagination: Pagination {
            page: None,
            per_page: None,
        },
        q: None,
        status: None,
        payment_method: None,
        from: None,
        to: None,
        sort_order: None,
    }
}

fn staff(role: Role, name: &str) -> AuthUser {
    AuthUser {
        user_id: Uuid::new_v4(),
        name: name.to_string(),
        role,
    }
}

fn cart(product_id: Uuid, quantity: i32, payment_method: PaymentMethod) -> CheckoutRequest {
    CheckoutRequest {
        items: vec![CheckoutLine {
            product_id,
            quantity,
        }],
        member_id: None,
        payment_method,
        amount_paid: 1_000_000,
        note: None,
    }
}

fn fixture_product(
    sku: &str,
    name: &str,
    price: i64,
    stock: i32,
    min_stock: i32,
    days_to_expiry: i64,
) -> Product {
    let now = Utc::now();
    Product {
        id: Uuid::new_v4(),
        sku: sku.to_string(),
        name: name.to_string(),
        category: "OTC".to_string(),
        unit: "box".to_string(),
        price,
        cost: price / 2,
        stock,
        min_stock,
        max_stock: 500,
        expiry_date: now.date_naive() + Duration::days(days_to_expiry),
        prescription_required: false,
        created_at: now,
        updated_at: now,
    }
}

fn fixture_branch(code: &str, is_active: bool, daily_sales: i64, monthly_target: i64) -> Branch {
    Branch {
        id: Uuid::new_v4(),
        code: code.to_string(),
        name: format!("PharmaCare {code}"),
        address: "Jl. Melati No. 1".to_string(),
        phone: "021-555-0000".to_string(),
        manager: "Rudi Hermawan".to_string(),
        daily_sales,
        monthly_target,
        low_stock_items: 0,
        is_active,
        created_at: Utc::now(),
    }
}

fn share_of(shares: &[PaymentMethodShare], method: PaymentMethod) -> &PaymentMethodShare {
    shares.iter().find(|s| s.method == method).unwrap()
}
