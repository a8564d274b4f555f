use std::sync::Arc;

use pharmacare_api::{
    dto::pos::{CheckoutLine, CheckoutRequest},
    middleware::auth::AuthUser,
    models::{PaymentMethod, Product, TransactionStatus},
    services::pos_service,
    state::AppState,
    store::MemStore,
};
use uuid::Uuid;

// A two-line cash sale: 2x Paracetamol (1200) + 1x Vitamin C (5500).
// Subtotal 7900, 11% tax rounds to 869, total 8769.
#[test]
fn checkout_totals_and_change() -> anyhow::Result<()> {
    let state = seeded_state()?;
    let cashier = staff_user(&state, "cashier@pharmacy.com")?;
    let paracetamol = product_by_sku(&state, "PC-0001")?;
    let vitamin_c = product_by_sku(&state, "PC-0005")?;

    let resp = pos_service::checkout(
        &state,
        &cashier,
        CheckoutRequest {
            items: vec![
                CheckoutLine {
                    product_id: paracetamol.id,
                    quantity: 2,
                },
                CheckoutLine {
                    product_id: vitamin_c.id,
                    quantity: 1,
                },
            ],
            member_id: None,
            payment_method: PaymentMethod::Cash,
            amount_paid: 10_000,
            note: None,
        },
    )?;
    assert_eq!(resp.message, "Checkout success");

    let sale = resp.data.unwrap();
    assert_eq!(sale.subtotal, 7_900);
    assert_eq!(sale.tax, 869);
    assert_eq!(sale.total, 8_769);
    assert_eq!(sale.change_due, 1_231);
    assert_eq!(sale.status, TransactionStatus::Completed);
    assert_eq!(sale.cashier_name, "Dewi Lestari");
    assert!(sale.receipt_number.starts_with("RCP-"));
    assert_eq!(sale.items[0].line_total, 2_400);

    Ok(())
}

// The register records the sale and nothing else; shelf counts are the
// inventory screen's job.
#[test]
fn checkout_leaves_stock_and_history_alone() -> anyhow::Result<()> {
    let state = seeded_state()?;
    let cashier = staff_user(&state, "cashier@pharmacy.com")?;
    let paracetamol = product_by_sku(&state, "PC-0001")?;
    let stock_before = paracetamol.stock;

    let (member_id, history_before) = {
        let tables = state.store.read()?;
        let member = &tables.members[0];
        (member.id, member.purchase_history.len())
    };

    pos_service::checkout(
        &state,
        &cashier,
        CheckoutRequest {
            items: vec![CheckoutLine {
                product_id: paracetamol.id,
                quantity: 5,
            }],
            member_id: Some(member_id),
            payment_method: PaymentMethod::Qris,
            amount_paid: 6_660,
            note: Some("member sale".into()),
        },
    )?;

    let tables = state.store.read()?;
    let product = tables
        .products
        .iter()
        .find(|p| p.id == paracetamol.id)
        .unwrap();
    assert_eq!(product.stock, stock_before);

    let member = tables.members.iter().find(|m| m.id == member_id).unwrap();
    assert_eq!(member.purchase_history.len(), history_before);

    Ok(())
}

#[test]
fn checkout_clamps_change_on_short_payment() -> anyhow::Result<()> {
    let state = seeded_state()?;
    let cashier = staff_user(&state, "cashier@pharmacy.com")?;
    let paracetamol = product_by_sku(&state, "PC-0001")?;

    let sale = pos_service::checkout(
        &state,
        &cashier,
        CheckoutRequest {
            items: vec![CheckoutLine {
                product_id: paracetamol.id,
                quantity: 1,
            }],
            member_id: None,
            payment_method: PaymentMethod::Debit,
            amount_paid: 500,
            note: None,
        },
    )?
    .data
    .unwrap();

    assert!(sale.amount_paid < sale.total);
    assert_eq!(sale.change_due, 0);

    Ok(())
}

#[test]
fn checkout_validates_the_cart() -> anyhow::Result<()> {
    let state = seeded_state()?;
    let cashier = staff_user(&state, "cashier@pharmacy.com")?;
    let paracetamol = product_by_sku(&state, "PC-0001")?;

    let empty = pos_service::checkout(
        &state,
        &cashier,
        CheckoutRequest {
            items: vec![],
            member_id: None,
            payment_method: PaymentMethod::Cash,
            amount_paid: 1_000,
            note: None,
        },
    );
    assert!(empty.unwrap_err().to_string().contains("Sale has no items"));

    let zero_quantity = pos_service::checkout(
        &state,
        &cashier,
        CheckoutRequest {
            items: vec![CheckoutLine {
                product_id: paracetamol.id,
                quantity: 0,
            }],
            member_id: None,
            payment_method: PaymentMethod::Cash,
            amount_paid: 1_000,
            note: None,
        },
    );
    assert!(
        zero_quantity
            .unwrap_err()
            .to_string()
            .contains("quantity must be greater than 0")
    );

    let unknown_product = pos_service::checkout(
        &state,
        &cashier,
        CheckoutRequest {
            items: vec![CheckoutLine {
                product_id: Uuid::new_v4(),
                quantity: 1,
            }],
            member_id: None,
            payment_method: PaymentMethod::Cash,
            amount_paid: 1_000,
            note: None,
        },
    );
    assert!(
        unknown_product
            .unwrap_err()
            .to_string()
            .contains("Unknown product")
    );

    let unknown_member = pos_service::checkout(
        &state,
        &cashier,
        CheckoutRequest {
            items: vec![CheckoutLine {
                product_id: paracetamol.id,
                quantity: 1,
            }],
            member_id: Some(Uuid::new_v4()),
            payment_method: PaymentMethod::Cash,
            amount_paid: 1_000,
            note: None,
        },
    );
    assert!(
        unknown_member
            .unwrap_err()
            .to_string()
            .contains("Member not found")
    );

    Ok(())
}

fn seeded_state() -> anyhow::Result<AppState> {
    Ok(AppState::new(Arc::new(MemStore::seeded()?)))
}

fn staff_user(state: &AppState, email: &str) -> anyhow::Result<AuthUser> {
    let tables = state.store.read()?;
    let user = tables
        .users
        .iter()
        .find(|u| u.email == email)
        .ok_or_else(|| anyhow::anyhow!("missing fixture user {email}"))?;
    Ok(AuthUser {
        user_id: user.id,
        name: user.name.clone(),
        role: user.role,
    })
}

fn product_by_sku(state: &AppState, sku: &str) -> anyhow::Result<Product> {
    let tables = state.store.read()?;
    tables
        .products
        .iter()
        .find(|p| p.sku == sku)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("missing fixture product {sku}"))
}
