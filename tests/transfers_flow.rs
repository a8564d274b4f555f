use std::sync::Arc;

use pharmacare_api::{
    dto::branches::{CreateTransferRequest, TransferLine, UpdateBranchRequest, UpdateTransferStatusRequest},
    error::AppError,
    middleware::auth::AuthUser,
    models::{Branch, TransferStatus},
    routes::params::{BranchQuery, Pagination, TransferQuery},
    services::branch_service,
    state::AppState,
    store::MemStore,
};

#[test]
fn admin_creates_and_completes_a_transfer() -> anyhow::Result<()> {
    let state = seeded_state()?;
    let admin = staff_user(&state, "admin@pharmacy.com")?;
    let central = branch_by_code(&state, "BR-001")?;
    let harbor = branch_by_code(&state, "BR-003")?;

    let (product_id, stock_before) = {
        let tables = state.store.read()?;
        (tables.products[0].id, tables.products[0].stock)
    };

    let created = branch_service::create_transfer(
        &state,
        &admin,
        CreateTransferRequest {
            from_branch_id: central.id,
            to_branch_id: harbor.id,
            items: vec![TransferLine {
                product_id,
                quantity: 30,
            }],
            notes: Some("Harbor restock".into()),
        },
    )?
    .data
    .unwrap();
    assert!(created.code.starts_with("TRF-"));
    assert_eq!(created.status, TransferStatus::Pending);
    assert_eq!(created.requested_by, "Sarah Mitchell");

    let completed = branch_service::update_transfer_status(
        &state,
        &admin,
        created.id,
        UpdateTransferStatusRequest {
            status: TransferStatus::Completed,
        },
    )?
    .data
    .unwrap();
    assert_eq!(completed.status, TransferStatus::Completed);

    let fetched = branch_service::get_transfer(&state, created.id)?
        .data
        .unwrap();
    assert_eq!(fetched.status, TransferStatus::Completed);
    assert_eq!(fetched.items[0].quantity, 30);

    // Completed is final.
    let reopened = branch_service::update_transfer_status(
        &state,
        &admin,
        created.id,
        UpdateTransferStatusRequest {
            status: TransferStatus::Pending,
        },
    );
    assert!(
        reopened
            .unwrap_err()
            .to_string()
            .contains("Transfer already finalized")
    );

    // Branch records carry no per-product stock, so the catalog is untouched.
    let tables = state.store.read()?;
    let product = tables
        .products
        .iter()
        .find(|p| p.id == product_id)
        .unwrap();
    assert_eq!(product.stock, stock_before);

    Ok(())
}

#[test]
fn transfer_creation_is_validated() -> anyhow::Result<()> {
    let state = seeded_state()?;
    let admin = staff_user(&state, "admin@pharmacy.com")?;
    let pharmacist = staff_user(&state, "pharmacist@pharmacy.com")?;
    let central = branch_by_code(&state, "BR-001")?;
    let westside = branch_by_code(&state, "BR-002")?;

    let product_id = {
        let tables = state.store.read()?;
        tables.products[0].id
    };

    let same_branch = branch_service::create_transfer(
        &state,
        &admin,
        CreateTransferRequest {
            from_branch_id: central.id,
            to_branch_id: central.id,
            items: vec![TransferLine {
                product_id,
                quantity: 5,
            }],
            notes: None,
        },
    );
    assert!(
        same_branch
            .unwrap_err()
            .to_string()
            .contains("Source and destination branches must differ")
    );

    let denied = branch_service::create_transfer(
        &state,
        &pharmacist,
        CreateTransferRequest {
            from_branch_id: central.id,
            to_branch_id: westside.id,
            items: vec![TransferLine {
                product_id,
                quantity: 5,
            }],
            notes: None,
        },
    );
    assert!(matches!(denied.unwrap_err(), AppError::Forbidden));

    Ok(())
}

#[test]
fn transfer_list_filters_by_branch_either_side() -> anyhow::Result<()> {
    let state = seeded_state()?;
    let central = branch_by_code(&state, "BR-001")?;

    // Central is the source of one seeded transfer and the destination of the other.
    let touching_central = branch_service::list_transfers(
        &state,
        TransferQuery {
            pagination: Pagination {
                page: None,
                per_page: None,
            },
            q: None,
            status: None,
            branch_id: Some(central.id),
        },
    )?
    .data
    .unwrap()
    .items;
    assert_eq!(touching_central.len(), 2);

    let in_transit = branch_service::list_transfers(
        &state,
        TransferQuery {
            pagination: Pagination {
                page: None,
                per_page: None,
            },
            q: None,
            status: Some(TransferStatus::InTransit),
            branch_id: None,
        },
    )?
    .data
    .unwrap()
    .items;
    assert_eq!(in_transit.len(), 1);
    assert_eq!(in_transit[0].requested_by, "Sarah Mitchell");

    Ok(())
}

#[test]
fn branch_edits_are_super_admin_only() -> anyhow::Result<()> {
    let state = seeded_state()?;
    let admin = staff_user(&state, "admin@pharmacy.com")?;
    let pharmacist = staff_user(&state, "pharmacist@pharmacy.com")?;
    let westside = branch_by_code(&state, "BR-002")?;

    let denied = branch_service::update_branch(
        &state,
        &pharmacist,
        westside.id,
        UpdateBranchRequest {
            manager: Some("Andi Saputra".into()),
            ..Default::default()
        },
    );
    assert!(matches!(denied.unwrap_err(), AppError::Forbidden));

    let updated = branch_service::update_branch(
        &state,
        &admin,
        westside.id,
        UpdateBranchRequest {
            manager: Some("Andi Saputra".into()),
            monthly_target: Some(72_000_000),
            ..Default::default()
        },
    )?
    .data
    .unwrap();
    assert_eq!(updated.manager, "Andi Saputra");
    assert_eq!(updated.monthly_target, 72_000_000);
    assert_eq!(updated.name, "PharmaCare Westside");

    let fetched = branch_service::get_branch(&state, westside.id)?
        .data
        .unwrap();
    assert_eq!(fetched.manager, "Andi Saputra");

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

fn branch_by_code(state: &AppState, code: &str) -> anyhow::Result<Branch> {
    let resp = branch_service::list_branches(state, BranchQuery { q: None })?;
    resp.data
        .unwrap()
        .items
        .into_iter()
        .find(|b| b.code == code)
        .ok_or_else(|| anyhow::anyhow!("missing fixture branch {code}"))
}
