use std::sync::Arc;

use pharmacare_api::{
    dto::members::{CreateMemberRequest, UpdateMemberRequest},
    error::AppError,
    middleware::auth::AuthUser,
    models::MembershipType,
    routes::params::{MemberQuery, MemberSearchQuery, Pagination},
    services::member_service,
    state::AppState,
    store::MemStore,
};

#[test]
fn create_update_and_delete_member() -> anyhow::Result<()> {
    let state = seeded_state()?;
    let pharmacist = staff_user(&state, "pharmacist@pharmacy.com")?;

    let created = member_service::create_member(
        &state,
        &pharmacist,
        CreateMemberRequest {
            name: "Citra Dewanti".into(),
            phone: "0817-4455-6677".into(),
            email: Some("citra.d@mail.com".into()),
            membership_type: MembershipType::Silver,
            allergies: vec!["Ibuprofen".into()],
            medical_conditions: vec![],
        },
    )?
    .data
    .unwrap();
    assert!(created.purchase_history.is_empty());

    let duplicate_phone = member_service::create_member(
        &state,
        &pharmacist,
        CreateMemberRequest {
            name: "Someone Else".into(),
            phone: "0817-4455-6677".into(),
            email: None,
            membership_type: MembershipType::Regular,
            allergies: vec![],
            medical_conditions: vec![],
        },
    );
    assert!(
        duplicate_phone
            .unwrap_err()
            .to_string()
            .contains("Phone number is already registered")
    );

    let upgraded = member_service::update_member(
        &state,
        &pharmacist,
        created.id,
        UpdateMemberRequest {
            membership_type: Some(MembershipType::Gold),
            ..Default::default()
        },
    )?
    .data
    .unwrap();
    assert_eq!(upgraded.membership_type, MembershipType::Gold);
    assert_eq!(upgraded.name, "Citra Dewanti");

    member_service::delete_member(&state, &pharmacist, created.id)?;
    let gone = member_service::get_member(&state, created.id);
    assert!(matches!(gone.unwrap_err(), AppError::NotFound));

    Ok(())
}

#[test]
fn member_writes_are_pharmacist_and_up() -> anyhow::Result<()> {
    let state = seeded_state()?;
    let cashier = staff_user(&state, "cashier@pharmacy.com")?;

    let denied = member_service::create_member(
        &state,
        &cashier,
        CreateMemberRequest {
            name: "Blocked".into(),
            phone: "0899-0000-1111".into(),
            email: None,
            membership_type: MembershipType::Regular,
            allergies: vec![],
            medical_conditions: vec![],
        },
    );
    assert!(matches!(denied.unwrap_err(), AppError::Forbidden));

    Ok(())
}

#[test]
fn list_filters_by_tier_and_text() -> anyhow::Result<()> {
    let state = seeded_state()?;

    let gold = member_service::list_members(
        &state,
        MemberQuery {
            pagination: page_default(),
            q: None,
            membership_type: Some(MembershipType::Gold),
        },
    )?
    .data
    .unwrap()
    .items;
    assert_eq!(gold.len(), 1);
    assert_eq!(gold[0].name, "Rina Kusuma");

    // Email is searchable too, for members who left one.
    let by_email = member_service::list_members(
        &state,
        MemberQuery {
            pagination: page_default(),
            q: Some("agus.w@mail".into()),
            membership_type: None,
        },
    )?
    .data
    .unwrap()
    .items;
    assert_eq!(by_email.len(), 1);
    assert_eq!(by_email[0].name, "Agus Wibowo");

    Ok(())
}

// The register's lookup box caps its result list.
#[test]
fn pos_search_is_capped() -> anyhow::Result<()> {
    let state = seeded_state()?;

    let capped = member_service::search_members(
        &state,
        MemberSearchQuery {
            q: "08".into(),
            limit: Some(2),
        },
    )?
    .data
    .unwrap()
    .items;
    assert_eq!(capped.len(), 2);

    let by_name = member_service::search_members(
        &state,
        MemberSearchQuery {
            q: "rina".into(),
            limit: None,
        },
    )?
    .data
    .unwrap()
    .items;
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].phone, "0812-5501-2234");

    Ok(())
}

#[test]
fn purchase_history_returns_the_seeded_rows() -> anyhow::Result<()> {
    let state = seeded_state()?;

    let (rina_id, hendra_id) = {
        let tables = state.store.read()?;
        (tables.members[0].id, tables.members[3].id)
    };

    let rina = member_service::purchase_history(&state, rina_id)?
        .data
        .unwrap()
        .items;
    assert_eq!(rina.len(), 2);
    assert!(rina[0].description.contains("Amlodipine"));

    let hendra = member_service::purchase_history(&state, hendra_id)?
        .data
        .unwrap()
        .items;
    assert!(hendra.is_empty());

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

fn page_default() -> Pagination {
    Pagination {
        page: None,
        per_page: None,
    }
}
