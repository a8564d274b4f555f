use chrono::Utc;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::members::{CreateMemberRequest, MemberList, PurchaseHistory, UpdateMemberRequest},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_min_role},
    models::{Member, Role},
    response::{ApiResponse, Meta},
    routes::params::{MemberQuery, MemberSearchQuery},
    state::AppState,
    store::text_match,
};

pub fn list_members(state: &AppState, query: MemberQuery) -> AppResult<ApiResponse<MemberList>> {
    let (page, limit, offset) = query.pagination.normalize();
    let tables = state.store.read()?;

    let mut items: Vec<Member> = tables
        .members
        .iter()
        .filter(|m| match query.q.as_ref().filter(|s| !s.is_empty()) {
            Some(q) => {
                text_match(q, &[&m.name, &m.phone]) || m.email.as_deref().is_some_and(|email| text_match(q, &[email]))
            }
            None => true,
        })
        .filter(|m| match query.membership_type {
            Some(membership_type) => m.membership_type == membership_type,
            None => true,
        })
        .cloned()
        .collect();
    items.sort_by(|a, b| a.name.cmp(&b.name));

    let total = items.len() as i64;
    let items: Vec<Member> = items
        .into_iter()
        .skip(offset as usize)
        .take(limit as usize)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Members",
        MemberList { items },
        Some(meta),
    ))
}

/// Quick lookup used by the POS screen to attach a member to a sale.
pub fn search_members(
    state: &AppState,
    query: MemberSearchQuery,
) -> AppResult<ApiResponse<MemberList>> {
    let limit = query.limit.unwrap_or(10).clamp(1, 50);
    let tables = state.store.read()?;

    let items: Vec<Member> = tables
        .members
        .iter()
        .filter(|m| {
            text_match(&query.q, &[&m.name, &m.phone])
                || m.email.as_deref().is_some_and(|email| text_match(&query.q, &[email]))
        })
        .take(limit as usize)
        .cloned()
        .collect();

    let total = items.len() as i64;
    Ok(ApiResponse::success(
        "Member search",
        MemberList { items },
        Some(Meta::total_only(total)),
    ))
}

pub fn get_member(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Member>> {
    let tables = state.store.read()?;
    let member = tables
        .members
        .iter()
        .find(|m| m.id == id)
        .cloned()
        .ok_or(AppError::NotFound)?;

    Ok(ApiResponse::success("Member", member, None))
}

pub fn create_member(
    state: &AppState,
    user: &AuthUser,
    payload: CreateMemberRequest,
) -> AppResult<ApiResponse<Member>> {
    ensure_min_role(user, Role::Pharmacist)?;

    let member = {
        let mut tables = state.store.write()?;
        if tables.members.iter().any(|m| m.phone == payload.phone) {
            return Err(AppError::BadRequest(
                "Phone number is already registered".into(),
            ));
        }

        let member = Member {
            id: Uuid::new_v4(),
            name: payload.name,
            phone: payload.phone,
            email: payload.email,
            membership_type: payload.membership_type,
            allergies: payload.allergies,
            medical_conditions: payload.medical_conditions,
            purchase_history: Vec::new(),
            created_at: Utc::now(),
        };
        tables.members.push(member.clone());
        member
    };

    if let Err(err) = log_audit(
        state,
        Some(user.user_id),
        "member_create",
        Some("members"),
        Some(serde_json::json!({ "member_id": member.id })),
    ) {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Member created",
        member,
        Some(Meta::empty()),
    ))
}

pub fn update_member(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateMemberRequest,
) -> AppResult<ApiResponse<Member>> {
    ensure_min_role(user, Role::Pharmacist)?;

    let member = {
        let mut tables = state.store.write()?;
        let existing = tables
            .members
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(AppError::NotFound)?;

        if let Some(name) = payload.name {
            existing.name = name;
        }
        if let Some(phone) = payload.phone {
            existing.phone = phone;
        }
        if let Some(email) = payload.email {
            existing.email = Some(email);
        }
        if let Some(membership_type) = payload.membership_type {
            existing.membership_type = membership_type;
        }
        if let Some(allergies) = payload.allergies {
            existing.allergies = allergies;
        }
        if let Some(medical_conditions) = payload.medical_conditions {
            existing.medical_conditions = medical_conditions;
        }
        existing.clone()
    };

    if let Err(err) = log_audit(
        state,
        Some(user.user_id),
        "member_update",
        Some("members"),
        Some(serde_json::json!({ "member_id": member.id })),
    ) {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success("Updated", member, Some(Meta::empty())))
}

pub fn delete_member(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_min_role(user, Role::Pharmacist)?;

    {
        let mut tables = state.store.write()?;
        let position = tables
            .members
            .iter()
            .position(|m| m.id == id)
            .ok_or(AppError::NotFound)?;
        tables.members.remove(position);
    }

    if let Err(err) = log_audit(
        state,
        Some(user.user_id),
        "member_delete",
        Some("members"),
        Some(serde_json::json!({ "member_id": id })),
    ) {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub fn purchase_history(state: &AppState, id: Uuid) -> AppResult<ApiResponse<PurchaseHistory>> {
    let tables = state.store.read()?;
    let member = tables
        .members
        .iter()
        .find(|m| m.id == id)
        .ok_or(AppError::NotFound)?;

    // Seeded rows only; checkout never appends here.
    let items = member.purchase_history.clone();
    let total = items.len() as i64;

    Ok(ApiResponse::success(
        "Purchase history",
        PurchaseHistory { items },
        Some(Meta::total_only(total)),
    ))
}
