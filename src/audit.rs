use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use crate::{
    error::AppResult,
    middleware::auth::{AuthUser, ensure_super_admin},
    models::AuditEntry,
    response::{ApiResponse, Meta},
    routes::admin::AuditList,
    routes::params::AuditQuery,
    state::AppState,
    store::text_match,
};

pub fn log_audit(
    state: &AppState,
    user_id: Option<Uuid>,
    action: &str,
    resource: Option<&str>,
    metadata: Option<Value>,
) -> AppResult<()> {
    let mut tables = state.store.write()?;
    tables.audit_log.push(AuditEntry {
        id: Uuid::new_v4(),
        user_id,
        action: action.to_string(),
        resource: resource.map(str::to_string),
        metadata,
        created_at: Utc::now(),
    });

    Ok(())
}

pub fn list_audit(
    state: &AppState,
    user: &AuthUser,
    query: AuditQuery,
) -> AppResult<ApiResponse<AuditList>> {
    ensure_super_admin(user)?;

    let (page, limit, offset) = query.pagination.normalize();
    let tables = state.store.read()?;

    let mut items: Vec<AuditEntry> = tables
        .audit_log
        .iter()
        .filter(|entry| match query.action.as_ref().filter(|s| !s.is_empty()) {
            Some(action) => text_match(action, &[&entry.action]),
            None => true,
        })
        .cloned()
        .collect();
    items.sort_by_key(|entry| std::cmp::Reverse(entry.created_at));

    let total = items.len() as i64;
    let items: Vec<AuditEntry> = items
        .into_iter()
        .skip(offset as usize)
        .take(limit as usize)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Audit log",
        AuditList { items },
        Some(meta),
    ))
}
