use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordVerifier},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};

use crate::{
    audit::log_audit,
    config,
    dto::auth::{Claims, LoginRequest, LoginResponse, SessionUser},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub fn login(state: &AppState, payload: LoginRequest) -> AppResult<ApiResponse<LoginResponse>> {
    let LoginRequest { email, password } = payload;

    let account = {
        let tables = state.store.read()?;
        tables
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(&email))
            .cloned()
    };

    let account = match account {
        Some(a) => a,
        None => return Err(AppError::BadRequest("Invalid email or password".into())),
    };

    let parsed_hash = PasswordHash::new(&account.password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;

    let argon2 = Argon2::default();
    if argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(AppError::BadRequest("Invalid email or password".into()));
    }

    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(24))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: account.id.to_string(),
        name: account.name.clone(),
        role: account.role,
        exp: expiration.timestamp() as usize,
    };

    let secret = config::jwt_secret();
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;

    let resp = LoginResponse {
        token: format!("Bearer {}", token),
        user: SessionUser {
            id: account.id,
            email: account.email.clone(),
            name: account.name.clone(),
            role: account.role,
        },
    };

    if let Err(err) = log_audit(
        state,
        Some(account.id),
        "user_login",
        Some("users"),
        Some(serde_json::json!({ "email": account.email })),
    ) {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success("Logged in", resp, Some(Meta::empty())))
}

pub fn me(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<SessionUser>> {
    let tables = state.store.read()?;
    let account = tables
        .users
        .iter()
        .find(|u| u.id == user.user_id)
        .ok_or(AppError::NotFound)?;

    let session = SessionUser {
        id: account.id,
        email: account.email.clone(),
        name: account.name.clone(),
        role: account.role,
    };

    Ok(ApiResponse::success("Session", session, None))
}

pub fn logout(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<serde_json::Value>> {
    if let Err(err) = log_audit(
        state,
        Some(user.user_id),
        "user_logout",
        Some("users"),
        None,
    ) {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Signed out",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
