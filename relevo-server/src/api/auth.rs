//! Authentication endpoints: login and token refresh

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use shared::models::{Employee, SystemRole};

use crate::auth::jwt::create_access_token;
use crate::db;
use crate::state::AppState;
use crate::util::verify_password;

use super::{ApiResult, internal};

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub employee: Employee,
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<TokenPair> {
    let email = req.email.trim().to_lowercase();
    let auth_row = db::employees::find_by_email_for_login(&state.pool, &email)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::InvalidCredentials))?;

    if !verify_password(&req.password, &auth_row.password_hash) {
        return Err(AppError::new(ErrorCode::InvalidCredentials));
    }

    let refresh_token = db::refresh_tokens::create(&state.pool, auth_row.id)
        .await
        .map_err(internal)?;

    build_pair(&state, auth_row.id, auth_row.company_id, &auth_row.role_name, refresh_token).await
}

#[derive(Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// POST /auth/refresh: rotate the refresh token, mint a new pair
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<TokenPair> {
    let (employee_id, new_refresh) = db::refresh_tokens::rotate(&state.pool, &req.refresh_token)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::RefreshTokenInvalid))?;

    let auth_row = db::employees::find_auth_info(&state.pool, employee_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::RefreshTokenInvalid))?;

    build_pair(&state, auth_row.id, auth_row.company_id, &auth_row.role_name, new_refresh).await
}

/// Mint the access token with role/company claims baked in and
/// serialize the profile for the client.
async fn build_pair(
    state: &AppState,
    employee_id: i64,
    company_id: i64,
    role_name: &str,
    refresh_token: String,
) -> ApiResult<TokenPair> {
    let role = SystemRole::infer_from_role_name(role_name);

    let access_token = create_access_token(employee_id, company_id, role, &state.jwt_secret)
        .map_err(|e| {
            tracing::error!("JWT creation failed: {e}");
            AppError::new(ErrorCode::InternalError)
        })?;

    let employee = db::employees::find_by_id(&state.pool, employee_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::EmployeeNotFound))?;

    Ok(Json(TokenPair {
        access_token,
        refresh_token,
        employee,
    }))
}
