//! Company endpoints
//!
//! The platform owner manages the full catalog; admins/HR can read
//! and rename their own company.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use shared::error::{AppError, ErrorCode};
use shared::models::{Company, CompanyCreate, CompanyUpdate};

use crate::auth::AuthContext;
use crate::db;
use crate::state::AppState;

use super::{ApiResult, internal};

pub async fn list(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
) -> ApiResult<Vec<Company>> {
    if context.role.is_owner() {
        let companies = db::companies::list_all(&state.pool)
            .await
            .map_err(internal)?;
        return Ok(Json(companies));
    }

    // Everyone else only sees their own company
    let company = db::companies::find_by_id(&state.pool, context.company_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::CompanyNotFound))?;
    Ok(Json(vec![company]))
}

pub async fn get_one(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<Company> {
    if !context.role.is_owner() && context.company_id != id {
        return Err(AppError::new(ErrorCode::CompanyNotFound));
    }
    let company = db::companies::find_by_id(&state.pool, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::CompanyNotFound))?;
    Ok(Json(company))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Json(data): Json<CompanyCreate>,
) -> ApiResult<Company> {
    if !context.role.is_owner() {
        return Err(AppError::new(ErrorCode::OwnerRequired));
    }
    if data.name.trim().is_empty() || data.tax_id.trim().is_empty() {
        return Err(AppError::validation("name and tax_id are required"));
    }
    if db::companies::tax_id_exists(&state.pool, &data.tax_id, None)
        .await
        .map_err(internal)?
    {
        return Err(AppError::new(ErrorCode::TaxIdExists));
    }

    let company = db::companies::create(&state.pool, &data)
        .await
        .map_err(internal)?;
    Ok(Json(company))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Path(id): Path<i64>,
    Json(data): Json<CompanyUpdate>,
) -> ApiResult<Company> {
    if !context.role.is_owner() {
        if !context.role.is_admin_or_hr() || context.company_id != id {
            return Err(AppError::new(ErrorCode::CompanyNotFound));
        }
    }
    if let Some(ref tax_id) = data.tax_id
        && db::companies::tax_id_exists(&state.pool, tax_id, Some(id))
            .await
            .map_err(internal)?
    {
        return Err(AppError::new(ErrorCode::TaxIdExists));
    }

    let company = db::companies::update(&state.pool, id, &data)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::CompanyNotFound))?;
    Ok(Json(company))
}

/// DELETE /companies/{id}: owner only; explicit child-first cascade.
pub async fn delete_one(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<serde_json::Value> {
    if !context.role.is_owner() {
        return Err(AppError::new(ErrorCode::OwnerRequired));
    }
    let deleted = db::companies::delete_cascade(&state.pool, id)
        .await
        .map_err(internal)?;
    if !deleted {
        return Err(AppError::new(ErrorCode::CompanyNotFound));
    }
    Ok(Json(serde_json::json!({ "message": "Company deleted" })))
}
