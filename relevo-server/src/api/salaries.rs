//! Salary endpoints, company-scoped

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use shared::error::{AppError, ErrorCode};
use shared::models::{Salary, SalaryCreate, SalaryUpdate};

use crate::auth::AuthContext;
use crate::db;
use crate::state::AppState;

use super::{ApiResult, internal};

pub async fn list(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
) -> ApiResult<Vec<Salary>> {
    let salaries = db::salaries::list_by_company(&state.pool, context.company_id)
        .await
        .map_err(internal)?;
    Ok(Json(salaries))
}

async fn load_visible(
    state: &AppState,
    context: &AuthContext,
    id: i64,
) -> Result<Salary, AppError> {
    db::salaries::find_by_id(&state.pool, id)
        .await
        .map_err(internal)?
        .filter(|s| context.role.is_owner() || s.company_id == context.company_id)
        .ok_or_else(|| AppError::new(ErrorCode::SalaryNotFound))
}

pub async fn get_one(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<Salary> {
    Ok(Json(load_visible(&state, &context, id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Json(data): Json<SalaryCreate>,
) -> ApiResult<Salary> {
    if !context.role.is_admin_or_hr() {
        return Err(AppError::new(ErrorCode::AdminRequired));
    }
    if data.amount <= 0 {
        return Err(AppError::new(ErrorCode::SalaryAmountInvalid));
    }
    let salary = db::salaries::create(&state.pool, context.company_id, data.amount)
        .await
        .map_err(internal)?;
    Ok(Json(salary))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Path(id): Path<i64>,
    Json(data): Json<SalaryUpdate>,
) -> ApiResult<Salary> {
    if !context.role.is_admin_or_hr() {
        return Err(AppError::new(ErrorCode::AdminRequired));
    }
    load_visible(&state, &context, id).await?;
    if matches!(data.amount, Some(amount) if amount <= 0) {
        return Err(AppError::new(ErrorCode::SalaryAmountInvalid));
    }

    let salary = db::salaries::update(&state.pool, id, &data)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::SalaryNotFound))?;
    Ok(Json(salary))
}

pub async fn delete_one(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<serde_json::Value> {
    if !context.role.is_admin_or_hr() {
        return Err(AppError::new(ErrorCode::AdminRequired));
    }
    load_visible(&state, &context, id).await?;
    db::salaries::delete(&state.pool, id)
        .await
        .map_err(internal)?;
    Ok(Json(serde_json::json!({ "message": "Salary deleted" })))
}
