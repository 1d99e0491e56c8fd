//! Role endpoints, company-scoped

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use shared::error::{AppError, ErrorCode};
use shared::models::{Role, RoleCreate, RoleUpdate};

use crate::auth::AuthContext;
use crate::db;
use crate::state::AppState;

use super::{ApiResult, internal};

pub async fn list(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
) -> ApiResult<Vec<Role>> {
    let roles = db::roles::list_by_company(&state.pool, context.company_id)
        .await
        .map_err(internal)?;
    Ok(Json(roles))
}

async fn load_visible(
    state: &AppState,
    context: &AuthContext,
    id: i64,
) -> Result<Role, AppError> {
    db::roles::find_by_id(&state.pool, id)
        .await
        .map_err(internal)?
        .filter(|r| context.role.is_owner() || r.company_id == context.company_id)
        .ok_or_else(|| AppError::new(ErrorCode::RoleNotFound))
}

pub async fn get_one(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<Role> {
    Ok(Json(load_visible(&state, &context, id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Json(data): Json<RoleCreate>,
) -> ApiResult<Role> {
    if !context.role.is_admin_or_hr() {
        return Err(AppError::new(ErrorCode::AdminRequired));
    }
    if data.name.trim().is_empty() {
        return Err(AppError::validation("name is required"));
    }
    // Salary must live in the same company
    db::salaries::find_by_id(&state.pool, data.salary_id)
        .await
        .map_err(internal)?
        .filter(|s| s.company_id == context.company_id)
        .ok_or_else(|| AppError::new(ErrorCode::SalaryNotFound))?;

    let role = db::roles::create(&state.pool, context.company_id, &data)
        .await
        .map_err(internal)?;
    Ok(Json(role))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Path(id): Path<i64>,
    Json(data): Json<RoleUpdate>,
) -> ApiResult<Role> {
    if !context.role.is_admin_or_hr() {
        return Err(AppError::new(ErrorCode::AdminRequired));
    }
    let existing = load_visible(&state, &context, id).await?;

    if let Some(salary_id) = data.salary_id {
        db::salaries::find_by_id(&state.pool, salary_id)
            .await
            .map_err(internal)?
            .filter(|s| s.company_id == existing.company_id)
            .ok_or_else(|| AppError::new(ErrorCode::SalaryNotFound))?;
    }

    let role = db::roles::update(&state.pool, id, &data)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::RoleNotFound))?;
    Ok(Json(role))
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

    if db::roles::in_use(&state.pool, id).await.map_err(internal)? {
        return Err(AppError::new(ErrorCode::RoleInUse));
    }

    db::roles::delete(&state.pool, id).await.map_err(internal)?;
    Ok(Json(serde_json::json!({ "message": "Role deleted" })))
}
