//! Shift type catalog endpoints

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use shared::error::{AppError, ErrorCode};
use shared::models::{ShiftType, ShiftTypeCreate, ShiftTypeUpdate};

use crate::auth::AuthContext;
use crate::db;
use crate::state::AppState;

use super::{ApiResult, internal};

/// GET /shifts/types: company entries plus the global catalog
pub async fn list(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
) -> ApiResult<Vec<ShiftType>> {
    let types = db::shift_types::list_visible(&state.pool, context.company_id)
        .await
        .map_err(internal)?;
    Ok(Json(types))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Json(data): Json<ShiftTypeCreate>,
) -> ApiResult<ShiftType> {
    if !context.role.is_admin_or_hr() {
        return Err(AppError::new(ErrorCode::AdminRequired));
    }
    if data.code.trim().is_empty() || data.name.trim().is_empty() {
        return Err(AppError::validation("code and name are required"));
    }

    // The owner creates global entries; everyone else company-scoped.
    let company_id = if context.role.is_owner() {
        None
    } else {
        Some(context.company_id)
    };

    if db::shift_types::code_exists(&state.pool, company_id, &data.code, None)
        .await
        .map_err(internal)?
    {
        return Err(AppError::new(ErrorCode::ShiftTypeCodeExists));
    }

    let shift_type = db::shift_types::create(&state.pool, company_id, &data)
        .await
        .map_err(internal)?;
    Ok(Json(shift_type))
}

async fn load_editable(
    state: &AppState,
    context: &AuthContext,
    id: i64,
) -> Result<ShiftType, AppError> {
    let shift_type = db::shift_types::find_by_id(&state.pool, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::ShiftTypeNotFound))?;

    // Global entries are owner-managed; company entries belong to
    // their company's admins.
    let editable = match shift_type.company_id {
        None => context.role.is_owner(),
        Some(company_id) => context.role.is_owner() || company_id == context.company_id,
    };
    if !editable {
        return Err(AppError::new(ErrorCode::ShiftTypeNotFound));
    }
    Ok(shift_type)
}

pub async fn update(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Path(id): Path<i64>,
    Json(data): Json<ShiftTypeUpdate>,
) -> ApiResult<ShiftType> {
    if !context.role.is_admin_or_hr() {
        return Err(AppError::new(ErrorCode::AdminRequired));
    }
    let existing = load_editable(&state, &context, id).await?;

    if let Some(ref code) = data.code
        && db::shift_types::code_exists(&state.pool, existing.company_id, code, Some(id))
            .await
            .map_err(internal)?
    {
        return Err(AppError::new(ErrorCode::ShiftTypeCodeExists));
    }

    let shift_type = db::shift_types::update(&state.pool, id, &data)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::ShiftTypeNotFound))?;
    Ok(Json(shift_type))
}

pub async fn delete_one(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<serde_json::Value> {
    if !context.role.is_admin_or_hr() {
        return Err(AppError::new(ErrorCode::AdminRequired));
    }
    load_editable(&state, &context, id).await?;
    db::shift_types::delete(&state.pool, id)
        .await
        .map_err(internal)?;
    Ok(Json(serde_json::json!({ "message": "Shift type deleted" })))
}
