//! Shift endpoints: merged schedule listing and explicit-shift CRUD

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use chrono::NaiveDate;
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{Occurrence, Shift, ShiftCreate, ShiftUpdate};

use crate::auth::AuthContext;
use crate::db;
use crate::scheduling;
use crate::state::AppState;

use super::{ApiResult, internal, resolve_target_employee};

#[derive(Deserialize)]
pub struct ListQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub employee_id: Option<i64>,
}

/// GET /shifts?from&to&employee_id
///
/// Explicit shifts merged with occurrences projected from active
/// series, ordered by (date, start_time).
pub async fn list(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<Occurrence>> {
    if query.from > query.to {
        return Err(AppError::validation("'from' must not be after 'to'"));
    }
    let target = resolve_target_employee(&state, &context, query.employee_id).await?;

    let explicit =
        db::shifts::list_for_employee_window(&state.pool, target.id, query.from, query.to)
            .await
            .map_err(internal)?;
    let explicit_index = scheduling::index_by_date(&explicit);

    let series_list =
        db::series::list_active_intersecting(&state.pool, target.id, query.from, query.to)
            .await
            .map_err(internal)?;

    let mut generated = Vec::new();
    for series in &series_list {
        let exceptions =
            db::series::list_exceptions_in_window(&state.pool, series.id, query.from, query.to)
                .await
                .map_err(internal)?
                .into_iter()
                .map(|exc| (exc.exception_date, exc))
                .collect();
        generated.extend(scheduling::expand_series(
            series,
            &exceptions,
            &explicit_index,
            query.from,
            query.to,
        ));
    }

    Ok(Json(scheduling::merge_occurrences(explicit, generated)))
}

pub async fn get_one(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<Shift> {
    let shift = load_visible(&state, &context, id).await?;
    Ok(Json(shift))
}

async fn load_visible(
    state: &AppState,
    context: &AuthContext,
    id: i64,
) -> Result<Shift, AppError> {
    let shift = db::shifts::find_by_id(&state.pool, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::ShiftNotFound))?;

    let visible = context.role.is_owner()
        || (shift.company_id == context.company_id
            && (context.role.is_admin_or_hr() || shift.employee_id == context.employee_id));
    if !visible {
        return Err(AppError::new(ErrorCode::ShiftNotFound));
    }
    Ok(shift)
}

/// Shared validation for create/update: time order, type visibility,
/// and the same-day overlap conflict.
async fn validate_shift_write(
    state: &AppState,
    company_id: i64,
    employee_id: i64,
    date: NaiveDate,
    start: chrono::NaiveTime,
    end: chrono::NaiveTime,
    shift_type_id: i64,
    exclude_id: Option<i64>,
) -> Result<(), AppError> {
    if end <= start {
        return Err(AppError::new(ErrorCode::ShiftTimeInvalid));
    }
    db::shift_types::find_visible(&state.pool, shift_type_id, company_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::ShiftTypeNotFound))?;

    let same_day = db::shifts::list_same_day(&state.pool, employee_id, date, exclude_id)
        .await
        .map_err(internal)?;
    let conflict = same_day
        .iter()
        .any(|other| scheduling::overlaps(start, end, other.start_time, other.end_time));
    if conflict {
        return Err(AppError::new(ErrorCode::ShiftOverlap));
    }
    Ok(())
}

pub async fn create(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Json(data): Json<ShiftCreate>,
) -> ApiResult<Shift> {
    if !context.role.is_admin_or_hr() {
        return Err(AppError::new(ErrorCode::AdminRequired));
    }
    let target = resolve_target_employee(&state, &context, Some(data.employee_id)).await?;

    validate_shift_write(
        &state,
        target.company_id,
        target.id,
        data.shift_date,
        data.start_time,
        data.end_time,
        data.shift_type_id,
        None,
    )
    .await?;

    let shift = db::shifts::create(&state.pool, target.company_id, &data)
        .await
        .map_err(internal)?;
    Ok(Json(shift))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Path(id): Path<i64>,
    Json(data): Json<ShiftUpdate>,
) -> ApiResult<Shift> {
    if !context.role.is_admin_or_hr() {
        return Err(AppError::new(ErrorCode::AdminRequired));
    }
    let existing = load_visible(&state, &context, id).await?;

    // Validate the row as it will stand after the partial update
    let date = data.shift_date.unwrap_or(existing.shift_date);
    let start = data.start_time.unwrap_or(existing.start_time);
    let end = data.end_time.unwrap_or(existing.end_time);
    let shift_type_id = data.shift_type_id.unwrap_or(existing.shift_type_id);

    validate_shift_write(
        &state,
        existing.company_id,
        existing.employee_id,
        date,
        start,
        end,
        shift_type_id,
        Some(id),
    )
    .await?;

    let shift = db::shifts::update(&state.pool, id, &data)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::ShiftNotFound))?;
    Ok(Json(shift))
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
    db::shifts::delete(&state.pool, id).await.map_err(internal)?;
    Ok(Json(serde_json::json!({ "message": "Shift deleted" })))
}
