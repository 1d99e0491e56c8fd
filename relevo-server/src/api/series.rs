//! Recurring shift series and exception endpoints

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use chrono::{NaiveDate, NaiveTime};
use shared::error::{AppError, ErrorCode};
use shared::models::{
    ExceptionAction, ExceptionUpsert, SeriesCreate, SeriesUpdate, ShiftException, ShiftSeries,
    WeekdayMask,
};

use crate::auth::AuthContext;
use crate::db;
use crate::state::AppState;

use super::{ApiResult, internal, resolve_target_employee};

/// Validate a recurrence rule as it will be stored.
fn validate_rule(
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    start_time: NaiveTime,
    end_time: NaiveTime,
    weekdays_mask: i16,
    interval_weeks: i32,
    timezone: &str,
) -> Result<(), AppError> {
    if let Some(end) = end_date
        && end < start_date
    {
        return Err(AppError::with_message(
            ErrorCode::SeriesRuleInvalid,
            "end_date must be >= start_date",
        ));
    }
    if end_time <= start_time {
        return Err(AppError::new(ErrorCode::ShiftTimeInvalid));
    }
    if WeekdayMask::from_bits(weekdays_mask as u8).is_empty() {
        return Err(AppError::with_message(
            ErrorCode::SeriesRuleInvalid,
            "weekdays_mask must select at least one weekday",
        ));
    }
    if interval_weeks < 1 {
        return Err(AppError::with_message(
            ErrorCode::SeriesRuleInvalid,
            "interval_weeks must be >= 1",
        ));
    }
    if timezone.parse::<chrono_tz::Tz>().is_err() {
        return Err(AppError::new(ErrorCode::TimezoneInvalid));
    }
    Ok(())
}

/// POST /shifts/series
pub async fn create(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Json(data): Json<SeriesCreate>,
) -> ApiResult<ShiftSeries> {
    if !context.role.is_admin_or_hr() {
        return Err(AppError::new(ErrorCode::AdminRequired));
    }
    let target = resolve_target_employee(&state, &context, Some(data.employee_id)).await?;

    let timezone = data
        .timezone
        .clone()
        .unwrap_or_else(|| state.default_timezone.name().to_string());
    validate_rule(
        data.start_date,
        data.end_date,
        data.start_time,
        data.end_time,
        data.weekdays_mask,
        data.interval_weeks.unwrap_or(1),
        &timezone,
    )?;

    db::shift_types::find_visible(&state.pool, data.shift_type_id, target.company_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::ShiftTypeNotFound))?;

    let series = db::series::create(&state.pool, target.company_id, &data, &timezone)
        .await
        .map_err(internal)?;
    Ok(Json(series))
}

async fn load_visible(
    state: &AppState,
    context: &AuthContext,
    id: i64,
) -> Result<ShiftSeries, AppError> {
    let series = db::series::find_by_id(&state.pool, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::SeriesNotFound))?;
    if !context.role.is_owner() && series.company_id != context.company_id {
        return Err(AppError::new(ErrorCode::SeriesNotFound));
    }
    Ok(series)
}

/// PUT /shifts/series/{id}
pub async fn update(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Path(id): Path<i64>,
    Json(data): Json<SeriesUpdate>,
) -> ApiResult<ShiftSeries> {
    if !context.role.is_admin_or_hr() {
        return Err(AppError::new(ErrorCode::AdminRequired));
    }
    let existing = load_visible(&state, &context, id).await?;

    // Validate the rule as it will stand after the partial update
    validate_rule(
        data.start_date.unwrap_or(existing.start_date),
        data.end_date.or(existing.end_date),
        data.start_time.unwrap_or(existing.start_time),
        data.end_time.unwrap_or(existing.end_time),
        data.weekdays_mask.unwrap_or(existing.weekdays_mask),
        data.interval_weeks.unwrap_or(existing.interval_weeks),
        data.timezone.as_deref().unwrap_or(&existing.timezone),
    )?;

    if let Some(shift_type_id) = data.shift_type_id {
        db::shift_types::find_visible(&state.pool, shift_type_id, existing.company_id)
            .await
            .map_err(internal)?
            .ok_or_else(|| AppError::new(ErrorCode::ShiftTypeNotFound))?;
    }

    let series = db::series::update(&state.pool, id, &data)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::SeriesNotFound))?;
    Ok(Json(series))
}

/// DELETE /shifts/series/{id}: removes the rule and its exceptions
pub async fn delete_one(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<serde_json::Value> {
    if !context.role.is_admin_or_hr() {
        return Err(AppError::new(ErrorCode::AdminRequired));
    }
    load_visible(&state, &context, id).await?;
    db::series::delete(&state.pool, id).await.map_err(internal)?;
    Ok(Json(serde_json::json!({ "message": "Series deleted" })))
}

/// POST /shifts/series/{id}/exceptions: insert or replace the
/// exception for one date.
pub async fn upsert_exception(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Path(id): Path<i64>,
    Json(data): Json<ExceptionUpsert>,
) -> ApiResult<ShiftException> {
    if !context.role.is_admin_or_hr() {
        return Err(AppError::new(ErrorCode::AdminRequired));
    }
    let series = load_visible(&state, &context, id).await?;

    if data.action == ExceptionAction::Modify {
        if data.start_time.is_none() && data.end_time.is_none() && data.shift_type_id.is_none() {
            return Err(AppError::with_message(
                ErrorCode::ExceptionInvalid,
                "modify requires at least one override field",
            ));
        }
        if let (Some(start), Some(end)) = (data.start_time, data.end_time)
            && end <= start
        {
            return Err(AppError::new(ErrorCode::ShiftTimeInvalid));
        }
        if let Some(shift_type_id) = data.shift_type_id {
            db::shift_types::find_visible(&state.pool, shift_type_id, series.company_id)
                .await
                .map_err(internal)?
                .ok_or_else(|| AppError::new(ErrorCode::ShiftTypeNotFound))?;
        }
    }

    let exception = db::series::upsert_exception(&state.pool, id, &data)
        .await
        .map_err(internal)?;
    Ok(Json(exception))
}

/// DELETE /shifts/series/{id}/exceptions/{date}
pub async fn delete_exception(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Path((id, date)): Path<(i64, NaiveDate)>,
) -> ApiResult<serde_json::Value> {
    if !context.role.is_admin_or_hr() {
        return Err(AppError::new(ErrorCode::AdminRequired));
    }
    load_visible(&state, &context, id).await?;

    let deleted = db::series::delete_exception_by_date(&state.pool, id, date)
        .await
        .map_err(internal)?;
    if !deleted {
        return Err(AppError::new(ErrorCode::ExceptionNotFound));
    }
    Ok(Json(serde_json::json!({ "message": "Exception deleted" })))
}
