//! Holiday request endpoints and vacation balance accounting

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use chrono::Datelike;
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    AllocateRequest, BalanceView, Holiday, HolidayCreate, HolidayStatus, HolidayUpdate,
};

use crate::auth::AuthContext;
use crate::db;
use crate::db::holidays::HolidayFilter;
use crate::error::ServiceResult;
use crate::state::AppState;
use crate::vacation;

use super::{ApiResult, internal, load_employee_visible, resolve_target_employee};

#[derive(Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    /// Owner-only cross-tenant filter
    pub company_id: Option<i64>,
}

/// GET /holidays?status&company_id
pub async fn list(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<Holiday>> {
    let status = match query.status.as_deref() {
        None | Some("") => None,
        Some(s) => Some(
            HolidayStatus::from_str_ci(s)
                .ok_or_else(|| AppError::validation(format!("Unknown status: {s}")))?,
        ),
    };

    let filter = if context.role.is_owner() {
        HolidayFilter {
            company_id: query.company_id,
            employee_id: None,
            status,
        }
    } else if context.role.is_admin_or_hr() {
        HolidayFilter {
            company_id: Some(context.company_id),
            employee_id: None,
            status,
        }
    } else {
        HolidayFilter {
            company_id: Some(context.company_id),
            employee_id: Some(context.employee_id),
            status,
        }
    };

    let holidays = db::holidays::list(&state.pool, filter)
        .await
        .map_err(internal)?;
    Ok(Json(holidays))
}

async fn load_visible(
    state: &AppState,
    context: &AuthContext,
    id: i64,
) -> Result<Holiday, AppError> {
    let holiday = db::holidays::find_by_id(&state.pool, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::HolidayNotFound))?;

    let visible = context.role.is_owner()
        || (holiday.company_id == context.company_id
            && (context.role.is_admin_or_hr() || holiday.employee_id == context.employee_id));
    if !visible {
        return Err(AppError::new(ErrorCode::HolidayNotFound));
    }
    Ok(holiday)
}

pub async fn get_one(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<Holiday> {
    Ok(Json(load_visible(&state, &context, id).await?))
}

// ── Balance ──

#[derive(Deserialize)]
pub struct BalanceQuery {
    pub year: Option<i32>,
}

async fn build_balance_view(
    state: &AppState,
    company_id: i64,
    employee_id: i64,
    year: i32,
    balance: shared::models::VacationBalance,
) -> Result<BalanceView, AppError> {
    let pending = db::holidays::pending_days_sum(&state.pool, company_id, employee_id, year, None)
        .await
        .map_err(internal)?;
    let remaining =
        vacation::remaining_days(balance.allocated_days, balance.used_days, pending).max(0);
    Ok(BalanceView {
        balance,
        pending_days: pending,
        remaining_days: remaining,
    })
}

/// GET /holidays/balance/me?year
pub async fn my_balance(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Query(query): Query<BalanceQuery>,
) -> ApiResult<BalanceView> {
    let year = query.year.unwrap_or_else(|| chrono::Utc::now().year());
    let balance = db::balances::get_or_create(
        &state.pool,
        context.company_id,
        context.employee_id,
        year,
    )
    .await
    .map_err(internal)?;

    let view =
        build_balance_view(&state, context.company_id, context.employee_id, year, balance).await?;
    Ok(Json(view))
}

/// PUT /holidays/balance/allocate: admin/HR adjust allocated_days
pub async fn allocate(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Json(req): Json<AllocateRequest>,
) -> ApiResult<BalanceView> {
    if !context.role.is_admin_or_hr() {
        return Err(AppError::new(ErrorCode::AdminRequired));
    }
    if req.allocated_days < 0 {
        return Err(AppError::validation("allocated_days must be >= 0"));
    }
    let target = load_employee_visible(&state, &context, req.employee_id).await?;
    let year = req.year.unwrap_or_else(|| chrono::Utc::now().year());

    let balance =
        db::balances::get_or_create(&state.pool, target.company_id, target.id, year)
            .await
            .map_err(internal)?;
    let balance = db::balances::set_allocation(&state.pool, balance.id, req.allocated_days)
        .await
        .map_err(internal)?;

    let view = build_balance_view(&state, target.company_id, target.id, year, balance).await?;
    Ok(Json(view))
}

// ── Lifecycle ──

/// Overlap + balance sufficiency, shared by create/edit/approve.
/// Infrastructure failures ride the `ServiceError::Db` variant.
async fn check_feasibility(
    state: &AppState,
    company_id: i64,
    employee_id: i64,
    start: chrono::NaiveDate,
    end: chrono::NaiveDate,
    exclude_id: Option<i64>,
) -> ServiceResult<(i32, shared::models::VacationBalance)> {
    if end < start {
        return Err(AppError::new(ErrorCode::HolidayRangeInvalid).into());
    }
    if db::holidays::overlap_exists(&state.pool, company_id, employee_id, start, end, exclude_id)
        .await?
    {
        return Err(AppError::new(ErrorCode::HolidayOverlap).into());
    }

    let requested_days = vacation::business_days(start, end);
    if requested_days <= 0 {
        return Err(AppError::new(ErrorCode::NoBusinessDays).into());
    }

    let year = start.year();
    let balance = db::balances::get_or_create(&state.pool, company_id, employee_id, year).await?;
    let pending_others =
        db::holidays::pending_days_sum(&state.pool, company_id, employee_id, year, exclude_id)
            .await?;
    let remaining =
        vacation::remaining_days(balance.allocated_days, balance.used_days, pending_others);
    if requested_days > remaining {
        return Err(AppError::new(ErrorCode::InsufficientBalance).into());
    }

    Ok((requested_days, balance))
}

/// POST /holidays
pub async fn create(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Json(data): Json<HolidayCreate>,
) -> ApiResult<Holiday> {
    // Plain employees may only file for themselves; an employee_id
    // naming someone else is a 403.
    if let Some(requested) = data.employee_id
        && requested != context.employee_id
        && !context.role.is_admin_or_hr()
    {
        return Err(AppError::forbidden(
            "You can only create holidays for yourself",
        ));
    }
    let target = resolve_target_employee(&state, &context, data.employee_id).await?;

    let reason = data
        .reason
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty());

    let (requested_days, _) = check_feasibility(
        &state,
        target.company_id,
        target.id,
        data.start_date,
        data.end_date,
        None,
    )
    .await?;

    let holiday = db::holidays::create(
        &state.pool,
        target.company_id,
        target.id,
        data.start_date,
        data.end_date,
        requested_days,
        reason,
    )
    .await
    .map_err(internal)?;
    Ok(Json(holiday))
}

/// PUT /holidays/{id}
///
/// Admin/HR/owner: dates, reason, direct status writes.
/// Employees: only their own PENDING requests, dates and reason.
pub async fn update(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Path(id): Path<i64>,
    Json(data): Json<HolidayUpdate>,
) -> ApiResult<Holiday> {
    let mut holiday = load_visible(&state, &context, id).await?;
    let is_privileged = context.role.is_admin_or_hr();

    if !is_privileged {
        if holiday.employee_id != context.employee_id {
            return Err(AppError::new(ErrorCode::HolidayNotFound));
        }
        if holiday.status != HolidayStatus::Pending {
            return Err(AppError::with_message(
                ErrorCode::HolidayNotPending,
                "Only PENDING requests can be edited by the employee",
            ));
        }
        if data.status.is_some() {
            return Err(AppError::forbidden("Employees cannot change the status"));
        }
    }

    if let Some(start) = data.start_date {
        holiday.start_date = start;
    }
    if let Some(end) = data.end_date {
        holiday.end_date = end;
    }
    if let Some(ref reason) = data.reason {
        let trimmed = reason.trim();
        holiday.reason = (!trimmed.is_empty()).then(|| trimmed.to_string());
    }

    if holiday.end_date < holiday.start_date {
        return Err(AppError::new(ErrorCode::HolidayRangeInvalid));
    }
    if db::holidays::overlap_exists(
        &state.pool,
        holiday.company_id,
        holiday.employee_id,
        holiday.start_date,
        holiday.end_date,
        Some(holiday.id),
    )
    .await
    .map_err(internal)?
    {
        return Err(AppError::new(ErrorCode::HolidayOverlap));
    }
    holiday.requested_days = vacation::business_days(holiday.start_date, holiday.end_date);

    if is_privileged {
        if let Some(ref status_in) = data.status
            && let Some(status) = HolidayStatus::from_str_ci(status_in)
        {
            holiday.status = status;
        }
    } else {
        // Employees must still fit the balance after a date change
        let year = holiday.start_date.year();
        let balance = db::balances::get_or_create(
            &state.pool,
            holiday.company_id,
            holiday.employee_id,
            year,
        )
        .await
        .map_err(internal)?;
        let pending_others = db::holidays::pending_days_sum(
            &state.pool,
            holiday.company_id,
            holiday.employee_id,
            year,
            Some(holiday.id),
        )
        .await
        .map_err(internal)?;
        let remaining =
            vacation::remaining_days(balance.allocated_days, balance.used_days, pending_others);
        if holiday.requested_days > remaining {
            return Err(AppError::new(ErrorCode::InsufficientBalance));
        }
    }

    let saved = db::holidays::save_edit(&state.pool, &holiday)
        .await
        .map_err(internal)?;
    Ok(Json(saved))
}

/// DELETE /holidays/{id}
pub async fn delete_one(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<serde_json::Value> {
    let holiday = load_visible(&state, &context, id).await?;

    if !context.role.is_admin_or_hr() {
        if holiday.employee_id != context.employee_id {
            return Err(AppError::new(ErrorCode::HolidayNotFound));
        }
        if holiday.status != HolidayStatus::Pending {
            return Err(AppError::with_message(
                ErrorCode::HolidayNotPending,
                "Only PENDING requests can be deleted by the employee",
            ));
        }
    }

    db::holidays::delete(&state.pool, id)
        .await
        .map_err(internal)?;
    Ok(Json(serde_json::json!({ "message": "Holiday deleted" })))
}

/// POST /holidays/{id}/approve
///
/// Re-validates range, overlap and balance before consuming
/// `used_days`; time may have passed since the request was filed.
pub async fn approve(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<Holiday> {
    if !context.role.is_admin_or_hr() {
        return Err(AppError::new(ErrorCode::AdminRequired));
    }
    let holiday = load_visible(&state, &context, id).await?;

    if holiday.status != HolidayStatus::Pending {
        return Err(AppError::with_message(
            ErrorCode::HolidayNotPending,
            "Only PENDING requests can be approved",
        ));
    }

    let (requested_days, balance) = check_feasibility(
        &state,
        holiday.company_id,
        holiday.employee_id,
        holiday.start_date,
        holiday.end_date,
        Some(holiday.id),
    )
    .await?;

    let approved = db::holidays::approve(
        &state.pool,
        holiday.id,
        balance.id,
        requested_days,
        context.employee_id,
    )
    .await
    .map_err(internal)?;
    Ok(Json(approved))
}

/// POST /holidays/{id}/reject: stamps the decision, balance untouched
pub async fn reject(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<Holiday> {
    if !context.role.is_admin_or_hr() {
        return Err(AppError::new(ErrorCode::AdminRequired));
    }
    let holiday = load_visible(&state, &context, id).await?;

    if holiday.status != HolidayStatus::Pending {
        return Err(AppError::with_message(
            ErrorCode::HolidayNotPending,
            "Only PENDING requests can be rejected",
        ));
    }

    let rejected = db::holidays::reject(&state.pool, holiday.id, context.employee_id)
        .await
        .map_err(internal)?;
    Ok(Json(rejected))
}
