//! Time-clock endpoints
//!
//! Writes append to the punch log with a short debounce window so a
//! double-submitted button press does not create duplicate events.
//! Reads replay the log through the session reconstructor.

use axum::{
    Extension, Json,
    extract::{Query, State},
};
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use shared::models::{PunchRequest, PunchStatus, PunchType, TimePunch};

use crate::auth::AuthContext;
use crate::db;
use crate::state::AppState;
use crate::timeclock;

use super::{ApiResult, internal, resolve_target_employee};

/// Anti-double-click window for write endpoints.
const DEBOUNCE_SECONDS: i64 = 2;

#[derive(Serialize)]
pub struct PunchWriteResponse {
    pub ok: bool,
    pub punch: TimePunch,
    /// True when the write was swallowed as an echo of the previous
    /// punch.
    pub idempotent: bool,
}

#[derive(Serialize)]
pub struct PunchBatchResponse {
    pub ok: bool,
    pub punches: Vec<TimePunch>,
}

/// Last punch if it is younger than the debounce window.
async fn last_recent(
    state: &AppState,
    employee_id: i64,
) -> Result<Option<TimePunch>, AppError> {
    let last = db::punches::last_for_employee(&state.pool, employee_id)
        .await
        .map_err(internal)?;
    Ok(last.filter(|p| (Utc::now() - p.punched_at).num_seconds() < DEBOUNCE_SECONDS))
}

/// POST /time-punch/start
pub async fn start(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    body: Option<Json<PunchRequest>>,
) -> ApiResult<PunchWriteResponse> {
    let note = body.and_then(|Json(b)| b.note);
    let employee_id = context.employee_id;

    if let Some(recent) = last_recent(&state, employee_id).await?
        && recent.punch_type == PunchType::In
    {
        return Ok(Json(PunchWriteResponse {
            ok: true,
            punch: recent,
            idempotent: true,
        }));
    }

    let last = db::punches::last_for_employee(&state.pool, employee_id)
        .await
        .map_err(internal)?;
    if matches!(last, Some(ref p) if p.punch_type != PunchType::Out) {
        return Err(AppError::new(ErrorCode::PunchAlreadyOpen));
    }

    let punch = db::punches::insert(
        &state.pool,
        employee_id,
        PunchType::In,
        Utc::now(),
        note.as_deref(),
    )
    .await
    .map_err(internal)?;
    Ok(Json(PunchWriteResponse {
        ok: true,
        punch,
        idempotent: false,
    }))
}

/// POST /time-punch/pause-toggle
pub async fn pause_toggle(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    body: Option<Json<PunchRequest>>,
) -> ApiResult<PunchWriteResponse> {
    let note = body.and_then(|Json(b)| b.note);
    let employee_id = context.employee_id;

    // Any very recent punch counts as a double click here
    if let Some(recent) = last_recent(&state, employee_id).await? {
        return Ok(Json(PunchWriteResponse {
            ok: true,
            punch: recent,
            idempotent: true,
        }));
    }

    let last = db::punches::last_for_employee(&state.pool, employee_id)
        .await
        .map_err(internal)?;
    let last = match last {
        Some(p) if p.punch_type != PunchType::Out => p,
        _ => return Err(AppError::new(ErrorCode::PunchNotOpen)),
    };

    let punch_type = match last.punch_type {
        PunchType::In | PunchType::BreakEnd => PunchType::BreakStart,
        PunchType::BreakStart => PunchType::BreakEnd,
        PunchType::Out => return Err(AppError::new(ErrorCode::PunchStateInvalid)),
    };

    let punch = db::punches::insert(
        &state.pool,
        employee_id,
        punch_type,
        Utc::now(),
        note.as_deref(),
    )
    .await
    .map_err(internal)?;
    Ok(Json(PunchWriteResponse {
        ok: true,
        punch,
        idempotent: false,
    }))
}

/// POST /time-punch/end
///
/// Closes an open break together with the OUT, atomically.
pub async fn end(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    body: Option<Json<PunchRequest>>,
) -> ApiResult<PunchBatchResponse> {
    let note = body.and_then(|Json(b)| b.note);
    let employee_id = context.employee_id;

    if let Some(recent) = last_recent(&state, employee_id).await?
        && recent.punch_type == PunchType::Out
    {
        return Ok(Json(PunchBatchResponse {
            ok: true,
            punches: vec![recent],
        }));
    }

    let last = db::punches::last_for_employee(&state.pool, employee_id)
        .await
        .map_err(internal)?;
    let last = match last {
        Some(p) if p.punch_type != PunchType::Out => p,
        _ => return Err(AppError::new(ErrorCode::PunchNotOpen)),
    };

    let now = Utc::now();
    let batch: Vec<(PunchType, chrono::DateTime<Utc>)> =
        if last.punch_type == PunchType::BreakStart {
            vec![(PunchType::BreakEnd, now), (PunchType::Out, now)]
        } else {
            vec![(PunchType::Out, now)]
        };

    let punches = db::punches::insert_batch(&state.pool, employee_id, &batch, note.as_deref())
        .await
        .map_err(internal)?;
    Ok(Json(PunchBatchResponse { ok: true, punches }))
}

/// GET /time-punch/status
pub async fn status(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
) -> ApiResult<PunchStatus> {
    let last = db::punches::last_for_employee(&state.pool, context.employee_id)
        .await
        .map_err(internal)?;
    Ok(Json(PunchStatus {
        open: matches!(last, Some(ref p) if p.punch_type != PunchType::Out),
        paused: matches!(last, Some(ref p) if p.punch_type == PunchType::BreakStart),
        last_type: last.as_ref().map(|p| p.punch_type),
        last_at: last.as_ref().map(|p| p.punched_at),
    }))
}

// ── Read endpoints ──

#[derive(Deserialize)]
pub struct WindowQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub tz: Option<String>,
    pub employee_id: Option<i64>,
}

impl WindowQuery {
    fn timezone(&self, state: &AppState) -> Result<Tz, AppError> {
        match self.tz.as_deref() {
            None => Ok(state.default_timezone),
            Some(name) => name
                .parse()
                .map_err(|_| AppError::new(ErrorCode::TimezoneInvalid)),
        }
    }
}

async fn fetch_window(
    state: &AppState,
    context: &AuthContext,
    query: &WindowQuery,
) -> Result<(i64, Tz, Vec<TimePunch>), AppError> {
    if query.from > query.to {
        return Err(AppError::validation("'from' must not be after 'to'"));
    }
    let tz = query.timezone(state)?;
    let target = resolve_target_employee(state, context, query.employee_id).await?;

    let (start_utc, end_utc) = timeclock::local_window_utc(query.from, query.to, tz);
    let punches = db::punches::list_in_range(&state.pool, target.id, start_utc, end_utc)
        .await
        .map_err(internal)?;
    Ok((target.id, tz, punches))
}

#[derive(Serialize)]
pub struct SummaryResponse {
    pub employee_id: i64,
    #[serde(flatten)]
    pub summary: timeclock::PunchSummary,
}

/// GET /time-punch/summary?from&to&tz[&employee_id]
pub async fn summary(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Query(query): Query<WindowQuery>,
) -> ApiResult<SummaryResponse> {
    let (employee_id, tz, punches) = fetch_window(&state, &context, &query).await?;
    Ok(Json(SummaryResponse {
        employee_id,
        summary: timeclock::summarize(&punches, tz),
    }))
}

#[derive(Serialize)]
pub struct PunchListEntry {
    pub id: i64,
    pub employee_id: i64,
    pub punch_type: PunchType,
    pub punched_at_utc: chrono::DateTime<Utc>,
    pub punched_at_local: chrono::DateTime<Tz>,
    pub note: Option<String>,
}

#[derive(Serialize)]
pub struct PunchListResponse {
    pub employee_id: i64,
    pub tz: String,
    pub punches: Vec<PunchListEntry>,
}

/// GET /time-punch/list?from&to&tz[&employee_id]: raw events
pub async fn list(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Query(query): Query<WindowQuery>,
) -> ApiResult<PunchListResponse> {
    let (employee_id, tz, punches) = fetch_window(&state, &context, &query).await?;
    let entries = punches
        .into_iter()
        .map(|p| PunchListEntry {
            id: p.id,
            employee_id: p.employee_id,
            punch_type: p.punch_type,
            punched_at_utc: p.punched_at,
            punched_at_local: p.punched_at.with_timezone(&tz),
            note: p.note,
        })
        .collect();
    Ok(Json(PunchListResponse {
        employee_id,
        tz: tz.name().to_string(),
        punches: entries,
    }))
}
