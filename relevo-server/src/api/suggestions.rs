//! Suggestion box endpoints

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use shared::error::{AppError, ErrorCode};
use shared::models::{MAX_CONTENT_LEN, Suggestion, SuggestionCreate, SuggestionUpdate};

use crate::auth::AuthContext;
use crate::db;
use crate::state::AppState;

use super::{ApiResult, internal};

fn validate_content(content: &str) -> Result<&str, AppError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("content is required"));
    }
    if trimmed.chars().count() > MAX_CONTENT_LEN {
        return Err(AppError::validation(format!(
            "content must be at most {MAX_CONTENT_LEN} characters"
        )));
    }
    Ok(trimmed)
}

/// GET /suggestions: admins see the company box, employees their own
pub async fn list(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
) -> ApiResult<Vec<Suggestion>> {
    let (company_filter, employee_filter) = if context.role.is_owner() {
        (None, None)
    } else if context.role.is_admin_or_hr() {
        (Some(context.company_id), None)
    } else {
        (Some(context.company_id), Some(context.employee_id))
    };

    let suggestions = db::suggestions::list(&state.pool, company_filter, employee_filter)
        .await
        .map_err(internal)?;
    Ok(Json(suggestions))
}

async fn load_visible(
    state: &AppState,
    context: &AuthContext,
    id: i64,
) -> Result<Suggestion, AppError> {
    let suggestion = db::suggestions::find_by_id(&state.pool, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::SuggestionNotFound))?;

    let visible = context.role.is_owner()
        || (suggestion.company_id == context.company_id
            && (context.role.is_admin_or_hr() || suggestion.employee_id == context.employee_id));
    if !visible {
        return Err(AppError::new(ErrorCode::SuggestionNotFound));
    }
    Ok(suggestion)
}

pub async fn get_one(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<Suggestion> {
    Ok(Json(load_visible(&state, &context, id).await?))
}

/// POST /suggestions: always filed under the caller's own identity
pub async fn create(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Json(data): Json<SuggestionCreate>,
) -> ApiResult<Suggestion> {
    let content = validate_content(&data.content)?;
    let suggestion = db::suggestions::create(
        &state.pool,
        context.company_id,
        context.employee_id,
        content,
    )
    .await
    .map_err(internal)?;
    Ok(Json(suggestion))
}

/// PUT /suggestions/{id}: authors edit their own; admins any in
/// their company.
pub async fn update(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Path(id): Path<i64>,
    Json(data): Json<SuggestionUpdate>,
) -> ApiResult<Suggestion> {
    let existing = load_visible(&state, &context, id).await?;
    if !context.role.is_admin_or_hr() && existing.employee_id != context.employee_id {
        return Err(AppError::new(ErrorCode::SuggestionNotFound));
    }

    let content = match data.content.as_deref() {
        Some(content) => validate_content(content)?,
        None => return Ok(Json(existing)),
    };

    let suggestion = db::suggestions::update_content(&state.pool, id, content)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::SuggestionNotFound))?;
    Ok(Json(suggestion))
}

pub async fn delete_one(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<serde_json::Value> {
    let existing = load_visible(&state, &context, id).await?;
    if !context.role.is_admin_or_hr() && existing.employee_id != context.employee_id {
        return Err(AppError::new(ErrorCode::SuggestionNotFound));
    }

    db::suggestions::delete(&state.pool, id)
        .await
        .map_err(internal)?;
    Ok(Json(
        serde_json::json!({ "message": format!("Suggestion id={id} deleted") }),
    ))
}
