//! Payroll endpoints: multipart PDF upload to S3, presigned download
//!
//! Documents live at
//! `payrolls/company_{company_id}/employee_{employee_id}/{period}/{uuid}.pdf`.

use axum::{
    Extension, Json,
    extract::{Multipart, Path, Query, State},
    response::Redirect,
};
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{Payroll, PayrollPage};

use crate::auth::AuthContext;
use crate::db;
use crate::email;
use crate::state::AppState;

use super::{ApiResult, internal, load_employee_visible};

/// Maximum upload size (10MB)
const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Presigned download URL lifetime
const DOWNLOAD_URL_TTL_SECS: u64 = 600;

fn s3_payroll_key(company_id: i64, employee_id: i64, year: i32, month: i32) -> String {
    let period = format!("{year:04}-{month:02}");
    let id = uuid::Uuid::new_v4();
    format!("payrolls/company_{company_id}/employee_{employee_id}/{period}/{id}.pdf")
}

#[derive(Default)]
struct UploadForm {
    employee_id: Option<i64>,
    period_year: Option<i32>,
    period_month: Option<i32>,
    file: Option<(String, Vec<u8>)>,
}

async fn read_multipart(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::with_message(ErrorCode::InvalidRequest, format!("Multipart error: {e}"))
    })? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "employee_id" => {
                let text = field.text().await.map_err(|e| read_err(&name, e))?;
                form.employee_id = text.trim().parse().ok();
            }
            // The frontend sends month/year; period_* also accepted
            "period_year" | "year" => {
                let text = field.text().await.map_err(|e| read_err(&name, e))?;
                form.period_year = text.trim().parse().ok();
            }
            "period_month" | "month" => {
                let text = field.text().await.map_err(|e| read_err(&name, e))?;
                form.period_month = text.trim().parse().ok();
            }
            "file" => {
                let filename = field.file_name().unwrap_or("payroll.pdf").to_string();
                let data = field.bytes().await.map_err(|e| read_err("file", e))?;
                form.file = Some((filename, data.to_vec()));
            }
            _ => {}
        }
    }

    Ok(form)
}

fn read_err(field: &str, e: impl std::fmt::Display) -> AppError {
    AppError::with_message(
        ErrorCode::InvalidRequest,
        format!("Failed to read field {field}: {e}"),
    )
}

/// POST /payrolls: admin/HR upload
pub async fn upload(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    multipart: Multipart,
) -> ApiResult<Payroll> {
    if !context.role.is_admin_or_hr() {
        return Err(AppError::new(ErrorCode::AdminRequired));
    }

    let form = read_multipart(multipart).await?;
    let (Some(employee_id), Some(year), Some(month), Some((filename, data))) = (
        form.employee_id,
        form.period_year,
        form.period_month,
        form.file,
    ) else {
        return Err(AppError::validation(
            "employee_id, month/year and file are required",
        ));
    };

    if !(1..=12).contains(&month) {
        return Err(AppError::new(ErrorCode::PayrollPeriodInvalid));
    }
    if !filename.to_lowercase().ends_with(".pdf") {
        return Err(AppError::new(ErrorCode::PayrollNotPdf));
    }
    if data.is_empty() {
        return Err(AppError::validation("Empty file"));
    }
    if data.len() > MAX_FILE_SIZE {
        return Err(AppError::validation(format!(
            "File too large: {} bytes (max {MAX_FILE_SIZE})",
            data.len()
        )));
    }

    let target = load_employee_visible(&state, &context, employee_id).await?;

    let key = s3_payroll_key(target.company_id, target.id, year, month);
    let byte_size = data.len() as i64;

    state
        .s3
        .put_object()
        .bucket(&state.payroll_bucket)
        .key(&key)
        .body(data.into())
        .content_type("application/pdf")
        .send()
        .await
        .map_err(|e| {
            tracing::error!(key = %key, error = %e, "S3 upload failed");
            AppError::new(ErrorCode::StorageError)
        })?;

    let (payroll, replaced_key) = db::payrolls::upsert_for_period(
        &state.pool,
        target.company_id,
        target.id,
        year,
        month,
        &key,
        None,
        byte_size,
        &filename,
    )
    .await
    .map_err(internal)?;

    // Replacing a period leaves the old object orphaned; clean it up
    // best-effort.
    if let Some(old_key) = replaced_key
        && let Err(e) = state
            .s3
            .delete_object()
            .bucket(&state.payroll_bucket)
            .key(&old_key)
            .send()
            .await
    {
        tracing::warn!(key = %old_key, "Failed to delete replaced payroll object: {e}");
    }

    // Best-effort notification; the upload already succeeded.
    if let Err(e) = email::send_payroll_uploaded(
        &state.ses,
        &state.ses_from_email,
        &target.email,
        year,
        month,
    )
    .await
    {
        tracing::warn!(email = %target.email, "Payroll notification failed: {e}");
    }

    Ok(Json(payroll))
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub page: Option<i64>,
    pub employee_id: Option<i64>,
}

/// GET /payrolls?limit&page[&employee_id]
///
/// Admin/HR see the whole company and may filter; employees are
/// forced to their own rows.
pub async fn list(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Query(query): Query<ListQuery>,
) -> ApiResult<PayrollPage> {
    let limit = query.limit.unwrap_or(10).clamp(1, 100);
    let page = query.page.unwrap_or(1).max(1);

    let employee_filter = if context.role.is_admin_or_hr() {
        query.employee_id
    } else {
        Some(context.employee_id)
    };

    let (items, total) = db::payrolls::list_page(
        &state.pool,
        context.company_id,
        employee_filter,
        limit,
        (page - 1) * limit,
    )
    .await
    .map_err(internal)?;

    Ok(Json(PayrollPage {
        items,
        total_pages: (total + limit - 1) / limit,
    }))
}

async fn load_visible(
    state: &AppState,
    context: &AuthContext,
    id: i64,
) -> Result<Payroll, AppError> {
    let payroll = db::payrolls::find_by_id(&state.pool, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::PayrollNotFound))?;

    let visible = context.role.is_owner()
        || (payroll.company_id == context.company_id
            && (context.role.is_admin_or_hr() || payroll.employee_id == context.employee_id));
    if !visible {
        return Err(AppError::new(ErrorCode::PayrollNotFound));
    }
    Ok(payroll)
}

/// GET /payrolls/{id}/download: 302 to a time-limited signed URL
pub async fn download(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> Result<Redirect, AppError> {
    use aws_sdk_s3::presigning::PresigningConfig;
    use std::time::Duration;

    let payroll = load_visible(&state, &context, id).await?;
    if payroll.storage_key.is_empty() {
        return Err(AppError::new(ErrorCode::PayrollFileMissing));
    }

    let filename = format!(
        "payroll_{}-{:02}.pdf",
        payroll.period_year, payroll.period_month
    );
    let presigning = PresigningConfig::expires_in(Duration::from_secs(DOWNLOAD_URL_TTL_SECS))
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to create presigning config");
            AppError::new(ErrorCode::InternalError)
        })?;

    let presigned = state
        .s3
        .get_object()
        .bucket(&state.payroll_bucket)
        .key(&payroll.storage_key)
        .response_content_disposition(format!("attachment; filename=\"{filename}\""))
        .presigned(presigning)
        .await
        .map_err(|e| {
            tracing::error!(key = %payroll.storage_key, error = %e, "Presign failed");
            AppError::new(ErrorCode::StorageError)
        })?;

    Ok(Redirect::temporary(presigned.uri()))
}

/// DELETE /payrolls/{id}: admin/HR; S3 cleanup is best-effort
pub async fn delete_one(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<serde_json::Value> {
    if !context.role.is_admin_or_hr() {
        return Err(AppError::new(ErrorCode::AdminRequired));
    }
    let payroll = load_visible(&state, &context, id).await?;

    if let Err(e) = state
        .s3
        .delete_object()
        .bucket(&state.payroll_bucket)
        .key(&payroll.storage_key)
        .send()
        .await
    {
        tracing::warn!(key = %payroll.storage_key, "Failed to delete payroll object: {e}");
    }

    db::payrolls::delete(&state.pool, id)
        .await
        .map_err(internal)?;
    Ok(Json(serde_json::json!({ "message": "Payroll deleted" })))
}
