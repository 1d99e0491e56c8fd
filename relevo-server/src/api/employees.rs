//! Employee endpoints

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use shared::error::{AppError, ErrorCode};
use shared::models::{Employee, EmployeeCreate, EmployeeUpdate, SystemRole};

use crate::auth::AuthContext;
use crate::db;
use crate::email;
use crate::state::AppState;
use crate::util::hash_password;

use super::{ApiResult, internal, load_employee_visible};

pub async fn list(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
) -> ApiResult<Vec<Employee>> {
    let employees = if context.role.is_owner() {
        db::employees::list_all(&state.pool).await.map_err(internal)?
    } else if context.role.is_admin_or_hr() {
        db::employees::list_by_company(&state.pool, context.company_id)
            .await
            .map_err(internal)?
    } else {
        // Plain employees only see themselves
        let own = db::employees::find_by_id(&state.pool, context.employee_id)
            .await
            .map_err(internal)?
            .ok_or_else(|| AppError::new(ErrorCode::EmployeeNotFound))?;
        vec![own]
    };
    Ok(Json(employees))
}

pub async fn get_one(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<Employee> {
    let employee = load_employee_visible(&state, &context, id).await?;
    Ok(Json(employee))
}

/// POST /employees: admin/HR within their company; owner anywhere.
pub async fn create(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Json(data): Json<EmployeeCreate>,
) -> ApiResult<Employee> {
    if !context.role.is_admin_or_hr() {
        return Err(AppError::new(ErrorCode::AdminRequired));
    }
    let company_id = if context.role.is_owner() {
        data.company_id
    } else {
        context.company_id
    };

    let employee = insert_employee(&state, company_id, &data).await?;
    Ok(Json(employee))
}

/// POST /employees/register: public self-registration into an
/// existing company.
pub async fn register(
    State(state): State<AppState>,
    Json(data): Json<EmployeeCreate>,
) -> ApiResult<Employee> {
    let employee = insert_employee(&state, data.company_id, &data).await?;
    Ok(Json(employee))
}

async fn insert_employee(
    state: &AppState,
    company_id: i64,
    data: &EmployeeCreate,
) -> Result<Employee, AppError> {
    if data.first_name.trim().is_empty()
        || data.last_name.trim().is_empty()
        || data.national_id.trim().is_empty()
    {
        return Err(AppError::validation(
            "first_name, last_name and national_id are required",
        ));
    }
    if data.password.len() < 8 {
        return Err(AppError::validation("password must be at least 8 characters"));
    }
    let email_addr = data.email.trim().to_lowercase();
    if !email_addr.contains('@') {
        return Err(AppError::validation("email is not valid"));
    }

    let company = db::companies::find_by_id(&state.pool, company_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::CompanyNotFound))?;

    let role = db::roles::find_by_id(&state.pool, data.role_id)
        .await
        .map_err(internal)?
        .filter(|r| r.company_id == company_id)
        .ok_or_else(|| AppError::new(ErrorCode::RoleNotFound))?;

    if db::employees::email_exists(&state.pool, &email_addr, None)
        .await
        .map_err(internal)?
    {
        return Err(AppError::new(ErrorCode::EmailExists));
    }
    if db::employees::national_id_exists(&state.pool, &data.national_id, None)
        .await
        .map_err(internal)?
    {
        return Err(AppError::new(ErrorCode::NationalIdExists));
    }

    let password_hash =
        hash_password(&data.password).map_err(|e| internal(format!("hash failed: {e}")))?;

    let mut payload = data.clone();
    payload.email = email_addr;
    payload.role_id = role.id;
    let employee = db::employees::create(&state.pool, company_id, &payload, &password_hash)
        .await
        .map_err(internal)?;

    // Best-effort welcome email; the account exists either way.
    if let Err(e) = email::send_welcome(
        &state.ses,
        &state.ses_from_email,
        &employee.email,
        &employee.first_name,
        &company.name,
    )
    .await
    {
        tracing::warn!(email = %employee.email, "Welcome email failed: {e}");
    }

    Ok(employee)
}

pub async fn update(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Path(id): Path<i64>,
    Json(data): Json<EmployeeUpdate>,
) -> ApiResult<Employee> {
    let target = load_employee_visible(&state, &context, id).await?;
    if !context.can_manage(target.id, target.company_id) {
        return Err(AppError::new(ErrorCode::EmployeeNotFound));
    }
    // Role changes are an admin concern even on one's own profile
    if data.role_id.is_some()
        && !context.role.is_admin_or_hr()
    {
        return Err(AppError::new(ErrorCode::AdminRequired));
    }

    if let Some(ref email_addr) = data.email
        && db::employees::email_exists(&state.pool, email_addr, Some(id))
            .await
            .map_err(internal)?
    {
        return Err(AppError::new(ErrorCode::EmailExists));
    }
    if let Some(ref national_id) = data.national_id
        && db::employees::national_id_exists(&state.pool, national_id, Some(id))
            .await
            .map_err(internal)?
    {
        return Err(AppError::new(ErrorCode::NationalIdExists));
    }
    if let Some(role_id) = data.role_id {
        db::roles::find_by_id(&state.pool, role_id)
            .await
            .map_err(internal)?
            .filter(|r| r.company_id == target.company_id)
            .ok_or_else(|| AppError::new(ErrorCode::RoleNotFound))?;
    }

    let password_hash = match data.password.as_deref() {
        Some(password) if password.len() < 8 => {
            return Err(AppError::validation("password must be at least 8 characters"));
        }
        Some(password) => {
            Some(hash_password(password).map_err(|e| internal(format!("hash failed: {e}")))?)
        }
        None => None,
    };

    let employee = db::employees::update(&state.pool, id, &data, password_hash)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::EmployeeNotFound))?;
    Ok(Json(employee))
}

/// DELETE /employees/{id}: owner may delete anyone except an
/// OWNERDB account; admin/HR within their company.
pub async fn delete_one(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<serde_json::Value> {
    let target = load_employee_visible(&state, &context, id).await?;

    if !context.role.is_admin_or_hr() {
        return Err(AppError::new(ErrorCode::AdminRequired));
    }

    // The platform owner account must never disappear, not even by
    // its own hand.
    let target_auth = db::employees::find_auth_info(&state.pool, target.id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::EmployeeNotFound))?;
    if SystemRole::infer_from_role_name(&target_auth.role_name).is_owner() {
        return Err(AppError::new(ErrorCode::CannotDeleteOwner));
    }

    let deleted = db::employees::delete_cascade(&state.pool, id)
        .await
        .map_err(internal)?;
    if !deleted {
        return Err(AppError::new(ErrorCode::EmployeeNotFound));
    }
    Ok(Json(
        serde_json::json!({ "message": format!("Employee id={id} deleted") }),
    ))
}
