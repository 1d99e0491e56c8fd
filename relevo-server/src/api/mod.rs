//! API routes for relevo-server

pub mod auth;
pub mod companies;
pub mod employees;
pub mod health;
pub mod holidays;
pub mod payrolls;
pub mod punch;
pub mod roles;
pub mod salaries;
pub mod series;
pub mod shift_types;
pub mod shifts;
pub mod suggestions;

use axum::routing::{delete, get, post, put};
use axum::{Router, middleware};
use shared::error::{AppError, ErrorCode};
use shared::models::Employee;
use tower_http::trace::TraceLayer;

use crate::auth::jwt::{AuthContext, auth_middleware};
use crate::auth::rate_limit::{login_rate_limit, register_rate_limit};
use crate::db;
use crate::state::AppState;

pub type ApiResult<T> = Result<axum::Json<T>, AppError>;

/// Map infrastructure errors to an opaque 500.
pub(crate) fn internal(e: impl std::fmt::Display) -> AppError {
    tracing::error!("Internal error: {e}");
    AppError::new(ErrorCode::InternalError)
}

/// Load an employee visible to the caller, or 404. Cross-tenant rows
/// are reported exactly like missing ones.
pub(crate) async fn load_employee_visible(
    state: &AppState,
    context: &AuthContext,
    employee_id: i64,
) -> Result<Employee, AppError> {
    let employee = db::employees::find_by_id(&state.pool, employee_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::EmployeeNotFound))?;

    if !context.role.is_owner() && employee.company_id != context.company_id {
        return Err(AppError::new(ErrorCode::EmployeeNotFound));
    }
    Ok(employee)
}

/// Resolve the employee a read/write targets: the caller by default,
/// or `requested` for admin/HR (own company) and the owner (anyone).
pub(crate) async fn resolve_target_employee(
    state: &AppState,
    context: &AuthContext,
    requested: Option<i64>,
) -> Result<Employee, AppError> {
    let target_id = match requested {
        Some(id) if id != context.employee_id => {
            if !context.role.is_admin_or_hr() {
                return Err(AppError::new(ErrorCode::PermissionDenied));
            }
            id
        }
        _ => context.employee_id,
    };
    load_employee_visible(state, context, target_id).await
}

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    // Public: health, login/refresh, self-registration
    let login = Router::new()
        .route("/auth/login", post(auth::login))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            login_rate_limit,
        ));

    let register = Router::new()
        .route("/employees/register", post(employees::register))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            register_rate_limit,
        ));

    let public = Router::new()
        .route("/health", get(health::health_check))
        .route("/auth/refresh", post(auth::refresh))
        .merge(login)
        .merge(register);

    // Everything else requires a bearer token
    let protected = Router::new()
        // Companies
        .route("/companies", get(companies::list).post(companies::create))
        .route(
            "/companies/{id}",
            get(companies::get_one)
                .put(companies::update)
                .delete(companies::delete_one),
        )
        // Employees
        .route("/employees", get(employees::list).post(employees::create))
        .route(
            "/employees/{id}",
            get(employees::get_one)
                .put(employees::update)
                .delete(employees::delete_one),
        )
        // Roles and salaries
        .route("/roles", get(roles::list).post(roles::create))
        .route(
            "/roles/{id}",
            get(roles::get_one).put(roles::update).delete(roles::delete_one),
        )
        .route("/salaries", get(salaries::list).post(salaries::create))
        .route(
            "/salaries/{id}",
            get(salaries::get_one)
                .put(salaries::update)
                .delete(salaries::delete_one),
        )
        // Shift type catalog
        .route(
            "/shifts/types",
            get(shift_types::list).post(shift_types::create),
        )
        .route(
            "/shifts/types/{id}",
            put(shift_types::update).delete(shift_types::delete_one),
        )
        // Recurring series and exceptions
        .route("/shifts/series", post(series::create))
        .route(
            "/shifts/series/{id}",
            put(series::update).delete(series::delete_one),
        )
        .route(
            "/shifts/series/{id}/exceptions",
            post(series::upsert_exception),
        )
        .route(
            "/shifts/series/{id}/exceptions/{date}",
            delete(series::delete_exception),
        )
        // Shifts (merged listing + CRUD)
        .route("/shifts", get(shifts::list).post(shifts::create))
        .route(
            "/shifts/{id}",
            get(shifts::get_one).put(shifts::update).delete(shifts::delete_one),
        )
        // Holidays and balances
        .route("/holidays", get(holidays::list).post(holidays::create))
        .route("/holidays/balance/me", get(holidays::my_balance))
        .route("/holidays/balance/allocate", put(holidays::allocate))
        .route(
            "/holidays/{id}",
            get(holidays::get_one)
                .put(holidays::update)
                .delete(holidays::delete_one),
        )
        .route("/holidays/{id}/approve", post(holidays::approve))
        .route("/holidays/{id}/reject", post(holidays::reject))
        // Time clock
        .route("/time-punch/start", post(punch::start))
        .route("/time-punch/pause-toggle", post(punch::pause_toggle))
        .route("/time-punch/end", post(punch::end))
        .route("/time-punch/status", get(punch::status))
        .route("/time-punch/summary", get(punch::summary))
        .route("/time-punch/list", get(punch::list))
        // Payrolls
        .route("/payrolls", get(payrolls::list).post(payrolls::upload))
        .route("/payrolls/{id}/download", get(payrolls::download))
        .route("/payrolls/{id}", delete(payrolls::delete_one))
        // Suggestions
        .route(
            "/suggestions",
            get(suggestions::list).post(suggestions::create),
        )
        .route(
            "/suggestions/{id}",
            get(suggestions::get_one)
                .put(suggestions::update)
                .delete(suggestions::delete_one),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
