//! Employee database operations

use shared::models::{Employee, EmployeeUpdate};
use shared::util::now_millis;
use sqlx::PgPool;

use super::BoxError;

/// Columns exposed through the API (password hash excluded)
const EMPLOYEE_COLUMNS: &str = "id, company_id, first_name, last_name, national_id, email, \
     role_id, birth_date, address, phone, hire_date, image_url, created_at, updated_at";

/// Login/auth projection, including the hash and role name
#[derive(sqlx::FromRow)]
pub struct EmployeeAuthRow {
    pub id: i64,
    pub company_id: i64,
    pub password_hash: String,
    pub role_id: i64,
    pub role_name: String,
}

pub async fn find_by_email_for_login(
    pool: &PgPool,
    email: &str,
) -> Result<Option<EmployeeAuthRow>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT e.id, e.company_id, e.password_hash, e.role_id, r.name AS role_name
        FROM employees e
        JOIN roles r ON r.id = e.role_id
        WHERE e.email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await
}

pub async fn find_auth_info(
    pool: &PgPool,
    id: i64,
) -> Result<Option<EmployeeAuthRow>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT e.id, e.company_id, e.password_hash, e.role_id, r.name AS role_name
        FROM employees e
        JOIN roles r ON r.id = e.role_id
        WHERE e.id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn list_all(pool: &PgPool) -> Result<Vec<Employee>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {EMPLOYEE_COLUMNS} FROM employees ORDER BY id"
    ))
    .fetch_all(pool)
    .await
}

pub async fn list_by_company(
    pool: &PgPool,
    company_id: i64,
) -> Result<Vec<Employee>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE company_id = $1 ORDER BY id"
    ))
    .bind(company_id)
    .fetch_all(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Employee>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn email_exists(
    pool: &PgPool,
    email: &str,
    exclude_id: Option<i64>,
) -> Result<bool, sqlx::Error> {
    let row: Option<(i64,)> =
        sqlx::query_as("SELECT id FROM employees WHERE email = $1 AND id IS DISTINCT FROM $2")
            .bind(email)
            .bind(exclude_id)
            .fetch_optional(pool)
            .await?;
    Ok(row.is_some())
}

pub async fn national_id_exists(
    pool: &PgPool,
    national_id: &str,
    exclude_id: Option<i64>,
) -> Result<bool, sqlx::Error> {
    let row: Option<(i64,)> = sqlx::query_as(
        "SELECT id FROM employees WHERE national_id = $1 AND id IS DISTINCT FROM $2",
    )
    .bind(national_id)
    .bind(exclude_id)
    .fetch_optional(pool)
    .await?;
    Ok(row.is_some())
}

/// Insert an employee; the password is already hashed by the caller.
pub async fn create(
    pool: &PgPool,
    company_id: i64,
    data: &shared::models::EmployeeCreate,
    password_hash: &str,
) -> Result<Employee, sqlx::Error> {
    let now = now_millis();
    sqlx::query_as(&format!(
        r#"
        INSERT INTO employees (
            company_id, first_name, last_name, national_id, email,
            password_hash, role_id, birth_date, address, phone,
            hire_date, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $12)
        RETURNING {EMPLOYEE_COLUMNS}
        "#
    ))
    .bind(company_id)
    .bind(&data.first_name)
    .bind(&data.last_name)
    .bind(&data.national_id)
    .bind(&data.email)
    .bind(password_hash)
    .bind(data.role_id)
    .bind(data.birth_date)
    .bind(&data.address)
    .bind(&data.phone)
    .bind(data.hire_date)
    .bind(now)
    .fetch_one(pool)
    .await
}

/// Partial update; `password_hash` is Some only when the password
/// changes.
pub async fn update(
    pool: &PgPool,
    id: i64,
    data: &EmployeeUpdate,
    password_hash: Option<String>,
) -> Result<Option<Employee>, sqlx::Error> {
    sqlx::query_as(&format!(
        r#"
        UPDATE employees SET
            first_name = COALESCE($1, first_name),
            last_name = COALESCE($2, last_name),
            national_id = COALESCE($3, national_id),
            email = COALESCE($4, email),
            password_hash = COALESCE($5, password_hash),
            role_id = COALESCE($6, role_id),
            birth_date = COALESCE($7, birth_date),
            address = COALESCE($8, address),
            phone = COALESCE($9, phone),
            hire_date = COALESCE($10, hire_date),
            image_url = COALESCE($11, image_url),
            updated_at = $12
        WHERE id = $13
        RETURNING {EMPLOYEE_COLUMNS}
        "#
    ))
    .bind(&data.first_name)
    .bind(&data.last_name)
    .bind(&data.national_id)
    .bind(&data.email)
    .bind(&password_hash)
    .bind(data.role_id)
    .bind(data.birth_date)
    .bind(&data.address)
    .bind(&data.phone)
    .bind(data.hire_date)
    .bind(&data.image_url)
    .bind(now_millis())
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Delete an employee and every row that references them, child
/// tables first, in one transaction. Approver references on other
/// employees' holidays go NULL via the FK policy.
pub async fn delete_cascade(pool: &PgPool, id: i64) -> Result<bool, BoxError> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        "DELETE FROM shift_exceptions WHERE series_id IN
             (SELECT id FROM shift_series WHERE employee_id = $1)",
    )
    .bind(id)
    .execute(&mut *tx)
    .await?;

    for table in [
        "time_punches",
        "shift_series",
        "shifts",
        "holidays",
        "vacation_balances",
        "payrolls",
        "suggestions",
        "refresh_tokens",
    ] {
        sqlx::query(&format!("DELETE FROM {table} WHERE employee_id = $1"))
            .bind(id)
            .execute(&mut *tx)
            .await?;
    }

    let rows = sqlx::query("DELETE FROM employees WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(rows.rows_affected() > 0)
}
