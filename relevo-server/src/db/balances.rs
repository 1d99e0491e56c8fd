//! Vacation balance database operations

use shared::models::{DEFAULT_ALLOCATED_DAYS, VacationBalance};
use shared::util::now_millis;
use sqlx::PgPool;

/// Fetch the (employee, year) balance, creating it with the default
/// allocation when absent. The unique constraint makes concurrent
/// creation collapse onto one row.
pub async fn get_or_create(
    pool: &PgPool,
    company_id: i64,
    employee_id: i64,
    year: i32,
) -> Result<VacationBalance, sqlx::Error> {
    let now = now_millis();
    sqlx::query_as(
        r#"
        INSERT INTO vacation_balances (
            company_id, employee_id, year, allocated_days, used_days,
            created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, 0, $5, $5)
        ON CONFLICT (employee_id, year)
        DO UPDATE SET employee_id = EXCLUDED.employee_id
        RETURNING *
        "#,
    )
    .bind(company_id)
    .bind(employee_id)
    .bind(year)
    .bind(DEFAULT_ALLOCATED_DAYS)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn set_allocation(
    pool: &PgPool,
    balance_id: i64,
    allocated_days: i32,
) -> Result<VacationBalance, sqlx::Error> {
    sqlx::query_as(
        r#"
        UPDATE vacation_balances SET allocated_days = $1, updated_at = $2
        WHERE id = $3
        RETURNING *
        "#,
    )
    .bind(allocated_days)
    .bind(now_millis())
    .bind(balance_id)
    .fetch_one(pool)
    .await
}
