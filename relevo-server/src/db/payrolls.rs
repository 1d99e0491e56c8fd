//! Payroll database operations

use shared::models::{Payroll, PayrollListItem};
use shared::util::now_millis;
use sqlx::PgPool;

/// Insert or replace the document for one (employee, year, month)
/// period. Returns the row plus the storage key of any replaced
/// document so the caller can clean it up.
pub async fn upsert_for_period(
    pool: &PgPool,
    company_id: i64,
    employee_id: i64,
    period_year: i32,
    period_month: i32,
    storage_key: &str,
    file_url: Option<&str>,
    byte_size: i64,
    original_filename: &str,
) -> Result<(Payroll, Option<String>), sqlx::Error> {
    let now = now_millis();
    let mut tx = pool.begin().await?;

    let previous: Option<(String,)> = sqlx::query_as(
        r#"
        SELECT storage_key FROM payrolls
        WHERE employee_id = $1 AND period_year = $2 AND period_month = $3
        "#,
    )
    .bind(employee_id)
    .bind(period_year)
    .bind(period_month)
    .fetch_optional(&mut *tx)
    .await?;

    let payroll: Payroll = sqlx::query_as(
        r#"
        INSERT INTO payrolls (
            company_id, employee_id, period_year, period_month,
            storage_key, file_url, byte_size, original_filename,
            created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
        ON CONFLICT (employee_id, period_year, period_month)
        DO UPDATE SET
            storage_key = EXCLUDED.storage_key,
            file_url = EXCLUDED.file_url,
            byte_size = EXCLUDED.byte_size,
            original_filename = EXCLUDED.original_filename,
            updated_at = EXCLUDED.updated_at
        RETURNING *
        "#,
    )
    .bind(company_id)
    .bind(employee_id)
    .bind(period_year)
    .bind(period_month)
    .bind(storage_key)
    .bind(file_url)
    .bind(byte_size)
    .bind(original_filename)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    let replaced = previous
        .map(|(key,)| key)
        .filter(|key| key != storage_key);
    Ok((payroll, replaced))
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Payroll>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM payrolls WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// One page of payrolls plus the total row count, newest period first.
pub async fn list_page(
    pool: &PgPool,
    company_id: i64,
    employee_id: Option<i64>,
    limit: i64,
    offset: i64,
) -> Result<(Vec<PayrollListItem>, i64), sqlx::Error> {
    let items: Vec<PayrollListItem> = sqlx::query_as(
        r#"
        SELECT p.id, p.company_id, p.employee_id, p.period_year,
               p.period_month, p.byte_size, p.original_filename,
               TRIM(e.first_name || ' ' || e.last_name) AS employee_name
        FROM payrolls p
        JOIN employees e ON e.id = p.employee_id
        WHERE p.company_id = $1
          AND ($2::BIGINT IS NULL OR p.employee_id = $2)
        ORDER BY p.period_year DESC, p.period_month DESC, p.id DESC
        LIMIT $3 OFFSET $4
        "#,
    )
    .bind(company_id)
    .bind(employee_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let total: (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*) FROM payrolls
        WHERE company_id = $1 AND ($2::BIGINT IS NULL OR employee_id = $2)
        "#,
    )
    .bind(company_id)
    .bind(employee_id)
    .fetch_one(pool)
    .await?;

    Ok((items, total.0))
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let rows = sqlx::query("DELETE FROM payrolls WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
