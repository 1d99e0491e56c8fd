//! Holiday request database operations

use chrono::{NaiveDate, Utc};
use shared::models::{Holiday, HolidayStatus};
use shared::util::now_millis;
use sqlx::PgPool;

/// Listing filters; None = no constraint on that column.
#[derive(Debug, Default, Clone, Copy)]
pub struct HolidayFilter {
    pub company_id: Option<i64>,
    pub employee_id: Option<i64>,
    pub status: Option<HolidayStatus>,
}

pub async fn list(pool: &PgPool, filter: HolidayFilter) -> Result<Vec<Holiday>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT * FROM holidays
        WHERE ($1::BIGINT IS NULL OR company_id = $1)
          AND ($2::BIGINT IS NULL OR employee_id = $2)
          AND ($3::TEXT IS NULL OR status = $3)
        ORDER BY start_date DESC, id DESC
        "#,
    )
    .bind(filter.company_id)
    .bind(filter.employee_id)
    .bind(filter.status)
    .fetch_all(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Holiday>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM holidays WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// True when `[start, end]` intersects another PENDING or APPROVED
/// request of the same employee.
pub async fn overlap_exists(
    pool: &PgPool,
    company_id: i64,
    employee_id: i64,
    start: NaiveDate,
    end: NaiveDate,
    exclude_id: Option<i64>,
) -> Result<bool, sqlx::Error> {
    let row: Option<(i64,)> = sqlx::query_as(
        r#"
        SELECT id FROM holidays
        WHERE company_id = $1
          AND employee_id = $2
          AND status IN ('PENDING', 'APPROVED')
          AND start_date <= $4
          AND end_date >= $3
          AND id IS DISTINCT FROM $5
        LIMIT 1
        "#,
    )
    .bind(company_id)
    .bind(employee_id)
    .bind(start)
    .bind(end)
    .bind(exclude_id)
    .fetch_optional(pool)
    .await?;
    Ok(row.is_some())
}

/// Sum of requested_days over the employee's other PENDING requests
/// falling inside `year`.
pub async fn pending_days_sum(
    pool: &PgPool,
    company_id: i64,
    employee_id: i64,
    year: i32,
    exclude_id: Option<i64>,
) -> Result<i32, sqlx::Error> {
    let year_start = NaiveDate::from_ymd_opt(year, 1, 1).expect("valid year start");
    let year_end = NaiveDate::from_ymd_opt(year, 12, 31).expect("valid year end");
    let row: (Option<i64>,) = sqlx::query_as(
        r#"
        SELECT SUM(requested_days) FROM holidays
        WHERE company_id = $1
          AND employee_id = $2
          AND status = 'PENDING'
          AND start_date >= $3
          AND end_date <= $4
          AND id IS DISTINCT FROM $5
        "#,
    )
    .bind(company_id)
    .bind(employee_id)
    .bind(year_start)
    .bind(year_end)
    .bind(exclude_id)
    .fetch_one(pool)
    .await?;
    Ok(row.0.unwrap_or(0) as i32)
}

pub async fn create(
    pool: &PgPool,
    company_id: i64,
    employee_id: i64,
    start: NaiveDate,
    end: NaiveDate,
    requested_days: i32,
    reason: Option<&str>,
) -> Result<Holiday, sqlx::Error> {
    let now = now_millis();
    sqlx::query_as(
        r#"
        INSERT INTO holidays (
            company_id, employee_id, start_date, end_date, status,
            requested_days, reason, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, 'PENDING', $5, $6, $7, $7)
        RETURNING *
        "#,
    )
    .bind(company_id)
    .bind(employee_id)
    .bind(start)
    .bind(end)
    .bind(requested_days)
    .bind(reason)
    .fetch_one(pool)
    .await
}

/// Rewrite dates/reason/status/requested_days after an edit.
pub async fn save_edit(pool: &PgPool, holiday: &Holiday) -> Result<Holiday, sqlx::Error> {
    sqlx::query_as(
        r#"
        UPDATE holidays SET
            start_date = $1,
            end_date = $2,
            status = $3,
            requested_days = $4,
            reason = $5,
            updated_at = $6
        WHERE id = $7
        RETURNING *
        "#,
    )
    .bind(holiday.start_date)
    .bind(holiday.end_date)
    .bind(holiday.status)
    .bind(holiday.requested_days)
    .bind(&holiday.reason)
    .bind(now_millis())
    .bind(holiday.id)
    .fetch_one(pool)
    .await
}

/// Approve in one transaction: stamp the decision and consume the
/// balance. The only path that mutates `used_days`.
pub async fn approve(
    pool: &PgPool,
    holiday_id: i64,
    balance_id: i64,
    requested_days: i32,
    approver_id: i64,
) -> Result<Holiday, sqlx::Error> {
    let now = now_millis();
    let mut tx = pool.begin().await?;

    let holiday: Holiday = sqlx::query_as(
        r#"
        UPDATE holidays SET
            status = 'APPROVED',
            requested_days = $1,
            approved_by = $2,
            approved_at = $3,
            updated_at = $4
        WHERE id = $5
        RETURNING *
        "#,
    )
    .bind(requested_days)
    .bind(approver_id)
    .bind(Utc::now())
    .bind(now)
    .bind(holiday_id)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        "UPDATE vacation_balances SET used_days = used_days + $1, updated_at = $2 WHERE id = $3",
    )
    .bind(requested_days)
    .bind(now)
    .bind(balance_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(holiday)
}

/// Reject: stamp the decision, leave the balance untouched.
pub async fn reject(
    pool: &PgPool,
    holiday_id: i64,
    approver_id: i64,
) -> Result<Holiday, sqlx::Error> {
    sqlx::query_as(
        r#"
        UPDATE holidays SET
            status = 'REJECTED',
            approved_by = $1,
            approved_at = $2,
            updated_at = $3
        WHERE id = $4
        RETURNING *
        "#,
    )
    .bind(approver_id)
    .bind(Utc::now())
    .bind(now_millis())
    .bind(holiday_id)
    .fetch_one(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let rows = sqlx::query("DELETE FROM holidays WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
