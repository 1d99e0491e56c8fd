//! Explicit shift database operations

use chrono::NaiveDate;
use shared::models::{Shift, ShiftCreate, ShiftStatus, ShiftUpdate};
use shared::util::now_millis;
use sqlx::PgPool;

pub async fn list_for_employee_window(
    pool: &PgPool,
    employee_id: i64,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<Shift>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT * FROM shifts
        WHERE employee_id = $1 AND shift_date BETWEEN $2 AND $3
        ORDER BY shift_date, start_time
        "#,
    )
    .bind(employee_id)
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await
}

/// Other explicit shifts on the same employee/date, for overlap
/// checks at write time.
pub async fn list_same_day(
    pool: &PgPool,
    employee_id: i64,
    date: NaiveDate,
    exclude_id: Option<i64>,
) -> Result<Vec<Shift>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT * FROM shifts
        WHERE employee_id = $1 AND shift_date = $2 AND id IS DISTINCT FROM $3
        "#,
    )
    .bind(employee_id)
    .bind(date)
    .bind(exclude_id)
    .fetch_all(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Shift>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM shifts WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create(
    pool: &PgPool,
    company_id: i64,
    data: &ShiftCreate,
) -> Result<Shift, sqlx::Error> {
    let now = now_millis();
    sqlx::query_as(
        r#"
        INSERT INTO shifts (
            company_id, employee_id, shift_date, start_time, end_time,
            shift_type_id, status, notes, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
        RETURNING *
        "#,
    )
    .bind(company_id)
    .bind(data.employee_id)
    .bind(data.shift_date)
    .bind(data.start_time)
    .bind(data.end_time)
    .bind(data.shift_type_id)
    .bind(data.status.unwrap_or(ShiftStatus::Planned))
    .bind(&data.notes)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    id: i64,
    data: &ShiftUpdate,
) -> Result<Option<Shift>, sqlx::Error> {
    sqlx::query_as(
        r#"
        UPDATE shifts SET
            shift_date = COALESCE($1, shift_date),
            start_time = COALESCE($2, start_time),
            end_time = COALESCE($3, end_time),
            shift_type_id = COALESCE($4, shift_type_id),
            status = COALESCE($5, status),
            notes = COALESCE($6, notes),
            updated_at = $7
        WHERE id = $8
        RETURNING *
        "#,
    )
    .bind(data.shift_date)
    .bind(data.start_time)
    .bind(data.end_time)
    .bind(data.shift_type_id)
    .bind(data.status)
    .bind(&data.notes)
    .bind(now_millis())
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let rows = sqlx::query("DELETE FROM shifts WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
