//! Shift series and exception database operations

use chrono::NaiveDate;
use shared::models::{SeriesCreate, SeriesUpdate, ShiftException, ShiftSeries};
use shared::util::now_millis;
use sqlx::PgPool;

/// Active series whose validity window intersects `[from, to]`.
pub async fn list_active_intersecting(
    pool: &PgPool,
    employee_id: i64,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<ShiftSeries>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT * FROM shift_series
        WHERE employee_id = $1
          AND active
          AND start_date <= $3
          AND (end_date IS NULL OR end_date >= $2)
        ORDER BY id
        "#,
    )
    .bind(employee_id)
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<ShiftSeries>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM shift_series WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create(
    pool: &PgPool,
    company_id: i64,
    data: &SeriesCreate,
    timezone: &str,
) -> Result<ShiftSeries, sqlx::Error> {
    let now = now_millis();
    sqlx::query_as(
        r#"
        INSERT INTO shift_series (
            company_id, employee_id, shift_type_id, start_date, end_date,
            start_time, end_time, weekdays_mask, interval_weeks,
            timezone, notes, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $12)
        RETURNING *
        "#,
    )
    .bind(company_id)
    .bind(data.employee_id)
    .bind(data.shift_type_id)
    .bind(data.start_date)
    .bind(data.end_date)
    .bind(data.start_time)
    .bind(data.end_time)
    .bind(data.weekdays_mask)
    .bind(data.interval_weeks.unwrap_or(1))
    .bind(timezone)
    .bind(&data.notes)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    id: i64,
    data: &SeriesUpdate,
) -> Result<Option<ShiftSeries>, sqlx::Error> {
    sqlx::query_as(
        r#"
        UPDATE shift_series SET
            shift_type_id = COALESCE($1, shift_type_id),
            start_date = COALESCE($2, start_date),
            end_date = COALESCE($3, end_date),
            start_time = COALESCE($4, start_time),
            end_time = COALESCE($5, end_time),
            weekdays_mask = COALESCE($6, weekdays_mask),
            interval_weeks = COALESCE($7, interval_weeks),
            timezone = COALESCE($8, timezone),
            active = COALESCE($9, active),
            notes = COALESCE($10, notes),
            updated_at = $11
        WHERE id = $12
        RETURNING *
        "#,
    )
    .bind(data.shift_type_id)
    .bind(data.start_date)
    .bind(data.end_date)
    .bind(data.start_time)
    .bind(data.end_time)
    .bind(data.weekdays_mask)
    .bind(data.interval_weeks)
    .bind(&data.timezone)
    .bind(data.active)
    .bind(&data.notes)
    .bind(now_millis())
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Delete a series and its exceptions.
pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM shift_exceptions WHERE series_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    let rows = sqlx::query("DELETE FROM shift_series WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(rows.rows_affected() > 0)
}

// ── Exceptions ──

pub async fn list_exceptions_in_window(
    pool: &PgPool,
    series_id: i64,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<ShiftException>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT * FROM shift_exceptions
        WHERE series_id = $1 AND exception_date BETWEEN $2 AND $3
        "#,
    )
    .bind(series_id)
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await
}

/// Insert or replace the exception for (series, date).
pub async fn upsert_exception(
    pool: &PgPool,
    series_id: i64,
    data: &shared::models::ExceptionUpsert,
) -> Result<ShiftException, sqlx::Error> {
    let now = now_millis();
    sqlx::query_as(
        r#"
        INSERT INTO shift_exceptions (
            series_id, exception_date, action, start_time, end_time,
            shift_type_id, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
        ON CONFLICT (series_id, exception_date)
        DO UPDATE SET
            action = EXCLUDED.action,
            start_time = EXCLUDED.start_time,
            end_time = EXCLUDED.end_time,
            shift_type_id = EXCLUDED.shift_type_id,
            updated_at = EXCLUDED.updated_at
        RETURNING *
        "#,
    )
    .bind(series_id)
    .bind(data.exception_date)
    .bind(data.action)
    .bind(data.start_time)
    .bind(data.end_time)
    .bind(data.shift_type_id)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn delete_exception_by_date(
    pool: &PgPool,
    series_id: i64,
    date: NaiveDate,
) -> Result<bool, sqlx::Error> {
    let rows =
        sqlx::query("DELETE FROM shift_exceptions WHERE series_id = $1 AND exception_date = $2")
            .bind(series_id)
            .bind(date)
            .execute(pool)
            .await?;
    Ok(rows.rows_affected() > 0)
}
