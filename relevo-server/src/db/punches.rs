//! Time-punch database operations (append-only log)

use chrono::{DateTime, Utc};
use shared::models::{PunchType, TimePunch};
use sqlx::PgPool;

/// The employee's most recent punch, if any.
pub async fn last_for_employee(
    pool: &PgPool,
    employee_id: i64,
) -> Result<Option<TimePunch>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT * FROM time_punches
        WHERE employee_id = $1
        ORDER BY punched_at DESC, id DESC
        LIMIT 1
        "#,
    )
    .bind(employee_id)
    .fetch_optional(pool)
    .await
}

pub async fn insert(
    pool: &PgPool,
    employee_id: i64,
    punch_type: PunchType,
    at: DateTime<Utc>,
    note: Option<&str>,
) -> Result<TimePunch, sqlx::Error> {
    sqlx::query_as(
        r#"
        INSERT INTO time_punches (employee_id, punch_type, punched_at, note)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(employee_id)
    .bind(punch_type)
    .bind(at)
    .bind(note)
    .fetch_one(pool)
    .await
}

/// Insert several punches atomically, in order (closing an open break
/// together with the OUT).
pub async fn insert_batch(
    pool: &PgPool,
    employee_id: i64,
    punches: &[(PunchType, DateTime<Utc>)],
    note: Option<&str>,
) -> Result<Vec<TimePunch>, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let mut created = Vec::with_capacity(punches.len());
    for (punch_type, at) in punches {
        let punch: TimePunch = sqlx::query_as(
            r#"
            INSERT INTO time_punches (employee_id, punch_type, punched_at, note)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(employee_id)
        .bind(punch_type)
        .bind(at)
        .bind(note)
        .fetch_one(&mut *tx)
        .await?;
        created.push(punch);
    }
    tx.commit().await?;
    Ok(created)
}

/// Punches inside the half-open UTC window, ascending.
pub async fn list_in_range(
    pool: &PgPool,
    employee_id: i64,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Vec<TimePunch>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT * FROM time_punches
        WHERE employee_id = $1 AND punched_at >= $2 AND punched_at < $3
        ORDER BY punched_at ASC, id ASC
        "#,
    )
    .bind(employee_id)
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await
}
