//! Shift type catalog operations
//!
//! Entries with NULL company_id are global and visible to everyone.

use shared::models::{ShiftType, ShiftTypeCreate, ShiftTypeUpdate};
use shared::util::now_millis;
use sqlx::PgPool;

/// Company-scoped entries plus the global catalog.
pub async fn list_visible(pool: &PgPool, company_id: i64) -> Result<Vec<ShiftType>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM shift_types WHERE company_id = $1 OR company_id IS NULL ORDER BY id",
    )
    .bind(company_id)
    .fetch_all(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<ShiftType>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM shift_types WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Find a type only if it belongs to `company_id` or is global.
pub async fn find_visible(
    pool: &PgPool,
    id: i64,
    company_id: i64,
) -> Result<Option<ShiftType>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM shift_types WHERE id = $1 AND (company_id = $2 OR company_id IS NULL)",
    )
    .bind(id)
    .bind(company_id)
    .fetch_optional(pool)
    .await
}

pub async fn code_exists(
    pool: &PgPool,
    company_id: Option<i64>,
    code: &str,
    exclude_id: Option<i64>,
) -> Result<bool, sqlx::Error> {
    let row: Option<(i64,)> = sqlx::query_as(
        r#"
        SELECT id FROM shift_types
        WHERE company_id IS NOT DISTINCT FROM $1
          AND code = $2
          AND id IS DISTINCT FROM $3
        "#,
    )
    .bind(company_id)
    .bind(code)
    .bind(exclude_id)
    .fetch_optional(pool)
    .await?;
    Ok(row.is_some())
}

pub async fn create(
    pool: &PgPool,
    company_id: Option<i64>,
    data: &ShiftTypeCreate,
) -> Result<ShiftType, sqlx::Error> {
    let now = now_millis();
    sqlx::query_as(
        r#"
        INSERT INTO shift_types (company_id, code, name, color, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $5)
        RETURNING *
        "#,
    )
    .bind(company_id)
    .bind(&data.code)
    .bind(&data.name)
    .bind(&data.color)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    id: i64,
    data: &ShiftTypeUpdate,
) -> Result<Option<ShiftType>, sqlx::Error> {
    sqlx::query_as(
        r#"
        UPDATE shift_types SET
            code = COALESCE($1, code),
            name = COALESCE($2, name),
            color = COALESCE($3, color),
            updated_at = $4
        WHERE id = $5
        RETURNING *
        "#,
    )
    .bind(&data.code)
    .bind(&data.name)
    .bind(&data.color)
    .bind(now_millis())
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let rows = sqlx::query("DELETE FROM shift_types WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
