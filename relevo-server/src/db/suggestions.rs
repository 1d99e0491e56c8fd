//! Suggestion box database operations

use shared::models::Suggestion;
use shared::util::now_millis;
use sqlx::PgPool;

pub async fn list(
    pool: &PgPool,
    company_id: Option<i64>,
    employee_id: Option<i64>,
) -> Result<Vec<Suggestion>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT * FROM suggestions
        WHERE ($1::BIGINT IS NULL OR company_id = $1)
          AND ($2::BIGINT IS NULL OR employee_id = $2)
        ORDER BY id DESC
        "#,
    )
    .bind(company_id)
    .bind(employee_id)
    .fetch_all(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Suggestion>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM suggestions WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create(
    pool: &PgPool,
    company_id: i64,
    employee_id: i64,
    content: &str,
) -> Result<Suggestion, sqlx::Error> {
    let now = now_millis();
    sqlx::query_as(
        r#"
        INSERT INTO suggestions (company_id, employee_id, content, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $4)
        RETURNING *
        "#,
    )
    .bind(company_id)
    .bind(employee_id)
    .bind(content)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn update_content(
    pool: &PgPool,
    id: i64,
    content: &str,
) -> Result<Option<Suggestion>, sqlx::Error> {
    sqlx::query_as(
        r#"
        UPDATE suggestions SET content = $1, updated_at = $2
        WHERE id = $3
        RETURNING *
        "#,
    )
    .bind(content)
    .bind(now_millis())
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let rows = sqlx::query("DELETE FROM suggestions WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
