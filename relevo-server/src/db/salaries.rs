//! Salary database operations

use shared::models::{Salary, SalaryUpdate};
use shared::util::now_millis;
use sqlx::PgPool;

pub async fn list_by_company(pool: &PgPool, company_id: i64) -> Result<Vec<Salary>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM salaries WHERE company_id = $1 ORDER BY id")
        .bind(company_id)
        .fetch_all(pool)
        .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Salary>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM salaries WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create(pool: &PgPool, company_id: i64, amount: i64) -> Result<Salary, sqlx::Error> {
    let now = now_millis();
    sqlx::query_as(
        r#"
        INSERT INTO salaries (company_id, amount, created_at, updated_at)
        VALUES ($1, $2, $3, $3)
        RETURNING *
        "#,
    )
    .bind(company_id)
    .bind(amount)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    id: i64,
    data: &SalaryUpdate,
) -> Result<Option<Salary>, sqlx::Error> {
    sqlx::query_as(
        r#"
        UPDATE salaries SET
            amount = COALESCE($1, amount),
            updated_at = $2
        WHERE id = $3
        RETURNING *
        "#,
    )
    .bind(data.amount)
    .bind(now_millis())
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let rows = sqlx::query("DELETE FROM salaries WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
