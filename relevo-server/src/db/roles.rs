//! Role database operations

use shared::models::{Role, RoleCreate, RoleUpdate};
use shared::util::now_millis;
use sqlx::PgPool;

pub async fn list_by_company(pool: &PgPool, company_id: i64) -> Result<Vec<Role>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM roles WHERE company_id = $1 ORDER BY id")
        .bind(company_id)
        .fetch_all(pool)
        .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Role>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM roles WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create(
    pool: &PgPool,
    company_id: i64,
    data: &RoleCreate,
) -> Result<Role, sqlx::Error> {
    let now = now_millis();
    sqlx::query_as(
        r#"
        INSERT INTO roles (company_id, name, description, salary_id, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $5)
        RETURNING *
        "#,
    )
    .bind(company_id)
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.salary_id)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    id: i64,
    data: &RoleUpdate,
) -> Result<Option<Role>, sqlx::Error> {
    sqlx::query_as(
        r#"
        UPDATE roles SET
            name = COALESCE($1, name),
            description = COALESCE($2, description),
            salary_id = COALESCE($3, salary_id),
            updated_at = $4
        WHERE id = $5
        RETURNING *
        "#,
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.salary_id)
    .bind(now_millis())
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn in_use(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let row: Option<(i64,)> =
        sqlx::query_as("SELECT id FROM employees WHERE role_id = $1 LIMIT 1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(row.is_some())
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let rows = sqlx::query("DELETE FROM roles WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
