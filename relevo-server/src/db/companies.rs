//! Company database operations

use shared::models::{Company, CompanyCreate, CompanyUpdate};
use shared::util::now_millis;
use sqlx::PgPool;

pub async fn list_all(pool: &PgPool) -> Result<Vec<Company>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM companies ORDER BY id")
        .fetch_all(pool)
        .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Company>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM companies WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn tax_id_exists(
    pool: &PgPool,
    tax_id: &str,
    exclude_id: Option<i64>,
) -> Result<bool, sqlx::Error> {
    let row: Option<(i64,)> =
        sqlx::query_as("SELECT id FROM companies WHERE tax_id = $1 AND id IS DISTINCT FROM $2")
            .bind(tax_id)
            .bind(exclude_id)
            .fetch_optional(pool)
            .await?;
    Ok(row.is_some())
}

pub async fn create(pool: &PgPool, data: &CompanyCreate) -> Result<Company, sqlx::Error> {
    let now = now_millis();
    sqlx::query_as(
        r#"
        INSERT INTO companies (name, tax_id, created_at, updated_at)
        VALUES ($1, $2, $3, $3)
        RETURNING *
        "#,
    )
    .bind(&data.name)
    .bind(&data.tax_id)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    id: i64,
    data: &CompanyUpdate,
) -> Result<Option<Company>, sqlx::Error> {
    sqlx::query_as(
        r#"
        UPDATE companies SET
            name = COALESCE($1, name),
            tax_id = COALESCE($2, tax_id),
            updated_at = $3
        WHERE id = $4
        RETURNING *
        "#,
    )
    .bind(&data.name)
    .bind(&data.tax_id)
    .bind(now_millis())
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Delete a company and everything it owns.
///
/// Explicit child-first order inside one transaction; foreign keys
/// stay satisfied at every step.
pub async fn delete_cascade(pool: &PgPool, company_id: i64) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        "DELETE FROM time_punches WHERE employee_id IN
             (SELECT id FROM employees WHERE company_id = $1)",
    )
    .bind(company_id)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        "DELETE FROM shift_exceptions WHERE series_id IN
             (SELECT id FROM shift_series WHERE company_id = $1)",
    )
    .bind(company_id)
    .execute(&mut *tx)
    .await?;

    for table in [
        "shift_series",
        "shifts",
        "holidays",
        "vacation_balances",
        "payrolls",
        "suggestions",
    ] {
        sqlx::query(&format!("DELETE FROM {table} WHERE company_id = $1"))
            .bind(company_id)
            .execute(&mut *tx)
            .await?;
    }

    sqlx::query(
        "DELETE FROM refresh_tokens WHERE employee_id IN
             (SELECT id FROM employees WHERE company_id = $1)",
    )
    .bind(company_id)
    .execute(&mut *tx)
    .await?;

    sqlx::query("DELETE FROM employees WHERE company_id = $1")
        .bind(company_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM roles WHERE company_id = $1")
        .bind(company_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM salaries WHERE company_id = $1")
        .bind(company_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM shift_types WHERE company_id = $1")
        .bind(company_id)
        .execute(&mut *tx)
        .await?;

    let rows = sqlx::query("DELETE FROM companies WHERE id = $1")
        .bind(company_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(rows.rows_affected() > 0)
}
