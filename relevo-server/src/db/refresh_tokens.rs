//! Refresh token storage

use shared::util::now_millis;
use sqlx::PgPool;

const REFRESH_TOKEN_TTL_MS: i64 = 30 * 24 * 60 * 60 * 1000; // 30 days

/// Create a new refresh token, revoking any live tokens for this
/// employee first (single-session policy).
pub async fn create(pool: &PgPool, employee_id: i64) -> Result<String, sqlx::Error> {
    let token_id = uuid::Uuid::new_v4().to_string();
    let expires_at = now_millis() + REFRESH_TOKEN_TTL_MS;

    sqlx::query("UPDATE refresh_tokens SET revoked = TRUE WHERE employee_id = $1 AND NOT revoked")
        .bind(employee_id)
        .execute(pool)
        .await?;

    sqlx::query("INSERT INTO refresh_tokens (id, employee_id, expires_at) VALUES ($1, $2, $3)")
        .bind(&token_id)
        .bind(employee_id)
        .bind(expires_at)
        .execute(pool)
        .await?;

    Ok(token_id)
}

/// Validate and rotate a refresh token. Returns
/// (employee_id, new_refresh_token), or None if unusable.
pub async fn rotate(
    pool: &PgPool,
    refresh_token: &str,
) -> Result<Option<(i64, String)>, sqlx::Error> {
    let row: Option<RefreshTokenRow> = sqlx::query_as(
        "SELECT employee_id, expires_at, revoked FROM refresh_tokens WHERE id = $1",
    )
    .bind(refresh_token)
    .fetch_optional(pool)
    .await?;

    let row = match row {
        Some(r) => r,
        None => return Ok(None),
    };

    if row.revoked || row.expires_at < now_millis() {
        return Ok(None);
    }

    sqlx::query("UPDATE refresh_tokens SET revoked = TRUE WHERE id = $1")
        .bind(refresh_token)
        .execute(pool)
        .await?;

    let new_token = create(pool, row.employee_id).await?;

    Ok(Some((row.employee_id, new_token)))
}

#[derive(sqlx::FromRow)]
struct RefreshTokenRow {
    employee_id: i64,
    expires_at: i64,
    revoked: bool,
}
