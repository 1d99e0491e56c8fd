//! JWT authentication middleware
//!
//! Builds one [`AuthContext`] per request and passes it through
//! request extensions: components never read auth from global state.
//!
//! Claims-first: tokens issued by this server always embed
//! `company_id` and `system_role`. The role-name substring fallback
//! only fires for tokens minted before those claims existed and goes
//! through a DB lookup.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use shared::models::SystemRole;

use crate::db;
use crate::state::AppState;

const ACCESS_TOKEN_TTL_HOURS: i64 = 8;

/// JWT claims for employee access tokens
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Employee id
    pub sub: String,
    /// Tenant scope
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<i64>,
    /// Effective role claim ("OWNERDB" | "ADMIN" | "HR" | "EMPLOYEE")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_role: Option<String>,
    /// Expiration (Unix timestamp seconds)
    pub exp: usize,
    /// Issued at (Unix timestamp seconds)
    pub iat: usize,
}

/// Authenticated caller identity, resolved once per request
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub employee_id: i64,
    pub company_id: i64,
    pub role: SystemRole,
}

impl AuthContext {
    /// True if the caller may act on `employee_id`'s records: self,
    /// or an admin/HR of the same company, or the platform owner.
    pub fn can_manage(&self, employee_id: i64, employee_company_id: i64) -> bool {
        if self.role.is_owner() {
            return true;
        }
        if self.role.is_admin_or_hr() {
            return self.company_id == employee_company_id;
        }
        self.employee_id == employee_id
    }
}

/// Create an access token for an employee
pub fn create_access_token(
    employee_id: i64,
    company_id: i64,
    role: SystemRole,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now();
    let claims = AccessClaims {
        sub: employee_id.to_string(),
        company_id: Some(company_id),
        system_role: Some(role.as_claim().to_string()),
        exp: (now + chrono::Duration::hours(ACCESS_TOKEN_TTL_HOURS)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Middleware that verifies the bearer token and injects [`AuthContext`]
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| unauthorized("Missing Authorization header"))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| unauthorized("Invalid Authorization format"))?;

    let validation = Validation::default();
    let token_data = jsonwebtoken::decode::<AccessClaims>(
        token,
        &DecodingKey::from_secret(state.jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::debug!("JWT validation failed: {e}");
        unauthorized("Invalid or expired token")
    })?;

    let claims = token_data.claims;
    let employee_id: i64 = claims
        .sub
        .parse()
        .map_err(|_| unauthorized("Invalid token subject"))?;

    let context = resolve_context(&state, employee_id, &claims)
        .await
        .map_err(|e| e.into_response())?;

    request.extensions_mut().insert(context);

    Ok(next.run(request).await)
}

/// Claims-first resolution with a legacy DB fallback.
async fn resolve_context(
    state: &AppState,
    employee_id: i64,
    claims: &AccessClaims,
) -> Result<AuthContext, AppError> {
    let role_from_claim = claims
        .system_role
        .as_deref()
        .and_then(SystemRole::from_claim);

    if let (Some(role), Some(company_id)) = (role_from_claim, claims.company_id) {
        return Ok(AuthContext {
            employee_id,
            company_id,
            role,
        });
    }

    // Legacy token: load the employee and infer from the role name.
    let auth_row = db::employees::find_auth_info(&state.pool, employee_id)
        .await
        .map_err(|e| {
            tracing::error!("Auth fallback lookup failed: {e}");
            AppError::new(ErrorCode::InternalError)
        })?
        .ok_or_else(|| AppError::new(ErrorCode::TokenInvalid))?;

    let role =
        role_from_claim.unwrap_or_else(|| SystemRole::infer_from_role_name(&auth_row.role_name));

    Ok(AuthContext {
        employee_id,
        company_id: claims.company_id.unwrap_or(auth_row.company_id),
        role,
    })
}

fn unauthorized(message: &str) -> Response {
    AppError::with_message(ErrorCode::NotAuthenticated, message).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_roundtrip() {
        let token =
            create_access_token(42, 7, SystemRole::Hr, "test-secret").unwrap();
        let decoded = jsonwebtoken::decode::<AccessClaims>(
            &token,
            &DecodingKey::from_secret(b"test-secret"),
            &Validation::default(),
        )
        .unwrap();
        assert_eq!(decoded.claims.sub, "42");
        assert_eq!(decoded.claims.company_id, Some(7));
        assert_eq!(decoded.claims.system_role.as_deref(), Some("HR"));
    }

    #[test]
    fn test_token_rejected_with_wrong_secret() {
        let token =
            create_access_token(42, 7, SystemRole::Employee, "test-secret").unwrap();
        let result = jsonwebtoken::decode::<AccessClaims>(
            &token,
            &DecodingKey::from_secret(b"other-secret"),
            &Validation::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_can_manage_scoping() {
        let owner = AuthContext {
            employee_id: 1,
            company_id: 1,
            role: SystemRole::OwnerDb,
        };
        let hr = AuthContext {
            employee_id: 2,
            company_id: 1,
            role: SystemRole::Hr,
        };
        let employee = AuthContext {
            employee_id: 3,
            company_id: 1,
            role: SystemRole::Employee,
        };

        // owner crosses tenants
        assert!(owner.can_manage(99, 5));
        // HR only inside its company
        assert!(hr.can_manage(99, 1));
        assert!(!hr.can_manage(99, 5));
        // plain employee only self
        assert!(employee.can_manage(3, 1));
        assert!(!employee.can_manage(4, 1));
    }
}
