//! Role model

use serde::{Deserialize, Serialize};

/// Company role. One salary can back multiple roles.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Role {
    pub id: i64,
    pub company_id: i64,
    pub name: String,
    pub description: String,
    pub salary_id: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create role payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleCreate {
    pub name: String,
    pub description: String,
    pub salary_id: i64,
}

/// Update role payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub salary_id: Option<i64>,
}
