//! Company model: the tenant root

use serde::{Deserialize, Serialize};

/// Company entity. Owns every other company-scoped row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Company {
    pub id: i64,
    pub name: String,
    /// Tax identification (CIF/NIF), unique across the platform
    pub tax_id: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create company payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyCreate {
    pub name: String,
    pub tax_id: String,
}

/// Update company payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyUpdate {
    pub name: Option<String>,
    pub tax_id: Option<String>,
}
