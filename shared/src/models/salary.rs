//! Salary model

use serde::{Deserialize, Serialize};

/// Salary entry. Amount is a whole currency unit, always > 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Salary {
    pub id: i64,
    pub company_id: i64,
    pub amount: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create salary payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalaryCreate {
    pub amount: i64,
}

/// Update salary payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalaryUpdate {
    pub amount: Option<i64>,
}
