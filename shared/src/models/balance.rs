//! Per employee-year vacation balance

use serde::{Deserialize, Serialize};

/// Default yearly allocation when a balance row is auto-created.
pub const DEFAULT_ALLOCATED_DAYS: i32 = 22;

/// Vacation balance ledger row, unique per (employee_id, year).
/// `used_days` only grows, and only on holiday approval.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct VacationBalance {
    pub id: i64,
    pub company_id: i64,
    pub employee_id: i64,
    pub year: i32,
    pub allocated_days: i32,
    pub used_days: i32,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Balance response with derived fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceView {
    #[serde(flatten)]
    pub balance: VacationBalance,
    /// Sum of requested_days over the employee's other PENDING
    /// requests in the year
    pub pending_days: i32,
    /// max(0, allocated - used - pending)
    pub remaining_days: i32,
}

/// Set allocation payload (admin/HR/owner)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocateRequest {
    pub employee_id: i64,
    pub year: Option<i32>,
    pub allocated_days: i32,
}
