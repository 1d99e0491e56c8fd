//! Payroll document model

use serde::{Deserialize, Serialize};

/// Payroll document reference, unique per (employee_id, period_year,
/// period_month). The PDF itself lives in object storage under
/// `storage_key`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Payroll {
    pub id: i64,
    pub company_id: i64,
    pub employee_id: i64,
    pub period_year: i32,
    /// 1-12
    pub period_month: i32,
    pub storage_key: String,
    pub file_url: Option<String>,
    pub byte_size: i64,
    pub original_filename: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Payroll list item with the denormalized employee name
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PayrollListItem {
    pub id: i64,
    pub company_id: i64,
    pub employee_id: i64,
    pub period_year: i32,
    pub period_month: i32,
    pub byte_size: i64,
    pub original_filename: String,
    pub employee_name: String,
}

/// Paginated payroll listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollPage {
    pub items: Vec<PayrollListItem>,
    pub total_pages: i64,
}
