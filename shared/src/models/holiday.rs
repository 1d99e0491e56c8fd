//! Holiday (vacation request) model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Vacation request lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "TEXT", rename_all = "UPPERCASE"))]
pub enum HolidayStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl HolidayStatus {
    /// Parse a status filter string, case-insensitive.
    pub fn from_str_ci(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Some(Self::Pending),
            "APPROVED" => Some(Self::Approved),
            "REJECTED" => Some(Self::Rejected),
            "CANCELLED" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// Vacation request. `requested_days` is the Mon-Fri inclusive count
/// of the range, recomputed on every date change and at approval.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Holiday {
    pub id: i64,
    pub company_id: i64,
    pub employee_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: HolidayStatus,
    /// Employee who approved/rejected; NULL until decided, and set
    /// back to NULL if that account is later deleted.
    pub approved_by: Option<i64>,
    pub approved_at: Option<DateTime<Utc>>,
    pub requested_days: i32,
    pub reason: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create holiday request payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HolidayCreate {
    /// Admin/HR/owner may file on behalf of an employee; plain
    /// employees may only name themselves.
    pub employee_id: Option<i64>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: Option<String>,
}

/// Update holiday request payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HolidayUpdate {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub reason: Option<String>,
    /// Direct status write, admin/HR/owner only
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serde_uppercase() {
        assert_eq!(
            serde_json::to_string(&HolidayStatus::Pending).unwrap(),
            "\"PENDING\""
        );
        let s: HolidayStatus = serde_json::from_str("\"CANCELLED\"").unwrap();
        assert_eq!(s, HolidayStatus::Cancelled);
    }

    #[test]
    fn test_status_filter_parse() {
        assert_eq!(
            HolidayStatus::from_str_ci("approved"),
            Some(HolidayStatus::Approved)
        );
        assert_eq!(
            HolidayStatus::from_str_ci(" pending "),
            Some(HolidayStatus::Pending)
        );
        assert_eq!(HolidayStatus::from_str_ci("done"), None);
    }
}
