//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category, derived from the error code range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Authentication errors (1xxx)
    Auth,
    /// Permission errors (2xxx)
    Permission,
    /// Company/tenant errors (3xxx)
    Company,
    /// Shift scheduling errors (4xxx)
    Shift,
    /// Holiday/vacation errors (5xxx)
    Holiday,
    /// Time-punch errors (6xxx)
    TimePunch,
    /// Payroll errors (7xxx)
    Payroll,
    /// Employee/role/salary errors (8xxx)
    Employee,
    /// System errors (9xxx)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::Auth,
            2000..3000 => Self::Permission,
            3000..4000 => Self::Company,
            4000..5000 => Self::Shift,
            5000..6000 => Self::Holiday,
            6000..7000 => Self::TimePunch,
            7000..8000 => Self::Payroll,
            8000..9000 => Self::Employee,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Auth => "auth",
            Self::Permission => "permission",
            Self::Company => "company",
            Self::Shift => "shift",
            Self::Holiday => "holiday",
            Self::TimePunch => "time_punch",
            Self::Payroll => "payroll",
            Self::Employee => "employee",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_code() {
        assert_eq!(ErrorCategory::from_code(0), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(1001), ErrorCategory::Auth);
        assert_eq!(ErrorCategory::from_code(2001), ErrorCategory::Permission);
        assert_eq!(ErrorCategory::from_code(3001), ErrorCategory::Company);
        assert_eq!(ErrorCategory::from_code(4002), ErrorCategory::Shift);
        assert_eq!(ErrorCategory::from_code(5005), ErrorCategory::Holiday);
        assert_eq!(ErrorCategory::from_code(6001), ErrorCategory::TimePunch);
        assert_eq!(ErrorCategory::from_code(7001), ErrorCategory::Payroll);
        assert_eq!(ErrorCategory::from_code(8001), ErrorCategory::Employee);
        assert_eq!(ErrorCategory::from_code(9001), ErrorCategory::System);
        assert_eq!(ErrorCategory::from_code(10000), ErrorCategory::System);
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::ShiftOverlap.category(), ErrorCategory::Shift);
        assert_eq!(
            ErrorCode::InsufficientBalance.category(),
            ErrorCategory::Holiday
        );
        assert_eq!(ErrorCode::InternalError.category(), ErrorCategory::System);
    }
}
