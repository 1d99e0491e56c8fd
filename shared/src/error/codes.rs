//! Unified error codes for the Relevo platform
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Company/tenant errors
//! - 4xxx: Shift scheduling errors
//! - 5xxx: Holiday/vacation errors
//! - 6xxx: Time-punch errors
//! - 7xxx: Payroll errors
//! - 8xxx: Employee/role/salary errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient
/// serialization and cross-language compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Refresh token is invalid or revoked
    RefreshTokenInvalid = 1005,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin or HR role required
    AdminRequired = 2002,
    /// Platform owner role required
    OwnerRequired = 2003,
    /// The platform owner account cannot be deleted
    CannotDeleteOwner = 2004,

    // ==================== 3xxx: Company ====================
    /// Company not found
    CompanyNotFound = 3001,
    /// Company tax id already registered
    TaxIdExists = 3002,

    // ==================== 4xxx: Shift scheduling ====================
    /// Shift not found
    ShiftNotFound = 4001,
    /// Shift overlaps another shift for the same employee and date
    ShiftOverlap = 4002,
    /// Shift end time must be after start time (no midnight crossing)
    ShiftTimeInvalid = 4003,
    /// Shift series not found
    SeriesNotFound = 4101,
    /// Series recurrence rule is invalid
    SeriesRuleInvalid = 4102,
    /// Shift exception not found
    ExceptionNotFound = 4201,
    /// Shift exception payload is invalid
    ExceptionInvalid = 4202,
    /// Shift type not found
    ShiftTypeNotFound = 4301,
    /// Shift type code already exists for this company
    ShiftTypeCodeExists = 4302,
    /// Shift type belongs to another company
    ShiftTypeForeign = 4303,

    // ==================== 5xxx: Holidays ====================
    /// Holiday request not found
    HolidayNotFound = 5001,
    /// Date range overlaps another PENDING/APPROVED request
    HolidayOverlap = 5002,
    /// end_date must be on or after start_date
    HolidayRangeInvalid = 5003,
    /// Action only valid for PENDING requests
    HolidayNotPending = 5004,
    /// Requested days exceed the remaining balance
    InsufficientBalance = 5005,
    /// Range contains no business days
    NoBusinessDays = 5006,

    // ==================== 6xxx: Time punch ====================
    /// A work shift is already open
    PunchAlreadyOpen = 6001,
    /// No work shift is currently open
    PunchNotOpen = 6002,
    /// Pause action not valid in the current punch state
    PunchStateInvalid = 6003,
    /// Unknown IANA timezone name
    TimezoneInvalid = 6004,

    // ==================== 7xxx: Payroll ====================
    /// Payroll not found
    PayrollNotFound = 7001,
    /// period_month must be 1-12
    PayrollPeriodInvalid = 7002,
    /// Payroll has no stored document
    PayrollFileMissing = 7003,
    /// Uploaded payroll file must be a PDF
    PayrollNotPdf = 7004,

    // ==================== 8xxx: Employee ====================
    /// Employee not found
    EmployeeNotFound = 8001,
    /// Email already registered
    EmailExists = 8002,
    /// National id already registered
    NationalIdExists = 8003,
    /// Role not found
    RoleNotFound = 8101,
    /// Role is referenced by employees
    RoleInUse = 8102,
    /// Salary not found
    SalaryNotFound = 8201,
    /// Salary amount must be a positive integer
    SalaryAmountInvalid = 8202,
    /// Suggestion not found
    SuggestionNotFound = 8301,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Object storage error
    StorageError = 9003,
    /// Too many requests
    TooManyRequests = 9004,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "Authentication required",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::TokenExpired => "Token has expired",
            ErrorCode::TokenInvalid => "Token is invalid",
            ErrorCode::RefreshTokenInvalid => "Refresh token is invalid or revoked",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::AdminRequired => "Admin or HR role required",
            ErrorCode::OwnerRequired => "Platform owner role required",
            ErrorCode::CannotDeleteOwner => "The platform owner account cannot be deleted",

            // Company
            ErrorCode::CompanyNotFound => "Company not found",
            ErrorCode::TaxIdExists => "Tax id already registered",

            // Shifts
            ErrorCode::ShiftNotFound => "Shift not found",
            ErrorCode::ShiftOverlap => "Shift overlaps an existing shift",
            ErrorCode::ShiftTimeInvalid => "end_time must be after start_time",
            ErrorCode::SeriesNotFound => "Shift series not found",
            ErrorCode::SeriesRuleInvalid => "Series recurrence rule is invalid",
            ErrorCode::ExceptionNotFound => "Shift exception not found",
            ErrorCode::ExceptionInvalid => "Shift exception is invalid",
            ErrorCode::ShiftTypeNotFound => "Shift type not found",
            ErrorCode::ShiftTypeCodeExists => "Shift type code already exists",
            ErrorCode::ShiftTypeForeign => "Shift type belongs to another company",

            // Holidays
            ErrorCode::HolidayNotFound => "Holiday request not found",
            ErrorCode::HolidayOverlap => "The selected range overlaps with another request",
            ErrorCode::HolidayRangeInvalid => "end_date must be >= start_date",
            ErrorCode::HolidayNotPending => "Only PENDING requests can be modified",
            ErrorCode::InsufficientBalance => "Insufficient remaining days for this request",
            ErrorCode::NoBusinessDays => "Requested days must be > 0 (business days)",

            // Time punch
            ErrorCode::PunchAlreadyOpen => "A work shift is already open",
            ErrorCode::PunchNotOpen => "No work shift is currently open",
            ErrorCode::PunchStateInvalid => "Pause action not valid in this state",
            ErrorCode::TimezoneInvalid => "Unknown timezone name",

            // Payroll
            ErrorCode::PayrollNotFound => "Payroll not found",
            ErrorCode::PayrollPeriodInvalid => "period_month must be between 1 and 12",
            ErrorCode::PayrollFileMissing => "Payroll has no stored document",
            ErrorCode::PayrollNotPdf => "Uploaded file must be a PDF",

            // Employee
            ErrorCode::EmployeeNotFound => "Employee not found",
            ErrorCode::EmailExists => "Email already registered",
            ErrorCode::NationalIdExists => "National id already registered",
            ErrorCode::RoleNotFound => "Role not found",
            ErrorCode::RoleInUse => "Role is referenced by employees",
            ErrorCode::SalaryNotFound => "Salary not found",
            ErrorCode::SalaryAmountInvalid => "amount must be a positive integer",
            ErrorCode::SuggestionNotFound => "Suggestion not found",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::StorageError => "Object storage error",
            ErrorCode::TooManyRequests => "Too many requests, try again later",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown u16 into an [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        macro_rules! codes {
            ($($variant:ident),+ $(,)?) => {
                match value {
                    $(v if v == ErrorCode::$variant as u16 => Ok(ErrorCode::$variant),)+
                    _ => Err(InvalidErrorCode(value)),
                }
            };
        }
        codes!(
            Success,
            Unknown,
            ValidationFailed,
            NotFound,
            AlreadyExists,
            InvalidRequest,
            InvalidFormat,
            RequiredField,
            ValueOutOfRange,
            NotAuthenticated,
            InvalidCredentials,
            TokenExpired,
            TokenInvalid,
            RefreshTokenInvalid,
            PermissionDenied,
            AdminRequired,
            OwnerRequired,
            CannotDeleteOwner,
            CompanyNotFound,
            TaxIdExists,
            ShiftNotFound,
            ShiftOverlap,
            ShiftTimeInvalid,
            SeriesNotFound,
            SeriesRuleInvalid,
            ExceptionNotFound,
            ExceptionInvalid,
            ShiftTypeNotFound,
            ShiftTypeCodeExists,
            ShiftTypeForeign,
            HolidayNotFound,
            HolidayOverlap,
            HolidayRangeInvalid,
            HolidayNotPending,
            InsufficientBalance,
            NoBusinessDays,
            PunchAlreadyOpen,
            PunchNotOpen,
            PunchStateInvalid,
            TimezoneInvalid,
            PayrollNotFound,
            PayrollPeriodInvalid,
            PayrollFileMissing,
            PayrollNotPdf,
            EmployeeNotFound,
            EmailExists,
            NationalIdExists,
            RoleNotFound,
            RoleInUse,
            SalaryNotFound,
            SalaryAmountInvalid,
            SuggestionNotFound,
            InternalError,
            DatabaseError,
            StorageError,
            TooManyRequests,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_roundtrip() {
        for code in [
            ErrorCode::Success,
            ErrorCode::ShiftOverlap,
            ErrorCode::HolidayNotPending,
            ErrorCode::PunchAlreadyOpen,
            ErrorCode::InternalError,
        ] {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_unknown_code_rejected() {
        assert_eq!(ErrorCode::try_from(4999), Err(InvalidErrorCode(4999)));
    }

    #[test]
    fn test_display() {
        assert_eq!(ErrorCode::ShiftOverlap.to_string(), "E4002");
        assert_eq!(ErrorCode::Success.to_string(), "E0000");
    }

    #[test]
    fn test_serde_as_u16() {
        let json = serde_json::to_string(&ErrorCode::HolidayOverlap).unwrap();
        assert_eq!(json, "5002");
        let code: ErrorCode = serde_json::from_str("5002").unwrap();
        assert_eq!(code, ErrorCode::HolidayOverlap);
    }
}
