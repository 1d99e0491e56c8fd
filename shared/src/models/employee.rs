//! Employee model and system-role resolution

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Effective permission level resolved from a token.
///
/// `OwnerDb` is the platform owner and bypasses tenant scoping;
/// `Admin` and `Hr` are scoped to their own company; `Employee`
/// only to their own rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SystemRole {
    OwnerDb,
    Admin,
    Hr,
    Employee,
}

impl SystemRole {
    /// True for roles allowed to manage other employees' data
    /// within their company.
    pub fn is_admin_or_hr(&self) -> bool {
        matches!(self, Self::OwnerDb | Self::Admin | Self::Hr)
    }

    /// True for the unscoped platform owner.
    pub fn is_owner(&self) -> bool {
        matches!(self, Self::OwnerDb)
    }

    /// Parse an explicit claim value ("OWNERDB", "ADMIN", "HR",
    /// "EMPLOYEE"); case-insensitive.
    pub fn from_claim(claim: &str) -> Option<Self> {
        match claim.to_ascii_uppercase().as_str() {
            "OWNERDB" => Some(Self::OwnerDb),
            "ADMIN" => Some(Self::Admin),
            "HR" => Some(Self::Hr),
            "EMPLOYEE" => Some(Self::Employee),
            _ => None,
        }
    }

    /// Fallback inference from a free-form role name.
    ///
    /// Normalizes (lowercase, strips spaces/dashes/underscores) and
    /// substring-matches. Legacy data-migration path; tokens issued by
    /// this server always carry an explicit claim.
    pub fn infer_from_role_name(role_name: &str) -> Self {
        let norm: String = role_name
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect();
        if norm.contains("ownerdb") {
            Self::OwnerDb
        } else if norm.contains("admin") {
            Self::Admin
        } else if norm.contains("hr") || norm.contains("recursos") || norm.contains("rrhh") {
            Self::Hr
        } else {
            Self::Employee
        }
    }

    /// Claim string embedded in tokens.
    pub fn as_claim(&self) -> &'static str {
        match self {
            Self::OwnerDb => "OWNERDB",
            Self::Admin => "ADMIN",
            Self::Hr => "HR",
            Self::Employee => "EMPLOYEE",
        }
    }
}

/// Employee entity (password hash never serialized)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Employee {
    pub id: i64,
    pub company_id: i64,
    pub first_name: String,
    pub last_name: String,
    /// National identity document (DNI/NIE), unique
    pub national_id: String,
    pub email: String,
    pub role_id: i64,
    pub birth_date: Option<NaiveDate>,
    pub address: Option<String>,
    pub phone: Option<String>,
    /// Date the employee joined the company
    pub hire_date: Option<NaiveDate>,
    pub image_url: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create employee payload (admin/HR path and self-registration)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeCreate {
    pub company_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub national_id: String,
    pub email: String,
    pub password: String,
    pub role_id: i64,
    pub birth_date: Option<NaiveDate>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub hire_date: Option<NaiveDate>,
}

/// Update employee payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub national_id: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role_id: Option<i64>,
    pub birth_date: Option<NaiveDate>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub hire_date: Option<NaiveDate>,
    pub image_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_claim() {
        assert_eq!(SystemRole::from_claim("OWNERDB"), Some(SystemRole::OwnerDb));
        assert_eq!(SystemRole::from_claim("admin"), Some(SystemRole::Admin));
        assert_eq!(SystemRole::from_claim("Hr"), Some(SystemRole::Hr));
        assert_eq!(SystemRole::from_claim("manager"), None);
        assert_eq!(SystemRole::from_claim(""), None);
    }

    #[test]
    fn test_infer_from_role_name() {
        assert_eq!(
            SystemRole::infer_from_role_name("Owner-DB"),
            SystemRole::OwnerDb
        );
        assert_eq!(
            SystemRole::infer_from_role_name("Store Admin"),
            SystemRole::Admin
        );
        assert_eq!(SystemRole::infer_from_role_name("HR Manager"), SystemRole::Hr);
        assert_eq!(
            SystemRole::infer_from_role_name("Recursos Humanos"),
            SystemRole::Hr
        );
        assert_eq!(SystemRole::infer_from_role_name("RRHH"), SystemRole::Hr);
        assert_eq!(
            SystemRole::infer_from_role_name("Cashier"),
            SystemRole::Employee
        );
        assert_eq!(SystemRole::infer_from_role_name(""), SystemRole::Employee);
    }

    #[test]
    fn test_claim_roundtrip() {
        for role in [
            SystemRole::OwnerDb,
            SystemRole::Admin,
            SystemRole::Hr,
            SystemRole::Employee,
        ] {
            assert_eq!(SystemRole::from_claim(role.as_claim()), Some(role));
        }
    }

    #[test]
    fn test_role_ordering_helpers() {
        assert!(SystemRole::OwnerDb.is_admin_or_hr());
        assert!(SystemRole::Hr.is_admin_or_hr());
        assert!(!SystemRole::Employee.is_admin_or_hr());
        assert!(SystemRole::OwnerDb.is_owner());
        assert!(!SystemRole::Admin.is_owner());
    }
}
