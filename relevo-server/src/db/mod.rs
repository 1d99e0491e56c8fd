//! Database access layer
//!
//! Free functions over `PgPool`. Tenancy decisions (which company id
//! to filter by) are made in the API layer; queries here just take
//! the resolved parameters.

pub mod balances;
pub mod companies;
pub mod employees;
pub mod holidays;
pub mod payrolls;
pub mod punches;
pub mod refresh_tokens;
pub mod roles;
pub mod salaries;
pub mod series;
pub mod shift_types;
pub mod shifts;
pub mod suggestions;

pub(crate) type BoxError = Box<dyn std::error::Error + Send + Sync>;
