//! Internal suggestion box

use serde::{Deserialize, Serialize};

/// Max suggestion length, matches the column width.
pub const MAX_CONTENT_LEN: usize = 255;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Suggestion {
    pub id: i64,
    pub company_id: i64,
    pub employee_id: i64,
    pub content: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create suggestion payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionCreate {
    pub content: String,
}

/// Update suggestion payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionUpdate {
    pub content: Option<String>,
}
