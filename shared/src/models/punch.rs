//! Time-clock punch events

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Punch event type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(
    feature = "db",
    sqlx(type_name = "TEXT", rename_all = "SCREAMING_SNAKE_CASE")
)]
pub enum PunchType {
    In,
    BreakStart,
    BreakEnd,
    Out,
}

/// Append-only punch event. Never updated; deleted only when the
/// employee is removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct TimePunch {
    pub id: i64,
    pub employee_id: i64,
    pub punch_type: PunchType,
    pub punched_at: DateTime<Utc>,
    pub note: Option<String>,
}

/// Optional note body for the punch write endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PunchRequest {
    pub note: Option<String>,
}

/// Clock state for the UI: which buttons to enable
#[derive(Debug, Clone, Serialize)]
pub struct PunchStatus {
    pub open: bool,
    pub paused: bool,
    pub last_type: Option<PunchType>,
    pub last_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_punch_type_serde() {
        assert_eq!(
            serde_json::to_string(&PunchType::BreakStart).unwrap(),
            "\"BREAK_START\""
        );
        let t: PunchType = serde_json::from_str("\"OUT\"").unwrap();
        assert_eq!(t, PunchType::Out);
    }
}
