//! Shift and shift-type models
//!
//! An explicit `Shift` row is one concrete occurrence. Generated
//! occurrences projected from a series are never persisted; they are
//! represented by [`Occurrence::Generated`] at the API boundary.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Shift lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "TEXT", rename_all = "lowercase"))]
pub enum ShiftStatus {
    Planned,
    Published,
    Cancelled,
}

/// Shift type catalog entry.
///
/// `company_id = None` marks a global entry visible to every company.
/// `(company_id, code)` is unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ShiftType {
    pub id: i64,
    pub company_id: Option<i64>,
    pub code: String,
    pub name: String,
    /// Display color, `#RRGGBB`
    pub color: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create shift type payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftTypeCreate {
    pub code: String,
    pub name: String,
    pub color: String,
}

/// Update shift type payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftTypeUpdate {
    pub code: Option<String>,
    pub name: Option<String>,
    pub color: Option<String>,
}

/// Explicit shift occurrence.
///
/// `end_time > start_time` always holds; midnight-crossing shifts are
/// not supported.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Shift {
    pub id: i64,
    pub company_id: i64,
    pub employee_id: i64,
    pub shift_date: NaiveDate,
    #[serde(with = "crate::util::hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "crate::util::hhmm")]
    pub end_time: NaiveTime,
    pub shift_type_id: i64,
    pub status: ShiftStatus,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create shift payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftCreate {
    pub employee_id: i64,
    pub shift_date: NaiveDate,
    #[serde(with = "crate::util::hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "crate::util::hhmm")]
    pub end_time: NaiveTime,
    pub shift_type_id: i64,
    pub status: Option<ShiftStatus>,
    pub notes: Option<String>,
}

/// Update shift payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftUpdate {
    pub shift_date: Option<NaiveDate>,
    #[serde(default, with = "crate::util::hhmm_option")]
    pub start_time: Option<NaiveTime>,
    #[serde(default, with = "crate::util::hhmm_option")]
    pub end_time: Option<NaiveTime>,
    pub shift_type_id: Option<i64>,
    pub status: Option<ShiftStatus>,
    pub notes: Option<String>,
}

/// Occurrence projected from a series; never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedOccurrence {
    /// Back-reference to the generating series
    pub series_id: i64,
    pub company_id: i64,
    pub employee_id: i64,
    pub shift_date: NaiveDate,
    #[serde(with = "crate::util::hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "crate::util::hhmm")]
    pub end_time: NaiveTime,
    pub shift_type_id: i64,
    pub status: ShiftStatus,
    pub notes: Option<String>,
    /// Always true; explicit shifts serialize `generated: false`
    pub generated: bool,
}

/// One entry of a merged schedule listing: an explicit shift row or a
/// synthetic series projection. Kept as a tagged union so generated
/// occurrences can never be written back as `Shift` rows.
#[derive(Debug, Clone)]
pub enum Occurrence {
    Explicit(Shift),
    Generated(GeneratedOccurrence),
}

impl Occurrence {
    pub fn shift_date(&self) -> NaiveDate {
        match self {
            Self::Explicit(s) => s.shift_date,
            Self::Generated(g) => g.shift_date,
        }
    }

    pub fn start_time(&self) -> NaiveTime {
        match self {
            Self::Explicit(s) => s.start_time,
            Self::Generated(g) => g.start_time,
        }
    }
}

impl Serialize for Occurrence {
    fn serialize<S: serde::Serializer>(&self, ser: S) -> Result<S::Ok, S::Error> {
        // Explicit shifts gain a `generated: false` marker so both
        // variants share one wire shape.
        #[derive(Serialize)]
        struct ExplicitWire<'a> {
            #[serde(flatten)]
            shift: &'a Shift,
            generated: bool,
        }

        match self {
            Self::Explicit(shift) => ExplicitWire {
                shift,
                generated: false,
            }
            .serialize(ser),
            Self::Generated(g) => g.serialize(ser),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_shift() -> Shift {
        Shift {
            id: 7,
            company_id: 1,
            employee_id: 2,
            shift_date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            shift_type_id: 1,
            status: ShiftStatus::Planned,
            notes: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ShiftStatus::Published).unwrap(),
            "\"published\""
        );
    }

    #[test]
    fn test_explicit_occurrence_wire_shape() {
        let json =
            serde_json::to_value(Occurrence::Explicit(sample_shift())).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["generated"], false);
        assert_eq!(json["start_time"], "09:00");
    }

    #[test]
    fn test_generated_occurrence_wire_shape() {
        let g = GeneratedOccurrence {
            series_id: 4,
            company_id: 1,
            employee_id: 2,
            shift_date: NaiveDate::from_ymd_opt(2024, 6, 5).unwrap(),
            start_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            shift_type_id: 1,
            status: ShiftStatus::Planned,
            notes: None,
            generated: true,
        };
        let json = serde_json::to_value(Occurrence::Generated(g)).unwrap();
        assert_eq!(json["generated"], true);
        assert_eq!(json["series_id"], 4);
        assert!(json.get("id").is_none());
    }
}
