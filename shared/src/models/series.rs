//! Shift series (recurrence rules) and per-date exceptions

use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

/// 7-bit weekday set, bit 0 = Monday ... bit 6 = Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeekdayMask(pub u8);

impl WeekdayMask {
    pub const ALL: WeekdayMask = WeekdayMask(0b0111_1111);

    /// Build from raw bits, ignoring anything above bit 6.
    pub fn from_bits(bits: u8) -> Self {
        Self(bits & 0b0111_1111)
    }

    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Bit position for a weekday (Monday = 0).
    fn bit(day: Weekday) -> u8 {
        day.num_days_from_monday() as u8
    }

    /// True if the mask covers the given weekday.
    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & (1 << Self::bit(day)) != 0
    }

    /// Set a weekday bit (builder-style, used by tests and seeds).
    pub fn with(self, day: Weekday) -> Self {
        Self(self.0 | (1 << Self::bit(day)))
    }
}

/// Recurring shift rule: a weekly pattern with an every-N-weeks skip
/// factor, projected into concrete occurrences at read time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ShiftSeries {
    pub id: i64,
    pub company_id: i64,
    pub employee_id: i64,
    pub shift_type_id: i64,
    pub start_date: NaiveDate,
    /// None = open-ended
    pub end_date: Option<NaiveDate>,
    #[serde(with = "crate::util::hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "crate::util::hhmm")]
    pub end_time: NaiveTime,
    /// 7-bit mask, bit 0 = Monday
    pub weekdays_mask: i16,
    /// Every N-th eligible week, >= 1
    pub interval_weeks: i32,
    /// IANA timezone name the rule is anchored in
    pub timezone: String,
    pub active: bool,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl ShiftSeries {
    pub fn weekdays(&self) -> WeekdayMask {
        WeekdayMask::from_bits(self.weekdays_mask as u8)
    }
}

/// Create series payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesCreate {
    pub employee_id: i64,
    pub shift_type_id: i64,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    #[serde(with = "crate::util::hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "crate::util::hhmm")]
    pub end_time: NaiveTime,
    pub weekdays_mask: i16,
    pub interval_weeks: Option<i32>,
    pub timezone: Option<String>,
    pub notes: Option<String>,
}

/// Update series payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesUpdate {
    pub shift_type_id: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default, with = "crate::util::hhmm_option")]
    pub start_time: Option<NaiveTime>,
    #[serde(default, with = "crate::util::hhmm_option")]
    pub end_time: Option<NaiveTime>,
    pub weekdays_mask: Option<i16>,
    pub interval_weeks: Option<i32>,
    pub timezone: Option<String>,
    pub active: Option<bool>,
    pub notes: Option<String>,
}

/// Per-date exception action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "TEXT", rename_all = "lowercase"))]
pub enum ExceptionAction {
    Cancel,
    Modify,
}

/// Per-date override or cancellation of a series occurrence.
/// Unique per (series_id, exception_date).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ShiftException {
    pub id: i64,
    pub series_id: i64,
    pub exception_date: NaiveDate,
    pub action: ExceptionAction,
    #[serde(default, with = "crate::util::hhmm_option")]
    pub start_time: Option<NaiveTime>,
    #[serde(default, with = "crate::util::hhmm_option")]
    pub end_time: Option<NaiveTime>,
    pub shift_type_id: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Upsert exception payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExceptionUpsert {
    pub exception_date: NaiveDate,
    pub action: ExceptionAction,
    #[serde(default, with = "crate::util::hhmm_option")]
    pub start_time: Option<NaiveTime>,
    #[serde(default, with = "crate::util::hhmm_option")]
    pub end_time: Option<NaiveTime>,
    pub shift_type_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_monday_is_bit_zero() {
        let mask = WeekdayMask::from_bits(0b0000_0001);
        assert!(mask.contains(Weekday::Mon));
        assert!(!mask.contains(Weekday::Tue));
        assert!(!mask.contains(Weekday::Sun));
    }

    #[test]
    fn test_mask_sunday_is_bit_six() {
        let mask = WeekdayMask::from_bits(0b0100_0000);
        assert!(mask.contains(Weekday::Sun));
        assert!(!mask.contains(Weekday::Mon));
    }

    #[test]
    fn test_mask_builder() {
        let mask = WeekdayMask(0).with(Weekday::Mon).with(Weekday::Wed);
        assert_eq!(mask.bits(), 0b0000_0101);
        assert!(mask.contains(Weekday::Mon));
        assert!(mask.contains(Weekday::Wed));
        assert!(!mask.contains(Weekday::Fri));
    }

    #[test]
    fn test_mask_truncates_high_bits() {
        let mask = WeekdayMask::from_bits(0b1111_1111);
        assert_eq!(mask.bits(), 0b0111_1111);
    }

    #[test]
    fn test_empty_mask() {
        assert!(WeekdayMask::from_bits(0).is_empty());
        assert!(!WeekdayMask::ALL.is_empty());
    }

    #[test]
    fn test_exception_action_serde() {
        assert_eq!(
            serde_json::to_string(&ExceptionAction::Cancel).unwrap(),
            "\"cancel\""
        );
        let action: ExceptionAction = serde_json::from_str("\"modify\"").unwrap();
        assert_eq!(action, ExceptionAction::Modify);
    }
}
