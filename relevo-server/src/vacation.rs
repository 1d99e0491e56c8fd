//! Business-day counting and balance arithmetic for vacation requests

use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Count Mon-Fri dates in `[start, end]`, both inclusive. No public
/// holiday calendar. Inverted ranges count as zero.
pub fn business_days(start: NaiveDate, end: NaiveDate) -> i32 {
    if end < start {
        return 0;
    }
    let mut days = 0;
    let mut d = start;
    while d <= end {
        if !matches!(d.weekday(), Weekday::Sat | Weekday::Sun) {
            days += 1;
        }
        d += Duration::days(1);
    }
    days
}

/// Days still requestable: allocated minus consumed minus reserved by
/// other PENDING requests. Can go negative after an allocation cut;
/// callers clamp for display.
pub fn remaining_days(allocated: i32, used: i32, pending: i32) -> i32 {
    allocated - used - pending
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_full_week() {
        // Mon 2024-06-03 .. Sun 2024-06-09
        assert_eq!(business_days(date(2024, 6, 3), date(2024, 6, 9)), 5);
    }

    #[test]
    fn test_single_days() {
        assert_eq!(business_days(date(2024, 6, 3), date(2024, 6, 3)), 1); // Monday
        assert_eq!(business_days(date(2024, 6, 1), date(2024, 6, 1)), 0); // Saturday
    }

    #[test]
    fn test_weekend_only_is_zero() {
        // Sat 2024-06-01 .. Sun 2024-06-02
        assert_eq!(business_days(date(2024, 6, 1), date(2024, 6, 2)), 0);
    }

    #[test]
    fn test_inverted_range_is_zero() {
        assert_eq!(business_days(date(2024, 6, 9), date(2024, 6, 3)), 0);
    }

    #[test]
    fn test_two_weeks_spanning_weekends() {
        // Fri 2024-06-07 .. Mon 2024-06-17: Fri + 5 + Mon
        assert_eq!(business_days(date(2024, 6, 7), date(2024, 6, 17)), 7);
    }

    #[test]
    fn test_remaining_days() {
        assert_eq!(remaining_days(22, 5, 3), 14);
        assert_eq!(remaining_days(22, 22, 0), 0);
        // allocation lowered below what is already consumed
        assert_eq!(remaining_days(10, 12, 0), -2);
    }
}
