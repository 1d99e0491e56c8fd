//! Recurring-series expansion engine
//!
//! Projects weekly recurrence rules over a query window into concrete
//! occurrences, applies per-date exceptions, and suppresses generated
//! occurrences that collide with explicit shifts. Pure functions over
//! pre-fetched rows; handlers do the fetching.

use std::collections::HashMap;

use chrono::{Datelike, Duration, NaiveDate, NaiveTime};
use shared::models::{
    ExceptionAction, GeneratedOccurrence, Occurrence, Shift, ShiftException, ShiftSeries,
    ShiftStatus,
};

/// Half-open interval overlap test, shared by read-time suppression
/// and write-time conflict checks.
pub fn overlaps(
    a_start: NaiveTime,
    a_end: NaiveTime,
    b_start: NaiveTime,
    b_end: NaiveTime,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// Monday of the week containing `date`.
fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Index explicit shifts by date for the overlap checks.
pub fn index_by_date(shifts: &[Shift]) -> HashMap<NaiveDate, Vec<(NaiveTime, NaiveTime)>> {
    let mut index: HashMap<NaiveDate, Vec<(NaiveTime, NaiveTime)>> = HashMap::new();
    for shift in shifts {
        index
            .entry(shift.shift_date)
            .or_default()
            .push((shift.start_time, shift.end_time));
    }
    index
}

/// Expand one series over `[from, to]`.
///
/// Series whose rule cannot generate anything (inverted times, empty
/// mask, interval < 1) contribute no occurrences; invalid rows synced
/// from older data must not take the whole listing down.
pub fn expand_series(
    series: &ShiftSeries,
    exceptions: &HashMap<NaiveDate, ShiftException>,
    explicit_index: &HashMap<NaiveDate, Vec<(NaiveTime, NaiveTime)>>,
    from: NaiveDate,
    to: NaiveDate,
) -> Vec<GeneratedOccurrence> {
    let mask = series.weekdays();
    if !series.active
        || series.end_time <= series.start_time
        || mask.is_empty()
        || series.interval_weeks < 1
    {
        return Vec::new();
    }

    // Intersect the window with the series' own validity range
    let lo = from.max(series.start_date);
    let hi = match series.end_date {
        Some(end) => to.min(end),
        None => to,
    };
    if lo > hi {
        return Vec::new();
    }

    let anchor_week = monday_of(series.start_date);
    let interval = i64::from(series.interval_weeks);
    let mut out = Vec::new();

    let mut day = lo;
    while day <= hi {
        let next = day.succ_opt();

        if !mask.contains(day.weekday()) {
            match next {
                Some(n) => {
                    day = n;
                    continue;
                }
                None => break,
            }
        }

        let weeks_since_anchor = (monday_of(day) - anchor_week).num_days() / 7;
        if weeks_since_anchor % interval != 0 {
            match next {
                Some(n) => {
                    day = n;
                    continue;
                }
                None => break,
            }
        }

        if let Some(occ) = resolve_occurrence(series, exceptions.get(&day), day)
            && !collides_with_explicit(explicit_index, day, occ.start_time, occ.end_time)
        {
            out.push(occ);
        }

        match next {
            Some(n) => day = n,
            None => break,
        }
    }

    out
}

/// Apply the exception (if any) for one candidate day.
///
/// Returns None when the occurrence is suppressed: a cancel exception,
/// or a modify whose overrides invert the time range.
fn resolve_occurrence(
    series: &ShiftSeries,
    exception: Option<&ShiftException>,
    day: NaiveDate,
) -> Option<GeneratedOccurrence> {
    let (start_time, end_time, shift_type_id) = match exception {
        Some(exc) if exc.action == ExceptionAction::Cancel => return None,
        Some(exc) => {
            let start = exc.start_time.unwrap_or(series.start_time);
            let end = exc.end_time.unwrap_or(series.end_time);
            if end <= start {
                return None;
            }
            (start, end, exc.shift_type_id.unwrap_or(series.shift_type_id))
        }
        None => (series.start_time, series.end_time, series.shift_type_id),
    };

    Some(GeneratedOccurrence {
        series_id: series.id,
        company_id: series.company_id,
        employee_id: series.employee_id,
        shift_date: day,
        start_time,
        end_time,
        shift_type_id,
        status: ShiftStatus::Planned,
        notes: series.notes.clone(),
        generated: true,
    })
}

fn collides_with_explicit(
    explicit_index: &HashMap<NaiveDate, Vec<(NaiveTime, NaiveTime)>>,
    day: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
) -> bool {
    explicit_index
        .get(&day)
        .is_some_and(|intervals| intervals.iter().any(|&(s, e)| overlaps(start, end, s, e)))
}

/// Merge explicit shifts with generated occurrences, ordered by
/// (date, start_time).
pub fn merge_occurrences(
    explicit: Vec<Shift>,
    generated: Vec<GeneratedOccurrence>,
) -> Vec<Occurrence> {
    let mut merged: Vec<Occurrence> = explicit
        .into_iter()
        .map(Occurrence::Explicit)
        .chain(generated.into_iter().map(Occurrence::Generated))
        .collect();
    merged.sort_by_key(|occ| (occ.shift_date(), occ.start_time()));
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use shared::models::WeekdayMask;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn series(start: NaiveDate, mask: WeekdayMask, interval: i32) -> ShiftSeries {
        ShiftSeries {
            id: 10,
            company_id: 1,
            employee_id: 2,
            shift_type_id: 3,
            start_date: start,
            end_date: None,
            start_time: time(9, 0),
            end_time: time(17, 0),
            weekdays_mask: mask.bits() as i16,
            interval_weeks: interval,
            timezone: "Europe/Madrid".to_string(),
            active: true,
            notes: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn exception(
        day: NaiveDate,
        action: ExceptionAction,
        start: Option<NaiveTime>,
        end: Option<NaiveTime>,
    ) -> ShiftException {
        ShiftException {
            id: 99,
            series_id: 10,
            exception_date: day,
            action,
            start_time: start,
            end_time: end,
            shift_type_id: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn shift(day: NaiveDate, start: NaiveTime, end: NaiveTime) -> Shift {
        Shift {
            id: 1,
            company_id: 1,
            employee_id: 2,
            shift_date: day,
            start_time: start,
            end_time: end,
            shift_type_id: 3,
            status: ShiftStatus::Planned,
            notes: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_overlap_half_open() {
        // back-to-back intervals do not overlap
        assert!(!overlaps(time(9, 0), time(12, 0), time(12, 0), time(15, 0)));
        // one minute of shared time does
        assert!(overlaps(time(9, 0), time(12, 1), time(12, 0), time(15, 0)));
        // containment
        assert!(overlaps(time(9, 0), time(17, 0), time(10, 0), time(11, 0)));
        // identical
        assert!(overlaps(time(9, 0), time(17, 0), time(9, 0), time(17, 0)));
        // disjoint
        assert!(!overlaps(time(6, 0), time(8, 0), time(9, 0), time(10, 0)));
    }

    #[test]
    fn test_biweekly_monday_wednesday() {
        // Series starts 2024-01-01 (Monday), mask {Mon, Wed},
        // interval 2, window through 2024-01-21: the week of the 8th
        // is skipped.
        let mask = WeekdayMask(0).with(Weekday::Mon).with(Weekday::Wed);
        let s = series(date(2024, 1, 1), mask, 2);
        let occ = expand_series(
            &s,
            &HashMap::new(),
            &HashMap::new(),
            date(2024, 1, 1),
            date(2024, 1, 21),
        );
        let dates: Vec<NaiveDate> = occ.iter().map(|o| o.shift_date).collect();
        assert_eq!(
            dates,
            vec![
                date(2024, 1, 1),
                date(2024, 1, 3),
                date(2024, 1, 15),
                date(2024, 1, 17),
            ]
        );
        assert!(occ.iter().all(|o| o.generated && o.series_id == 10));
        assert!(occ.iter().all(|o| o.status == ShiftStatus::Planned));
    }

    #[test]
    fn test_anchor_week_is_mondays_even_for_midweek_start() {
        // Start on a Wednesday: the Monday of that same week anchors
        // the interval count, so the Monday two days before start is
        // week 0 (but outside the validity range).
        let mask = WeekdayMask(0).with(Weekday::Mon);
        let s = series(date(2024, 1, 3), mask, 2);
        let occ = expand_series(
            &s,
            &HashMap::new(),
            &HashMap::new(),
            date(2024, 1, 1),
            date(2024, 1, 31),
        );
        let dates: Vec<NaiveDate> = occ.iter().map(|o| o.shift_date).collect();
        // 2024-01-01 is before start_date; eligible Mondays are week 2
        // and week 4 from the anchor week of Jan 1.
        assert_eq!(dates, vec![date(2024, 1, 15), date(2024, 1, 29)]);
    }

    #[test]
    fn test_cancel_exception_suppresses() {
        let mask = WeekdayMask(0).with(Weekday::Mon);
        let s = series(date(2024, 1, 1), mask, 1);
        let mut exceptions = HashMap::new();
        exceptions.insert(
            date(2024, 1, 8),
            exception(date(2024, 1, 8), ExceptionAction::Cancel, None, None),
        );
        let occ = expand_series(
            &s,
            &exceptions,
            &HashMap::new(),
            date(2024, 1, 1),
            date(2024, 1, 15),
        );
        let dates: Vec<NaiveDate> = occ.iter().map(|o| o.shift_date).collect();
        assert_eq!(dates, vec![date(2024, 1, 1), date(2024, 1, 15)]);
    }

    #[test]
    fn test_modify_exception_partial_override() {
        // Only new start_time given: base end_time and type are kept.
        let mask = WeekdayMask(0).with(Weekday::Mon);
        let s = series(date(2024, 1, 1), mask, 1);
        let mut exceptions = HashMap::new();
        exceptions.insert(
            date(2024, 1, 8),
            exception(
                date(2024, 1, 8),
                ExceptionAction::Modify,
                Some(time(11, 0)),
                None,
            ),
        );
        let occ = expand_series(
            &s,
            &exceptions,
            &HashMap::new(),
            date(2024, 1, 8),
            date(2024, 1, 8),
        );
        assert_eq!(occ.len(), 1);
        assert_eq!(occ[0].start_time, time(11, 0));
        assert_eq!(occ[0].end_time, time(17, 0));
        assert_eq!(occ[0].shift_type_id, 3);
    }

    #[test]
    fn test_modify_exception_inverted_override_suppresses() {
        // start moved past the base end: inconsistent, drop the day.
        let mask = WeekdayMask(0).with(Weekday::Mon);
        let s = series(date(2024, 1, 1), mask, 1);
        let mut exceptions = HashMap::new();
        exceptions.insert(
            date(2024, 1, 8),
            exception(
                date(2024, 1, 8),
                ExceptionAction::Modify,
                Some(time(18, 0)),
                None,
            ),
        );
        let occ = expand_series(
            &s,
            &exceptions,
            &HashMap::new(),
            date(2024, 1, 8),
            date(2024, 1, 8),
        );
        assert!(occ.is_empty());
    }

    #[test]
    fn test_explicit_shift_suppresses_generated_duplicate() {
        let mask = WeekdayMask(0).with(Weekday::Mon);
        let s = series(date(2024, 1, 1), mask, 1);
        let explicit = vec![shift(date(2024, 1, 8), time(9, 0), time(17, 0))];
        let index = index_by_date(&explicit);
        let occ = expand_series(
            &s,
            &HashMap::new(),
            &index,
            date(2024, 1, 1),
            date(2024, 1, 15),
        );
        let dates: Vec<NaiveDate> = occ.iter().map(|o| o.shift_date).collect();
        assert_eq!(dates, vec![date(2024, 1, 1), date(2024, 1, 15)]);

        let merged = merge_occurrences(explicit, occ);
        assert_eq!(merged.len(), 3);
        assert!(matches!(merged[1], Occurrence::Explicit(_)));
    }

    #[test]
    fn test_non_overlapping_explicit_coexists() {
        // An explicit evening shift does not suppress the generated
        // morning occurrence on the same date.
        let mask = WeekdayMask(0).with(Weekday::Mon);
        let s = series(date(2024, 1, 1), mask, 1);
        let explicit = vec![shift(date(2024, 1, 8), time(18, 0), time(22, 0))];
        let index = index_by_date(&explicit);
        let occ = expand_series(
            &s,
            &HashMap::new(),
            &index,
            date(2024, 1, 8),
            date(2024, 1, 8),
        );
        assert_eq!(occ.len(), 1);
    }

    #[test]
    fn test_window_clamped_to_series_validity() {
        let mask = WeekdayMask(0).with(Weekday::Mon);
        let mut s = series(date(2024, 1, 8), mask, 1);
        s.end_date = Some(date(2024, 1, 21));
        let occ = expand_series(
            &s,
            &HashMap::new(),
            &HashMap::new(),
            date(2024, 1, 1),
            date(2024, 2, 28),
        );
        let dates: Vec<NaiveDate> = occ.iter().map(|o| o.shift_date).collect();
        assert_eq!(dates, vec![date(2024, 1, 8), date(2024, 1, 15)]);
    }

    #[test]
    fn test_degenerate_rules_generate_nothing() {
        let mask = WeekdayMask(0).with(Weekday::Mon);

        let mut inverted = series(date(2024, 1, 1), mask, 1);
        inverted.end_time = time(8, 0);
        assert!(
            expand_series(
                &inverted,
                &HashMap::new(),
                &HashMap::new(),
                date(2024, 1, 1),
                date(2024, 1, 31),
            )
            .is_empty()
        );

        let empty_mask = series(date(2024, 1, 1), WeekdayMask(0), 1);
        assert!(
            expand_series(
                &empty_mask,
                &HashMap::new(),
                &HashMap::new(),
                date(2024, 1, 1),
                date(2024, 1, 31),
            )
            .is_empty()
        );

        let mut inactive = series(date(2024, 1, 1), mask, 1);
        inactive.active = false;
        assert!(
            expand_series(
                &inactive,
                &HashMap::new(),
                &HashMap::new(),
                date(2024, 1, 1),
                date(2024, 1, 31),
            )
            .is_empty()
        );
    }

    #[test]
    fn test_merge_sorted_by_date_then_start() {
        let explicit = vec![shift(date(2024, 1, 8), time(14, 0), time(18, 0))];
        let mask = WeekdayMask(0).with(Weekday::Mon);
        let s = series(date(2024, 1, 1), mask, 1);
        let generated = expand_series(
            &s,
            &HashMap::new(),
            &index_by_date(&explicit),
            date(2024, 1, 1),
            date(2024, 1, 8),
        );
        let merged = merge_occurrences(explicit, generated);
        let keys: Vec<(NaiveDate, NaiveTime)> = merged
            .iter()
            .map(|o| (o.shift_date(), o.start_time()))
            .collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }
}
