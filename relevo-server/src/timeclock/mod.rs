//! Time-punch session reconstruction
//!
//! Replays an ordered punch log into closed work sessions with net
//! duration. Transient state machine, recomputed on every query;
//! nothing here is persisted.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use shared::models::{PunchType, TimePunch};

/// One closed IN→OUT session. Timestamps carry the caller's timezone;
/// the session date is the local calendar date of the IN, so a
/// midnight-crossing session belongs entirely to its start day.
#[derive(Debug, Clone, Serialize)]
pub struct WorkSession {
    pub date: NaiveDate,
    #[serde(rename = "in")]
    pub clock_in: DateTime<Tz>,
    #[serde(rename = "out")]
    pub clock_out: DateTime<Tz>,
    pub gross_seconds: i64,
    pub break_seconds: i64,
    pub net_seconds: i64,
}

/// Aggregated summary over a query window
#[derive(Debug, Clone, Serialize)]
pub struct PunchSummary {
    pub days_worked: usize,
    pub total_seconds: i64,
    /// Net hours rounded to 2 decimals
    pub total_hours: f64,
    /// `"{h}h {m}m"`
    pub human_total: String,
    pub sessions: Vec<WorkSession>,
}

/// Convert a local date window `[from, to]` (both inclusive) into the
/// half-open UTC instant range `[from 00:00, (to+1) 00:00)`.
pub fn local_window_utc(from: NaiveDate, to: NaiveDate, tz: Tz) -> (DateTime<Utc>, DateTime<Utc>) {
    (day_start_utc(from, tz), day_start_utc(to + Duration::days(1), tz))
}

/// Local midnight of `date` as a UTC instant.
///
/// DST gap fallback: if local midnight does not exist, take the latest
/// candidate, then plain UTC.
fn day_start_utc(date: NaiveDate, tz: Tz) -> DateTime<Utc> {
    let naive = date.and_time(NaiveTime::MIN);
    tz.from_local_datetime(&naive)
        .latest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| naive.and_utc())
}

/// Replay `punches` (ascending by timestamp) into closed sessions.
///
/// - IN while a session is open discards the unfinished session (no
///   OUT was ever recorded) and starts fresh.
/// - BREAK_START only registers while working; BREAK_END only while
///   on break, accruing only positive intervals.
/// - OUT closes an open break at the OUT instant, then emits the
///   session iff net duration > 0.
pub fn reconstruct_sessions(punches: &[TimePunch], tz: Tz) -> Vec<WorkSession> {
    let mut sessions = Vec::new();
    let mut current_in: Option<DateTime<Utc>> = None;
    let mut break_start: Option<DateTime<Utc>> = None;
    let mut total_break = Duration::zero();

    for punch in punches {
        match punch.punch_type {
            PunchType::In => {
                current_in = Some(punch.punched_at);
                break_start = None;
                total_break = Duration::zero();
            }
            PunchType::BreakStart => {
                if current_in.is_some() && break_start.is_none() {
                    break_start = Some(punch.punched_at);
                }
            }
            PunchType::BreakEnd => {
                if current_in.is_some()
                    && let Some(bs) = break_start
                {
                    if punch.punched_at > bs {
                        total_break += punch.punched_at - bs;
                    }
                    break_start = None;
                }
            }
            PunchType::Out => {
                if let Some(clock_in) = current_in {
                    if let Some(bs) = break_start
                        && punch.punched_at > bs
                    {
                        total_break += punch.punched_at - bs;
                    }

                    let gross = punch.punched_at - clock_in;
                    let net = gross - total_break;
                    if net > Duration::zero() {
                        let in_local = clock_in.with_timezone(&tz);
                        sessions.push(WorkSession {
                            date: in_local.date_naive(),
                            clock_in: in_local,
                            clock_out: punch.punched_at.with_timezone(&tz),
                            gross_seconds: gross.num_seconds(),
                            break_seconds: total_break.num_seconds(),
                            net_seconds: net.num_seconds(),
                        });
                    }

                    current_in = None;
                    break_start = None;
                    total_break = Duration::zero();
                }
            }
        }
    }

    sessions
}

/// Reconstruct sessions and aggregate the totals.
pub fn summarize(punches: &[TimePunch], tz: Tz) -> PunchSummary {
    let sessions = reconstruct_sessions(punches, tz);
    let total_seconds: i64 = sessions.iter().map(|s| s.net_seconds).sum();
    let total_hours = (total_seconds as f64 / 3600.0 * 100.0).round() / 100.0;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;

    PunchSummary {
        days_worked: sessions.len(),
        total_seconds,
        total_hours,
        human_total: format!("{hours}h {minutes}m"),
        sessions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MADRID: Tz = chrono_tz::Europe::Madrid;

    fn punch(id: i64, punch_type: PunchType, at: &str) -> TimePunch {
        TimePunch {
            id,
            employee_id: 1,
            punch_type,
            punched_at: at.parse().unwrap(),
            note: None,
        }
    }

    #[test]
    fn test_plain_day_with_break() {
        // IN 09:00, BREAK 12:00-12:30, OUT 17:00 (Madrid winter, UTC+1)
        let punches = vec![
            punch(1, PunchType::In, "2024-02-05T08:00:00Z"),
            punch(2, PunchType::BreakStart, "2024-02-05T11:00:00Z"),
            punch(3, PunchType::BreakEnd, "2024-02-05T11:30:00Z"),
            punch(4, PunchType::Out, "2024-02-05T16:00:00Z"),
        ];
        let summary = summarize(&punches, MADRID);
        assert_eq!(summary.days_worked, 1);
        let s = &summary.sessions[0];
        assert_eq!(s.gross_seconds, 8 * 3600);
        assert_eq!(s.break_seconds, 30 * 60);
        assert_eq!(s.net_seconds, 7 * 3600 + 30 * 60);
        assert_eq!(summary.total_hours, 7.5);
        assert_eq!(summary.human_total, "7h 30m");
    }

    #[test]
    fn test_midnight_crossing_session_attributed_to_start_day() {
        let punches = vec![
            punch(1, PunchType::In, "2024-02-05T21:00:00Z"),
            punch(2, PunchType::Out, "2024-02-06T04:00:00Z"),
        ];
        let sessions = reconstruct_sessions(&punches, MADRID);
        assert_eq!(sessions.len(), 1);
        // 22:00 local on the 5th through 05:00 on the 6th
        assert_eq!(sessions[0].date, NaiveDate::from_ymd_opt(2024, 2, 5).unwrap());
        assert_eq!(sessions[0].net_seconds, 7 * 3600);
    }

    #[test]
    fn test_dangling_in_discarded_by_next_in() {
        let punches = vec![
            punch(1, PunchType::In, "2024-02-05T08:00:00Z"),
            // no OUT: malformed log, session dropped
            punch(2, PunchType::In, "2024-02-06T08:00:00Z"),
            punch(3, PunchType::Out, "2024-02-06T16:00:00Z"),
        ];
        let sessions = reconstruct_sessions(&punches, MADRID);
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].date, NaiveDate::from_ymd_opt(2024, 2, 6).unwrap());
    }

    #[test]
    fn test_break_punches_outside_session_ignored() {
        let punches = vec![
            punch(1, PunchType::BreakStart, "2024-02-05T07:00:00Z"),
            punch(2, PunchType::BreakEnd, "2024-02-05T07:10:00Z"),
            punch(3, PunchType::In, "2024-02-05T08:00:00Z"),
            // second BREAK_START while one is open: ignored
            punch(4, PunchType::BreakStart, "2024-02-05T11:00:00Z"),
            punch(5, PunchType::BreakStart, "2024-02-05T11:05:00Z"),
            punch(6, PunchType::BreakEnd, "2024-02-05T11:30:00Z"),
            punch(7, PunchType::Out, "2024-02-05T16:00:00Z"),
        ];
        let sessions = reconstruct_sessions(&punches, MADRID);
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].break_seconds, 30 * 60);
    }

    #[test]
    fn test_open_break_closed_at_out() {
        let punches = vec![
            punch(1, PunchType::In, "2024-02-05T08:00:00Z"),
            punch(2, PunchType::BreakStart, "2024-02-05T15:00:00Z"),
            punch(3, PunchType::Out, "2024-02-05T16:00:00Z"),
        ];
        let sessions = reconstruct_sessions(&punches, MADRID);
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].break_seconds, 3600);
        assert_eq!(sessions[0].net_seconds, 7 * 3600);
    }

    #[test]
    fn test_out_without_in_is_noop() {
        let punches = vec![punch(1, PunchType::Out, "2024-02-05T16:00:00Z")];
        assert!(reconstruct_sessions(&punches, MADRID).is_empty());
    }

    #[test]
    fn test_zero_net_session_not_emitted() {
        // Break swallows the whole session
        let punches = vec![
            punch(1, PunchType::In, "2024-02-05T08:00:00Z"),
            punch(2, PunchType::BreakStart, "2024-02-05T08:00:00Z"),
            punch(3, PunchType::BreakEnd, "2024-02-05T16:00:00Z"),
            punch(4, PunchType::Out, "2024-02-05T16:00:00Z"),
        ];
        assert!(reconstruct_sessions(&punches, MADRID).is_empty());
    }

    #[test]
    fn test_local_window_is_half_open_utc() {
        let from = NaiveDate::from_ymd_opt(2024, 2, 5).unwrap();
        let to = NaiveDate::from_ymd_opt(2024, 2, 6).unwrap();
        let (start, end) = local_window_utc(from, to, MADRID);
        // Madrid is UTC+1 in February
        assert_eq!(start, "2024-02-04T23:00:00Z".parse::<DateTime<Utc>>().unwrap());
        assert_eq!(end, "2024-02-06T23:00:00Z".parse::<DateTime<Utc>>().unwrap());
    }

    #[test]
    fn test_summary_empty_window() {
        let summary = summarize(&[], MADRID);
        assert_eq!(summary.days_worked, 0);
        assert_eq!(summary.total_seconds, 0);
        assert_eq!(summary.human_total, "0h 0m");
    }
}
