use chrono::{NaiveDate, NaiveDateTime};

use super::{auto_close_instant, hours_between, round_hours};
use crate::model::{
    attendance::AttendanceSession,
    day_summary::{DayStatus, DaySummary},
    leave_request::LeaveInterval,
};

/// Folds every session attributed to `date` into one summary.
///
/// `now` is the reference instant in the subject's local time; its date is
/// "today". Open sessions on today count up to `now`, open sessions on any
/// other day count up to the auto-close cutoff. Sessions without a clock-in
/// contribute nothing.
pub fn summarize(
    date: NaiveDate,
    sessions: &[AttendanceSession],
    leaves: &[LeaveInterval],
    join_date: Option<NaiveDate>,
    now: NaiveDateTime,
) -> DaySummary {
    let today = now.date();
    let day_sessions: Vec<&AttendanceSession> = sessions.iter().filter(|s| s.date == date).collect();
    let leave = leaves.iter().find(|l| l.is_approved() && l.covers(date));

    let mut hours = 0.0;
    let mut any_active = false;

    for session in &day_sessions {
        match (session.clock_in, session.clock_out) {
            (_, Some(_)) => hours += session.total_hours.unwrap_or(0.0),
            (Some(clock_in), None) => {
                let start = date.and_time(clock_in);
                let end = if date == today {
                    any_active = true;
                    now
                } else {
                    auto_close_instant(date)
                };
                hours += hours_between(start, end).max(0.0);
            }
            (None, None) => {}
        }
    }

    let status = if date > today {
        DayStatus::Upcoming
    } else if join_date.is_some_and(|joined| date < joined) {
        DayStatus::NotJoined
    } else if !day_sessions.is_empty() {
        if any_active {
            DayStatus::ActiveNow
        } else if date != today && day_sessions.iter().any(|s| s.is_open()) {
            DayStatus::AutoClosing
        } else {
            DayStatus::Present
        }
    } else if leave.is_some() {
        DayStatus::OnLeave
    } else {
        DayStatus::Absent
    };

    DaySummary {
        date,
        weekday: date.format("%a").to_string(),
        hours: round_hours(hours),
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconciler::heal;
    use chrono::{Duration, NaiveTime};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    // Wednesday 2024-01-10, 15:00 local
    fn now() -> NaiveDateTime {
        date(2024, 1, 10).and_hms_opt(15, 0, 0).unwrap()
    }

    fn closed(id: u64, on: NaiveDate, hours: f64) -> AttendanceSession {
        AttendanceSession {
            id,
            employee_id: 7,
            date: on,
            clock_in: Some(time(9, 0)),
            clock_out: Some(time(17, 0)),
            total_hours: Some(hours),
            status: Some("present".into()),
        }
    }

    fn open(id: u64, on: NaiveDate, clock_in: Option<NaiveTime>) -> AttendanceSession {
        AttendanceSession {
            id,
            employee_id: 7,
            date: on,
            clock_in,
            clock_out: None,
            total_hours: None,
            status: None,
        }
    }

    fn leave(from: NaiveDate, to: NaiveDate, status: &str) -> LeaveInterval {
        LeaveInterval {
            id: 1,
            employee_id: 7,
            start_date: from,
            end_date: to,
            status: status.into(),
        }
    }

    #[test]
    fn future_dates_are_upcoming_whatever_the_data() {
        let tomorrow = date(2024, 1, 11);
        let sessions = vec![closed(1, tomorrow, 3.0)];
        let leaves = vec![leave(tomorrow, tomorrow, "Approved")];

        let summary = summarize(tomorrow, &sessions, &leaves, Some(date(2030, 1, 1)), now());
        assert_eq!(summary.status, DayStatus::Upcoming);
    }

    #[test]
    fn days_before_joining_are_not_joined() {
        let day = date(2024, 1, 8);
        let sessions = vec![closed(1, day, 3.0)];

        let summary = summarize(day, &sessions, &[], Some(date(2024, 1, 9)), now());
        assert_eq!(summary.status, DayStatus::NotJoined);
        assert_eq!(summary.hours, 3.0);

        let joined = summarize(date(2024, 1, 9), &[], &[], Some(date(2024, 1, 9)), now());
        assert_eq!(joined.status, DayStatus::Absent);
    }

    #[test]
    fn empty_day_is_absent() {
        // Sunday still classifies normally
        let summary = summarize(date(2024, 1, 7), &[], &[], None, now());
        assert_eq!(summary.status, DayStatus::Absent);
        assert_eq!(summary.hours, 0.0);
        assert_eq!(summary.weekday, "Sun");
    }

    #[test]
    fn closed_sessions_are_summed_verbatim() {
        let day = date(2024, 1, 9);
        let sessions = vec![closed(1, day, 3.0), closed(2, day, 4.5), closed(3, date(2024, 1, 8), 8.0)];

        let summary = summarize(day, &sessions, &[], None, now());
        assert_eq!(summary.hours, 7.5);
        assert_eq!(summary.status, DayStatus::Present);
        assert_eq!(summary.weekday, "Tue");
    }

    #[test]
    fn closed_session_without_hours_counts_zero() {
        let day = date(2024, 1, 9);
        let mut session = closed(1, day, 0.0);
        session.total_hours = None;

        let summary = summarize(day, &[session], &[], None, now());
        assert_eq!(summary.hours, 0.0);
        assert_eq!(summary.status, DayStatus::Present);
    }

    #[test]
    fn open_session_today_is_active() {
        let clock_in = (now() - Duration::hours(2)).time();
        let sessions = vec![open(1, now().date(), Some(clock_in))];

        let summary = summarize(now().date(), &sessions, &[], None, now());
        assert_eq!(summary.status, DayStatus::ActiveNow);
        assert!((summary.hours - 2.0).abs() < 0.01);
    }

    #[test]
    fn active_session_adds_to_closed_ones() {
        let today = now().date();
        let sessions = vec![closed(1, today, 3.25), open(2, today, Some(time(14, 0)))];

        let summary = summarize(today, &sessions, &[], None, now());
        assert_eq!(summary.status, DayStatus::ActiveNow);
        assert_eq!(summary.hours, 4.25);
    }

    #[test]
    fn clock_in_after_now_contributes_nothing() {
        let today = now().date();
        let sessions = vec![open(1, today, Some(time(16, 0)))];

        let summary = summarize(today, &sessions, &[], None, now());
        assert_eq!(summary.status, DayStatus::ActiveNow);
        assert_eq!(summary.hours, 0.0);
    }

    #[test]
    fn unhealed_past_session_is_auto_closing() {
        let yesterday = date(2024, 1, 9);
        let sessions = vec![open(1, yesterday, Some(time(9, 0)))];

        let summary = summarize(yesterday, &sessions, &[], None, now());
        assert_eq!(summary.status, DayStatus::AutoClosing);
        assert_eq!(summary.hours, 14.98);
    }

    #[test]
    fn healed_past_session_is_present() {
        let yesterday = date(2024, 1, 9);
        let mut sessions = vec![open(1, yesterday, Some(time(9, 0)))];

        for update in heal(&sessions, now().date()) {
            update.apply_to(&mut sessions[0]);
        }

        let summary = summarize(yesterday, &sessions, &[], None, now());
        assert_eq!(sessions[0].clock_out, Some(time(23, 59)));
        assert_eq!(sessions[0].total_hours, Some(14.98));
        assert_eq!(summary.status, DayStatus::Present);
        assert_eq!(summary.hours, 14.98);
    }

    #[test]
    fn open_session_without_clock_in_never_faults() {
        let today = now().date();
        let past = date(2024, 1, 9);
        let sessions = vec![open(1, today, None), open(2, past, None), closed(3, past, 2.0)];

        let today_summary = summarize(today, &sessions, &[], None, now());
        assert_eq!(today_summary.status, DayStatus::Present);
        assert_eq!(today_summary.hours, 0.0);

        let past_summary = summarize(past, &sessions, &[], None, now());
        assert_eq!(past_summary.status, DayStatus::AutoClosing);
        assert_eq!(past_summary.hours, 2.0);
    }

    #[test]
    fn approved_leave_marks_empty_day() {
        let day = date(2024, 1, 9);
        let leaves = vec![leave(date(2024, 1, 8), date(2024, 1, 12), "Approved")];

        let summary = summarize(day, &[], &leaves, None, now());
        assert_eq!(summary.status, DayStatus::OnLeave);
        assert_eq!(summary.hours, 0.0);
    }

    #[test]
    fn leave_bounds_are_inclusive_and_status_must_be_approved() {
        let leaves = vec![
            leave(date(2024, 1, 2), date(2024, 1, 3), "pending"),
            leave(date(2024, 1, 4), date(2024, 1, 5), "approved"),
        ];

        assert_eq!(summarize(date(2024, 1, 2), &[], &leaves, None, now()).status, DayStatus::Absent);
        assert_eq!(summarize(date(2024, 1, 4), &[], &leaves, None, now()).status, DayStatus::OnLeave);
        assert_eq!(summarize(date(2024, 1, 5), &[], &leaves, None, now()).status, DayStatus::OnLeave);
        assert_eq!(summarize(date(2024, 1, 6), &[], &leaves, None, now()).status, DayStatus::Absent);
    }

    #[test]
    fn sessions_take_precedence_over_leave() {
        let day = date(2024, 1, 9);
        let sessions = vec![closed(1, day, 1.5)];
        let leaves = vec![leave(day, day, "Approved")];

        let summary = summarize(day, &sessions, &leaves, None, now());
        assert_eq!(summary.status, DayStatus::Present);
        assert_eq!(summary.hours, 1.5);
    }
}
