//! Attendance reconciliation: closing sessions left open on past days and
//! folding a subject's sessions and leave into one summary per day.
//!
//! Everything except [`runner`] and [`clock`] is pure; the reference time is always passed
//! in by the caller.

pub mod clock;
pub mod heal;
pub mod range;
pub mod runner;
pub mod summary;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

pub use heal::{ClosedSessionUpdate, heal};
pub use clock::{ClockError, clock_in, clock_out};
pub use range::{WeekdayFilter, dates_in_range, week_bounds};
pub use runner::{ReconcileError, ReconcileQuery, heal_subject, reconcile};
pub use summary::summarize;

/// Synthetic clock-out written onto sessions nobody closed.
pub const AUTO_CLOSE_TIME: NaiveTime = match NaiveTime::from_hms_opt(23, 59, 0) {
    Some(t) => t,
    None => panic!("invalid auto-close time"),
};

pub const PRESENT_STATUS: &str = "present";

pub fn round_hours(hours: f64) -> f64 {
    (hours * 100.0).round() / 100.0
}

/// Signed hours from `start` to `end`.
pub fn hours_between(start: NaiveDateTime, end: NaiveDateTime) -> f64 {
    (end - start).num_milliseconds() as f64 / 3_600_000.0
}

pub fn auto_close_instant(date: NaiveDate) -> NaiveDateTime {
    date.and_time(AUTO_CLOSE_TIME)
}
