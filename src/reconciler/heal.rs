use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

use super::{AUTO_CLOSE_TIME, PRESENT_STATUS, auto_close_instant, hours_between, round_hours};
use crate::model::attendance::AttendanceSession;

/// The write that closes one stale session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClosedSessionUpdate {
    pub session_id: u64,
    pub clock_out: NaiveTime,
    pub total_hours: f64,
    pub status: &'static str,
}

impl ClosedSessionUpdate {
    pub fn apply_to(&self, session: &mut AttendanceSession) {
        session.clock_out = Some(self.clock_out);
        session.total_hours = Some(self.total_hours);
        session.status = Some(self.status.to_string());
    }
}

/// Open and dated before `today`.
pub fn is_stale(session: &AttendanceSession, today: NaiveDate) -> bool {
    session.date < today && session.is_open()
}

/// Computes the closing update for every stale session. Sessions dated
/// `today` or later are left alone whether open or not.
pub fn heal(sessions: &[AttendanceSession], today: NaiveDate) -> Vec<ClosedSessionUpdate> {
    sessions
        .iter()
        .filter(|s| is_stale(s, today))
        .map(|s| {
            // A session with no clock-in still gets closed, it just carries no time.
            let total_hours = s
                .clock_in
                .map(|clock_in| {
                    let hours = hours_between(s.date.and_time(clock_in), auto_close_instant(s.date));
                    round_hours(hours.max(0.0))
                })
                .unwrap_or(0.0);

            ClosedSessionUpdate {
                session_id: s.id,
                clock_out: AUTO_CLOSE_TIME,
                total_hours,
                status: PRESENT_STATUS,
            }
        })
        .collect()
}
