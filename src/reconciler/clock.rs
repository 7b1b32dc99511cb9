use chrono::{NaiveDateTime, NaiveTime, Timelike};
use derive_more::Display;
use serde::Serialize;

use super::{hours_between, round_hours};
use crate::store::{AttendanceStore, StoreError};

#[derive(Debug, Display)]
pub enum ClockError {
    #[display(fmt = "already clocked in")]
    AlreadyClockedIn,
    #[display(fmt = "no open session for today")]
    NotClockedIn,
    Store(StoreError),
}

impl std::error::Error for ClockError {}

impl From<StoreError> for ClockError {
    fn from(e: StoreError) -> Self {
        ClockError::Store(e)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClosedSession {
    pub session_id: u64,
    pub clock_out: NaiveTime,
    pub total_hours: f64,
}

fn whole_seconds(now: NaiveDateTime) -> NaiveTime {
    now.time().with_nanosecond(0).unwrap_or(now.time())
}

/// Opens a new session dated today. A subject may hold several sessions per
/// day but only one open at a time.
pub async fn clock_in<S: AttendanceStore>(
    store: &S,
    employee_id: u64,
    now: NaiveDateTime,
) -> Result<u64, ClockError> {
    store
        .open_session(employee_id, now.date(), whole_seconds(now))
        .await?
        .ok_or(ClockError::AlreadyClockedIn)
}

/// Closes today's open session and records the hours worked so far.
pub async fn clock_out<S: AttendanceStore>(
    store: &S,
    employee_id: u64,
    now: NaiveDateTime,
) -> Result<ClosedSession, ClockError> {
    let today = now.date();
    let session = store
        .find_open_session(employee_id, today)
        .await?
        .ok_or(ClockError::NotClockedIn)?;

    let clock_out = whole_seconds(now);
    let total_hours = session
        .clock_in
        .map(|clock_in| {
            let hours = hours_between(today.and_time(clock_in), today.and_time(clock_out));
            round_hours(hours.max(0.0))
        })
        .unwrap_or(0.0);

    let affected = store.close_session(session.id, clock_out, total_hours).await?;
    if affected == 0 {
        return Err(ClockError::NotClockedIn);
    }

    Ok(ClosedSession {
        session_id: session.id,
        clock_out,
        total_hours,
    })
}
