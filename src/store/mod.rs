//! Persistence seam for the reconciler.

pub mod mysql;

#[cfg(test)]
pub mod memory;

use chrono::{NaiveDate, NaiveTime};
use derive_more::Display;

use crate::model::{attendance::AttendanceSession, leave_request::LeaveInterval};
use crate::reconciler::ClosedSessionUpdate;

pub use mysql::MySqlAttendanceStore;

#[derive(Debug, Display)]
pub enum StoreError {
    #[display(fmt = "database error: {}", _0)]
    Database(sqlx::Error),
    #[display(fmt = "store unavailable: {}", _0)]
    Unavailable(String),
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StoreError::Unavailable(e.to_string())
            }
            e => StoreError::Database(e),
        }
    }
}

/// Reads and writes the reconciler needs from whatever backs attendance.
///
/// Futures returned here are awaited on the actix worker that created them,
/// so they carry no `Send` bound.
#[allow(async_fn_in_trait)]
pub trait AttendanceStore {
    /// Sessions attributed to `[start, end]`, in any order.
    async fn fetch_sessions(
        &self,
        employee_id: u64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<AttendanceSession>, StoreError>;

    /// Approved leave overlapping `[start, end]`.
    async fn fetch_approved_leaves(
        &self,
        employee_id: u64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<LeaveInterval>, StoreError>;

    async fn fetch_join_date(&self, employee_id: u64) -> Result<Option<NaiveDate>, StoreError>;

    /// Returns rows affected.
    async fn update_session(&self, update: &ClosedSessionUpdate) -> Result<u64, StoreError>;

    async fn find_open_session(
        &self,
        employee_id: u64,
        date: NaiveDate,
    ) -> Result<Option<AttendanceSession>, StoreError>;

    /// Inserts a session unless one is already open for that day. Returns the
    /// new session id, or `None` when an open session blocked the insert.
    async fn open_session(
        &self,
        employee_id: u64,
        date: NaiveDate,
        clock_in: NaiveTime,
    ) -> Result<Option<u64>, StoreError>;

    /// Closes a session the subject ended themselves. Returns rows affected.
    async fn close_session(
        &self,
        session_id: u64,
        clock_out: NaiveTime,
        total_hours: f64,
    ) -> Result<u64, StoreError>;
}
