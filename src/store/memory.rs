use std::collections::HashSet;
use std::sync::Mutex;

use chrono::{NaiveDate, NaiveTime};

use super::{AttendanceStore, StoreError};
use crate::model::{attendance::AttendanceSession, leave_request::LeaveInterval};
use crate::reconciler::{ClosedSessionUpdate, PRESENT_STATUS};

/// Test double with switchable failures.
#[derive(Default)]
pub struct MemoryStore {
    pub sessions: Mutex<Vec<AttendanceSession>>,
    pub leaves: Vec<LeaveInterval>,
    pub join_date: Option<NaiveDate>,
    pub fail_fetch: bool,
    pub failing_updates: HashSet<u64>,
    /// Sessions closed at 17:00 by their owner just before a heal lands.
    pub closed_elsewhere: HashSet<u64>,
    pub update_calls: Mutex<Vec<u64>>,
}

impl MemoryStore {
    pub fn with_sessions(sessions: Vec<AttendanceSession>) -> Self {
        Self {
            sessions: Mutex::new(sessions),
            ..Self::default()
        }
    }

    pub fn session(&self, id: u64) -> Option<AttendanceSession> {
        self.sessions.lock().unwrap().iter().find(|s| s.id == id).cloned()
    }

    fn check_fetch(&self) -> Result<(), StoreError> {
        if self.fail_fetch {
            return Err(StoreError::Unavailable("connection refused".into()));
        }
        Ok(())
    }
}

impl AttendanceStore for MemoryStore {
    async fn fetch_sessions(
        &self,
        employee_id: u64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<AttendanceSession>, StoreError> {
        self.check_fetch()?;
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.employee_id == employee_id && start <= s.date && s.date <= end)
            .cloned()
            .collect())
    }

    async fn fetch_approved_leaves(
        &self,
        employee_id: u64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<LeaveInterval>, StoreError> {
        self.check_fetch()?;
        Ok(self
            .leaves
            .iter()
            .filter(|l| {
                l.employee_id == employee_id && l.is_approved() && l.start_date <= end && l.end_date >= start
            })
            .cloned()
            .collect())
    }

    async fn fetch_join_date(&self, _employee_id: u64) -> Result<Option<NaiveDate>, StoreError> {
        self.check_fetch()?;
        Ok(self.join_date)
    }

    async fn update_session(&self, update: &ClosedSessionUpdate) -> Result<u64, StoreError> {
        self.update_calls.lock().unwrap().push(update.session_id);
        if self.failing_updates.contains(&update.session_id) {
            return Err(StoreError::Unavailable(format!("update {} timed out", update.session_id)));
        }

        let mut sessions = self.sessions.lock().unwrap();
        if self.closed_elsewhere.contains(&update.session_id) {
            if let Some(session) = sessions.iter_mut().find(|s| s.id == update.session_id && s.is_open()) {
                session.clock_out = NaiveTime::from_hms_opt(17, 0, 0);
                session.total_hours = Some(8.0);
                session.status = Some(PRESENT_STATUS.to_string());
            }
        }
        match sessions.iter_mut().find(|s| s.id == update.session_id && s.is_open()) {
            Some(session) => {
                update.apply_to(session);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn find_open_session(
        &self,
        employee_id: u64,
        date: NaiveDate,
    ) -> Result<Option<AttendanceSession>, StoreError> {
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.employee_id == employee_id && s.date == date && s.is_open())
            .max_by_key(|s| s.clock_in)
            .cloned())
    }

    async fn open_session(
        &self,
        employee_id: u64,
        date: NaiveDate,
        clock_in: NaiveTime,
    ) -> Result<Option<u64>, StoreError> {
        let mut sessions = self.sessions.lock().unwrap();
        if sessions
            .iter()
            .any(|s| s.employee_id == employee_id && s.date == date && s.is_open())
        {
            return Ok(None);
        }
        let id = sessions.iter().map(|s| s.id).max().unwrap_or(0) + 1;
        sessions.push(AttendanceSession {
            id,
            employee_id,
            date,
            clock_in: Some(clock_in),
            clock_out: None,
            total_hours: None,
            status: None,
        });
        Ok(Some(id))
    }

    async fn close_session(
        &self,
        session_id: u64,
        clock_out: NaiveTime,
        total_hours: f64,
    ) -> Result<u64, StoreError> {
        let mut sessions = self.sessions.lock().unwrap();
        match sessions.iter_mut().find(|s| s.id == session_id && s.is_open()) {
            Some(session) => {
                session.clock_out = Some(clock_out);
                session.total_hours = Some(total_hours);
                session.status = Some(PRESENT_STATUS.to_string());
                Ok(1)
            }
            None => Ok(0),
        }
    }
}
