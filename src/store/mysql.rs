use chrono::{NaiveDate, NaiveTime};
use sqlx::MySqlPool;
use tracing::instrument;

use super::{AttendanceStore, StoreError};
use crate::model::{
    attendance::AttendanceSession,
    leave_request::{APPROVED, LeaveInterval},
};
use crate::reconciler::{ClosedSessionUpdate, PRESENT_STATUS};

const SESSION_COLUMNS: &str =
    "id, employee_id, date, clock_in, clock_out, total_hours, status";

/// `attendance`, `leave_requests` and `employees` tables over a shared pool.
#[derive(Clone)]
pub struct MySqlAttendanceStore {
    pool: MySqlPool,
}

impl MySqlAttendanceStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

impl AttendanceStore for MySqlAttendanceStore {
    #[instrument(skip(self))]
    async fn fetch_sessions(
        &self,
        employee_id: u64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<AttendanceSession>, StoreError> {
        let sql = format!(
            r#"
            SELECT {SESSION_COLUMNS}
            FROM attendance
            WHERE employee_id = ?
            AND date BETWEEN ? AND ?
            ORDER BY date, clock_in
            "#
        );

        let sessions = sqlx::query_as::<_, AttendanceSession>(&sql)
            .bind(employee_id)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await?;

        Ok(sessions)
    }

    #[instrument(skip(self))]
    async fn fetch_approved_leaves(
        &self,
        employee_id: u64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<LeaveInterval>, StoreError> {
        let leaves = sqlx::query_as::<_, LeaveInterval>(
            r#"
            SELECT id, employee_id, start_date, end_date, CAST(status AS CHAR) AS status
            FROM leave_requests
            WHERE employee_id = ?
            AND status = ?
            AND start_date <= ?
            AND end_date >= ?
            ORDER BY start_date
            "#,
        )
        .bind(employee_id)
        .bind(APPROVED)
        .bind(end)
        .bind(start)
        .fetch_all(&self.pool)
        .await?;

        Ok(leaves)
    }

    async fn fetch_join_date(&self, employee_id: u64) -> Result<Option<NaiveDate>, StoreError> {
        let hire_date = sqlx::query_scalar::<_, NaiveDate>(
            "SELECT hire_date FROM employees WHERE id = ?",
        )
        .bind(employee_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(hire_date)
    }

    async fn update_session(&self, update: &ClosedSessionUpdate) -> Result<u64, StoreError> {
        // Guarded on clock_out so a heal racing the subject's own clock-out loses.
        let result = sqlx::query(
            r#"
            UPDATE attendance
            SET clock_out = ?, total_hours = ?, status = ?
            WHERE id = ?
            AND clock_out IS NULL
            "#,
        )
        .bind(update.clock_out)
        .bind(update.total_hours)
        .bind(update.status)
        .bind(update.session_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn find_open_session(
        &self,
        employee_id: u64,
        date: NaiveDate,
    ) -> Result<Option<AttendanceSession>, StoreError> {
        let sql = format!(
            r#"
            SELECT {SESSION_COLUMNS}
            FROM attendance
            WHERE employee_id = ?
            AND date = ?
            AND clock_out IS NULL
            ORDER BY clock_in DESC
            LIMIT 1
            "#
        );

        let session = sqlx::query_as::<_, AttendanceSession>(&sql)
            .bind(employee_id)
            .bind(date)
            .fetch_optional(&self.pool)
            .await?;

        Ok(session)
    }

    async fn open_session(
        &self,
        employee_id: u64,
        date: NaiveDate,
        clock_in: NaiveTime,
    ) -> Result<Option<u64>, StoreError> {
        // Single statement, so two clock-ins racing cannot both see no open session.
        let result = sqlx::query(
            r#"
            INSERT INTO attendance (employee_id, date, clock_in)
            SELECT ?, ?, ?
            FROM DUAL
            WHERE NOT EXISTS (
                SELECT 1 FROM attendance
                WHERE employee_id = ?
                AND date = ?
                AND clock_out IS NULL
            )
            "#,
        )
        .bind(employee_id)
        .bind(date)
        .bind(clock_in)
        .bind(employee_id)
        .bind(date)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Ok(Some(result.last_insert_id()))
    }

    async fn close_session(
        &self,
        session_id: u64,
        clock_out: NaiveTime,
        total_hours: f64,
    ) -> Result<u64, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE attendance
            SET clock_out = ?, total_hours = ?, status = ?
            WHERE id = ?
            AND clock_out IS NULL
            "#,
        )
        .bind(clock_out)
        .bind(total_hours)
        .bind(PRESENT_STATUS)
        .bind(session_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
