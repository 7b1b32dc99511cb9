use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One clock-in/clock-out row of the `attendance` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceSession {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 1000)]
    pub employee_id: u64,
    #[schema(example = "2026-01-05", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[schema(example = "09:00:00", value_type = Option<String>)]
    pub clock_in: Option<NaiveTime>,
    /// Absent while the session is open
    #[schema(example = "17:30:00", value_type = Option<String>)]
    pub clock_out: Option<NaiveTime>,
    #[schema(example = 8.5)]
    pub total_hours: Option<f64>,
    #[schema(example = "present")]
    pub status: Option<String>,
}

impl AttendanceSession {
    pub fn is_open(&self) -> bool {
        self.clock_out.is_none()
    }
}
