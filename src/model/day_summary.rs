use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter};
use utoipa::ToSchema;

/// Classification of one calendar day, in precedence order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr, EnumIter, ToSchema,
)]
pub enum DayStatus {
    Upcoming,
    #[serde(rename = "Not Joined")]
    #[strum(serialize = "Not Joined")]
    NotJoined,
    #[serde(rename = "Active Now")]
    #[strum(serialize = "Active Now")]
    ActiveNow,
    #[serde(rename = "Auto-closing…")]
    #[strum(serialize = "Auto-closing…")]
    AutoClosing,
    Present,
    #[serde(rename = "On Leave")]
    #[strum(serialize = "On Leave")]
    OnLeave,
    Absent,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DaySummary {
    #[schema(example = "2026-01-05", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[schema(example = "Mon")]
    pub weekday: String,
    /// Rounded to two decimals
    #[schema(example = 7.5)]
    pub hours: f64,
    pub status: DayStatus,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReconcileReport {
    #[schema(example = 1000)]
    pub employee_id: u64,
    #[schema(example = "2026-01-04", format = "date", value_type = String)]
    pub start: NaiveDate,
    #[schema(example = "2026-01-10", format = "date", value_type = String)]
    pub end: NaiveDate,
    /// Stale sessions closed during this run
    #[schema(example = 1)]
    pub healed: usize,
    /// Stale sessions whose update failed; retried on the next run
    #[schema(example = 0)]
    pub heal_failures: usize,
    pub days: Vec<DaySummary>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn labels_match_dashboard_wording() {
        let labels: Vec<String> = DayStatus::iter().map(|s| s.to_string()).collect();
        assert_eq!(
            labels,
            vec![
                "Upcoming",
                "Not Joined",
                "Active Now",
                "Auto-closing…",
                "Present",
                "On Leave",
                "Absent"
            ]
        );
    }

    #[test]
    fn status_serializes_as_label() {
        let json = serde_json::to_string(&DayStatus::AutoClosing).unwrap();
        assert_eq!(json, "\"Auto-closing…\"");
        assert_eq!(DayStatus::OnLeave.as_ref(), "On Leave");
    }
}
