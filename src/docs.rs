use crate::api::attendance::HealResponse;
use crate::model::attendance::AttendanceSession;
use crate::model::day_summary::{DayStatus, DaySummary, ReconcileReport};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Talent Ops Attendance API",
        version = "1.0.0",
        description = r#"
## Attendance Reconciliation

Clock-in/clock-out capture and per-day attendance summaries for the
employee, team lead, manager and executive dashboards.

### 🔹 Key Features
- **Sessions**
  - Several clock-in/clock-out sessions per day, summed into one figure
- **Self-healing**
  - Sessions left open on a past day are closed at 23:59:00 on every read
- **Summaries**
  - Weekly (Sunday to Saturday) and arbitrary-window views with a status
    per day: Upcoming, Not Joined, Active Now, Auto-closing…, Present,
    On Leave, Absent

### 🔐 Security
All endpoints require a **JWT Bearer** access token. Employees see their own
attendance; team leads, managers, executives, HR and admins may pass
`employee_id` to see someone else's.

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::attendance::clock_in,
        crate::api::attendance::clock_out,
        crate::api::attendance::week_summary,
        crate::api::attendance::range_summary,
        crate::api::attendance::heal_sessions
    ),
    components(
        schemas(
            AttendanceSession,
            DayStatus,
            DaySummary,
            ReconcileReport,
            HealResponse
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "Attendance", description = "Attendance capture and reconciliation APIs"),
    )
)]
pub struct ApiDoc;
