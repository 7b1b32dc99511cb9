use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::model::day_summary::ReconcileReport;
use crate::reconciler::{self, ClockError, ReconcileError, ReconcileQuery, WeekdayFilter, week_bounds};
use crate::store::AttendanceStore;
use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Widest window a single summary request may cover.
pub const MAX_RANGE_DAYS: i64 = 366;

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct WeekQuery {
    /// Whose week to show; defaults to the caller
    pub employee_id: Option<u64>,
    /// Any date inside the wanted week; defaults to today
    #[param(value_type = Option<String>, example = "2026-01-07")]
    pub week_of: Option<NaiveDate>,
    /// Saturdays and Sundays are left out unless set
    pub include_weekends: Option<bool>,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RangeQuery {
    /// Whose attendance to show; defaults to the caller
    pub employee_id: Option<u64>,
    #[param(value_type = String, example = "2026-01-04")]
    pub start: NaiveDate,
    #[param(value_type = String, example = "2026-01-10")]
    pub end: NaiveDate,
}

#[derive(Serialize, ToSchema)]
pub struct HealResponse {
    #[schema(example = 1000)]
    pub employee_id: u64,
    #[schema(example = 2)]
    pub healed: usize,
    #[schema(example = 0)]
    pub heal_failures: usize,
}

pub fn validate_window(start: NaiveDate, end: NaiveDate) -> Result<(), String> {
    if start > end {
        return Err("start cannot be after end".to_string());
    }
    if (end - start).num_days() >= MAX_RANGE_DAYS {
        return Err(format!("window cannot exceed {MAX_RANGE_DAYS} days"));
    }
    Ok(())
}

fn bad_request(message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "message": message.into() }))
}

fn fetch_failed(e: ReconcileError, employee_id: u64) -> actix_web::Error {
    tracing::error!(error = %e, employee_id, "Attendance reconciliation failed");
    actix_web::error::ErrorServiceUnavailable("Attendance data unavailable, try again")
}

/// Clock-in endpoint
#[utoipa::path(
    post,
    path = "/api/attendance/clock-in",
    responses(
        (status = 200, description = "Clocked in successfully", body = Object, example = json!({
            "message": "Clocked in successfully",
            "session_id": 42
        })),
        (status = 400, description = "A session is already open today", body = Object, example = json!({
            "message": "Already clocked in"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn clock_in<S: AttendanceStore + 'static>(
    auth: AuthUser,
    store: web::Data<S>,
    config: web::Data<Config>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.own_employee_id()?;

    match reconciler::clock_in(store.get_ref(), employee_id, config.local_now()).await {
        Ok(session_id) => {
            tracing::info!(
                employee_id,
                user_id = auth.user_id,
                username = %auth.username,
                session_id,
                "Clocked in"
            );
            Ok(HttpResponse::Ok().json(serde_json::json!({
                "message": "Clocked in successfully",
                "session_id": session_id
            })))
        }
        Err(ClockError::AlreadyClockedIn) => Ok(bad_request("Already clocked in")),
        Err(e) => {
            tracing::error!(error = %e, employee_id, "Clock-in failed");
            Err(actix_web::error::ErrorInternalServerError(
                "Internal Server Error",
            ))
        }
    }
}

/// Clock-out endpoint
#[utoipa::path(
    post,
    path = "/api/attendance/clock-out",
    responses(
        (status = 200, description = "Clocked out successfully", body = Object, example = json!({
            "message": "Clocked out successfully",
            "session_id": 42,
            "clock_out": "17:30:00",
            "total_hours": 8.5
        })),
        (status = 400, description = "No open session for today", body = Object, example = json!({
            "message": "No active clock-in found for today"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn clock_out<S: AttendanceStore + 'static>(
    auth: AuthUser,
    store: web::Data<S>,
    config: web::Data<Config>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.own_employee_id()?;

    match reconciler::clock_out(store.get_ref(), employee_id, config.local_now()).await {
        Ok(closed) => {
            tracing::info!(
                employee_id,
                user_id = auth.user_id,
                username = %auth.username,
                total_hours = closed.total_hours,
                "Clocked out"
            );
            Ok(HttpResponse::Ok().json(serde_json::json!({
                "message": "Clocked out successfully",
                "session_id": closed.session_id,
                "clock_out": closed.clock_out,
                "total_hours": closed.total_hours
            })))
        }
        Err(ClockError::NotClockedIn) => Ok(bad_request("No active clock-in found for today")),
        Err(e) => {
            tracing::error!(error = %e, employee_id, "Clock-out failed");
            Err(actix_web::error::ErrorInternalServerError(
                "Internal Server Error",
            ))
        }
    }
}

/// Weekly (Sunday to Saturday) attendance view
#[utoipa::path(
    get,
    path = "/api/attendance/week",
    params(WeekQuery),
    responses(
        (status = 200, description = "One summary per day of the week", body = ReconcileReport),
        (status = 400, description = "week_of has no complete week around it"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 503, description = "Attendance data could not be fetched")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn week_summary<S: AttendanceStore + 'static>(
    auth: AuthUser,
    store: web::Data<S>,
    config: web::Data<Config>,
    query: web::Query<WeekQuery>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.resolve_subject(query.employee_id)?;
    let now = config.local_now();

    let Some((start, end)) = week_bounds(query.week_of.unwrap_or(now.date())) else {
        return Ok(bad_request("week_of is out of range"));
    };
    let filter = if query.include_weekends.unwrap_or(false) {
        WeekdayFilter::none()
    } else {
        WeekdayFilter::weekends()
    };

    let report = reconciler::reconcile(
        store.get_ref(),
        &ReconcileQuery {
            employee_id,
            start,
            end,
            filter,
        },
        now,
    )
    .await
    .map_err(|e| fetch_failed(e, employee_id))?;

    Ok(HttpResponse::Ok().json(report))
}

/// Attendance summary over an arbitrary inclusive window
#[utoipa::path(
    get,
    path = "/api/attendance/summary",
    params(RangeQuery),
    responses(
        (status = 200, description = "One summary per day in the window", body = ReconcileReport),
        (status = 400, description = "Invalid window", body = Object, example = json!({
            "message": "start cannot be after end"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 503, description = "Attendance data could not be fetched")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn range_summary<S: AttendanceStore + 'static>(
    auth: AuthUser,
    store: web::Data<S>,
    config: web::Data<Config>,
    query: web::Query<RangeQuery>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.resolve_subject(query.employee_id)?;
    if let Err(message) = validate_window(query.start, query.end) {
        return Ok(bad_request(message));
    }

    let report = reconciler::reconcile(
        store.get_ref(),
        &ReconcileQuery {
            employee_id,
            start: query.start,
            end: query.end,
            filter: WeekdayFilter::none(),
        },
        config.local_now(),
    )
    .await
    .map_err(|e| fetch_failed(e, employee_id))?;

    Ok(HttpResponse::Ok().json(report))
}

/// Close stale sessions without building summaries
#[utoipa::path(
    post,
    path = "/api/attendance/heal",
    params(RangeQuery),
    responses(
        (status = 200, description = "Healing finished", body = HealResponse),
        (status = 400, description = "Invalid window"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 503, description = "Attendance data could not be fetched")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn heal_sessions<S: AttendanceStore + 'static>(
    auth: AuthUser,
    store: web::Data<S>,
    config: web::Data<Config>,
    query: web::Query<RangeQuery>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.resolve_subject(query.employee_id)?;
    if let Err(message) = validate_window(query.start, query.end) {
        return Ok(bad_request(message));
    }

    let outcome = reconciler::heal_subject(
        store.get_ref(),
        employee_id,
        query.start,
        query.end,
        config.local_now().date(),
    )
    .await
    .map_err(|e| fetch_failed(e, employee_id))?;

    Ok(HttpResponse::Ok().json(HealResponse {
        employee_id,
        healed: outcome.healed,
        heal_failures: outcome.failed,
    }))
}
