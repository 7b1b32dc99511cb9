use chrono::{NaiveDate, NaiveDateTime};
use derive_more::Display;
use futures::future::join_all;
use tracing::{debug, info, warn};

use super::{WeekdayFilter, dates_in_range, heal, summarize};
use crate::model::{attendance::AttendanceSession, day_summary::ReconcileReport};
use crate::store::{AttendanceStore, StoreError};

#[derive(Debug, Display)]
pub enum ReconcileError {
    #[display(fmt = "failed to fetch attendance data: {}", _0)]
    FetchFailed(StoreError),
}

impl std::error::Error for ReconcileError {}

#[derive(Debug, Clone)]
pub struct ReconcileQuery {
    pub employee_id: u64,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub filter: WeekdayFilter,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HealOutcome {
    pub healed: usize,
    pub failed: usize,
}

/// Heals stale sessions, then summarizes every day of the window that the
/// filter keeps. Nothing is aggregated if any read fails.
pub async fn reconcile<S: AttendanceStore>(
    store: &S,
    query: &ReconcileQuery,
    now: NaiveDateTime,
) -> Result<ReconcileReport, ReconcileError> {
    let (mut sessions, leaves, join_date) = futures::try_join!(
        store.fetch_sessions(query.employee_id, query.start, query.end),
        store.fetch_approved_leaves(query.employee_id, query.start, query.end),
        store.fetch_join_date(query.employee_id),
    )
    .map_err(ReconcileError::FetchFailed)?;

    let outcome = heal_in_place(store, &mut sessions, now.date()).await;

    let days = query
        .filter
        .apply(dates_in_range(query.start, query.end))
        .into_iter()
        .map(|date| summarize(date, &sessions, &leaves, join_date, now))
        .collect();

    Ok(ReconcileReport {
        employee_id: query.employee_id,
        start: query.start,
        end: query.end,
        healed: outcome.healed,
        heal_failures: outcome.failed,
        days,
    })
}

/// Healing on its own, without aggregation.
pub async fn heal_subject<S: AttendanceStore>(
    store: &S,
    employee_id: u64,
    start: NaiveDate,
    end: NaiveDate,
    today: NaiveDate,
) -> Result<HealOutcome, ReconcileError> {
    let mut sessions = store
        .fetch_sessions(employee_id, start, end)
        .await
        .map_err(ReconcileError::FetchFailed)?;

    Ok(heal_in_place(store, &mut sessions, today).await)
}

/// Issues every heal update at once and waits for all of them. Successful
/// updates are copied onto `sessions`; failed ones leave their session open
/// until the next run picks it up again.
async fn heal_in_place<S: AttendanceStore>(
    store: &S,
    sessions: &mut [AttendanceSession],
    today: NaiveDate,
) -> HealOutcome {
    let updates = heal(sessions, today);
    if updates.is_empty() {
        return HealOutcome::default();
    }

    let results = join_all(updates.iter().map(|u| store.update_session(u))).await;

    let mut outcome = HealOutcome::default();
    let mut closed_elsewhere = Vec::new();
    for (update, result) in updates.iter().zip(results) {
        match result {
            Ok(0) => {
                debug!(session_id = update.session_id, "Stale session was already closed");
                closed_elsewhere.push(update.session_id);
            }
            Ok(_) => {
                if let Some(session) = sessions.iter_mut().find(|s| s.id == update.session_id) {
                    update.apply_to(session);
                }
                outcome.healed += 1;
            }
            Err(e) => {
                warn!(error = %e, session_id = update.session_id, "Failed to auto-close stale session");
                outcome.failed += 1;
            }
        }
    }

    if !closed_elsewhere.is_empty() {
        refresh_sessions(store, sessions, &closed_elsewhere).await;
    }

    info!(healed = outcome.healed, failed = outcome.failed, "Stale sessions healed");
    outcome
}

/// Re-reads sessions whose heal affected no rows, so the summary sees the
/// clock-out that beat it. A failed re-read keeps the stale copy.
async fn refresh_sessions<S: AttendanceStore>(
    store: &S,
    sessions: &mut [AttendanceSession],
    ids: &[u64],
) {
    let targets: Vec<(u64, u64, NaiveDate)> = sessions
        .iter()
        .filter(|s| ids.contains(&s.id))
        .map(|s| (s.id, s.employee_id, s.date))
        .collect();

    let reads = join_all(
        targets
            .iter()
            .map(|(_, employee_id, date)| store.fetch_sessions(*employee_id, *date, *date)),
    )
    .await;

    for ((id, _, _), read) in targets.iter().zip(reads) {
        let fresh = match read {
            Ok(rows) => rows.into_iter().find(|s| s.id == *id),
            Err(e) => {
                warn!(error = %e, session_id = *id, "Failed to re-read session");
                continue;
            }
        };
        if let (Some(fresh), Some(slot)) = (fresh, sessions.iter_mut().find(|s| s.id == *id)) {
            *slot = fresh;
        }
    }
}
