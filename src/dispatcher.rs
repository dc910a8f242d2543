//! Fans one lifecycle event out to every configured action.
//!
//! All actions for an event run concurrently on the current task and are joined
//! before `dispatch` returns; nothing is left running in the background.

use chrono::{DateTime, FixedOffset};
use futures::future::join_all;

use crate::actions::{Act, ActionError, ActionErrorKind};
use crate::models::LifecycleEvent;
use crate::supervisor::{supervise, SuperviseObserver, Supervised};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchReport {
    pub succeeded: usize,
    /// Turned away by a timetable or staleness gate; not a failure.
    pub skipped: usize,
    pub failed: usize,
}

impl DispatchReport {
    fn merge(&mut self, other: DispatchReport) {
        self.succeeded += other.succeeded;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }
}

/// Runs every action on `event` and waits for all of them.
///
/// Known action failures and gate skips are counted in the report. If any
/// action failed with an unknown kind, the first such error is returned after
/// the remaining actions have finished.
pub async fn dispatch<A: Act>(
    event: &LifecycleEvent,
    actions: &[A],
    now: DateTime<FixedOffset>,
    observer: &dyn SuperviseObserver,
) -> Result<DispatchReport, ActionError> {
    log::info!("Alert action enter: {event} ({} actions)", actions.len());

    let runs = actions.iter().map(|action| {
        supervise(
            action.label(),
            event,
            action.act(event, now),
            ActionErrorKind::KNOWN,
            observer,
        )
    });

    let mut report = DispatchReport::default();
    let mut unexpected = None;
    for result in join_all(runs).await {
        match result {
            Ok(Supervised::Succeeded) => report.succeeded += 1,
            Ok(Supervised::Skipped) => report.skipped += 1,
            Ok(Supervised::Failed) => report.failed += 1,
            Err(err) => {
                log::error!("Unrecoverable action failure on {event}: {err}");
                unexpected.get_or_insert(err);
            }
        }
    }

    log::info!(
        "Alert action exit: {event} ({} ok, {} skipped, {} failed)",
        report.succeeded,
        report.skipped,
        report.failed
    );

    match unexpected {
        Some(err) => Err(err),
        None => Ok(report),
    }
}

/// Dispatches `events` one after another, in order.
pub async fn dispatch_all<A: Act>(
    events: &[LifecycleEvent],
    actions: &[A],
    now: DateTime<FixedOffset>,
    observer: &dyn SuperviseObserver,
) -> Result<DispatchReport, ActionError> {
    let mut total = DispatchReport::default();
    for event in events {
        total.merge(dispatch(event, actions, now, observer).await?);
    }
    Ok(total)
}
