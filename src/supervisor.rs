//! Runs one action attempt and decides whether its failure stays contained.
//!
//! ```text
//! job ─► Ok                ─► observer.on_success ─► Ok(Succeeded)
//!    ├─► Err(known, routine) ─► observer.on_failure ─► Ok(Skipped)
//!    ├─► Err(known)          ─► observer.on_failure ─► Ok(Failed)
//!    ├─► Err(unknown) ──────────────────────────────► Err(e)
//!    └─► panic        ─► Unexpected ────────────────► Err(e) unless Unexpected is known
//! ```

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;

use crate::actions::{ActionError, ActionErrorKind};
use crate::models::LifecycleEvent;

/// Hooks called by [`supervise`] for contained outcomes.
pub trait SuperviseObserver: Send + Sync {
    fn on_success(&self, _action: &str, _event: &LifecycleEvent) {}

    fn on_failure(&self, _action: &str, _event: &LifecycleEvent, _error: &ActionError) {}
}

/// Writes outcomes to the `log` facade. Timetable and staleness skips are
/// info, everything else is an error.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl SuperviseObserver for LogObserver {
    fn on_success(&self, action: &str, event: &LifecycleEvent) {
        log::info!("[{action}] {event}: done");
    }

    fn on_failure(&self, action: &str, event: &LifecycleEvent, error: &ActionError) {
        if error.is_routine() {
            log::info!("[{action}] {event}: skipped ({}: {error})", error.as_label());
        } else {
            log::error!("[{action}] {event}: failed ({}: {error})", error.as_label());
        }
    }
}

/// How a contained action attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Supervised {
    Succeeded,
    /// A gate turned the event away (timetable, staleness).
    Skipped,
    Failed,
}

/// Awaits `job` and classifies the result. Failures whose kind is not listed
/// in `known` are returned as `Err`.
pub async fn supervise<F>(
    action: &str,
    event: &LifecycleEvent,
    job: F,
    known: &[ActionErrorKind],
    observer: &dyn SuperviseObserver,
) -> Result<Supervised, ActionError>
where
    F: Future<Output = Result<(), ActionError>>,
{
    let result = match AssertUnwindSafe(job).catch_unwind().await {
        Ok(result) => result,
        Err(payload) => Err(ActionError::Unexpected(format!(
            "action panicked: {}",
            panic_message(payload.as_ref())
        ))),
    };

    match result {
        Ok(()) => {
            observer.on_success(action, event);
            Ok(Supervised::Succeeded)
        }
        Err(err) if known.contains(&err.kind()) => {
            observer.on_failure(action, event, &err);
            if err.is_routine() {
                Ok(Supervised::Skipped)
            } else {
                Ok(Supervised::Failed)
            }
        }
        Err(err) => Err(err),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
