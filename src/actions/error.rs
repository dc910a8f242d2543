//! Failures an action can report back to the supervisor.
//!
//! [`ActionErrorKind`] is the flat discriminant the supervisor matches against
//! its known set; anything outside that set is let through to the caller.

use std::io;

use thiserror::Error;

use crate::models::{AlertEventKind, AlertType};

#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ActionError {
    /// Current instant is outside the action's timetable.
    #[error("out of timetable")]
    OutOfTimetable,

    /// The transition is older than the action's `skip_interval`.
    #[error("event is {age_secs}s old, limit is {limit_secs}s")]
    Stale { age_secs: i64, limit_secs: u64 },

    /// No mapping entry for this alert type and event kind.
    #[error("alert type ({alert_type}) not configured for {kind}")]
    AlertTypeNotConfigured {
        alert_type: AlertType,
        kind: AlertEventKind,
    },

    /// No window matched the configured title.
    #[error("window '{window}' not found")]
    WindowNotFound { window: String },

    /// The automation tool or command ran but reported failure.
    #[error("automation failed: {0}")]
    Automation(String),

    /// Local I/O failed (spawning a process, copying a file).
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    /// Anything the action did not anticipate, including panics.
    #[error("unexpected failure: {0}")]
    Unexpected(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionErrorKind {
    OutOfTimetable,
    Stale,
    AlertTypeNotConfigured,
    WindowNotFound,
    Automation,
    Io,
    Unexpected,
}

impl ActionErrorKind {
    /// Failures the dispatcher absorbs: everything but `Unexpected`.
    pub const KNOWN: &'static [ActionErrorKind] = &[
        ActionErrorKind::OutOfTimetable,
        ActionErrorKind::Stale,
        ActionErrorKind::AlertTypeNotConfigured,
        ActionErrorKind::WindowNotFound,
        ActionErrorKind::Automation,
        ActionErrorKind::Io,
    ];
}

impl ActionError {
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        ActionError::Io {
            context: context.into(),
            source,
        }
    }

    pub fn kind(&self) -> ActionErrorKind {
        match self {
            ActionError::OutOfTimetable => ActionErrorKind::OutOfTimetable,
            ActionError::Stale { .. } => ActionErrorKind::Stale,
            ActionError::AlertTypeNotConfigured { .. } => ActionErrorKind::AlertTypeNotConfigured,
            ActionError::WindowNotFound { .. } => ActionErrorKind::WindowNotFound,
            ActionError::Automation(_) => ActionErrorKind::Automation,
            ActionError::Io { .. } => ActionErrorKind::Io,
            ActionError::Unexpected(_) => ActionErrorKind::Unexpected,
        }
    }

    /// Short stable label (snake_case) for log lines.
    pub fn as_label(&self) -> &'static str {
        match self {
            ActionError::OutOfTimetable => "out_of_timetable",
            ActionError::Stale { .. } => "stale_event",
            ActionError::AlertTypeNotConfigured { .. } => "alert_type_not_configured",
            ActionError::WindowNotFound { .. } => "window_not_found",
            ActionError::Automation(_) => "automation_failed",
            ActionError::Io { .. } => "io_failed",
            ActionError::Unexpected(_) => "unexpected",
        }
    }

    /// Expected skips rather than faults; logged at info.
    pub fn is_routine(&self) -> bool {
        matches!(self, ActionError::OutOfTimetable | ActionError::Stale { .. })
    }
}
