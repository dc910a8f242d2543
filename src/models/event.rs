use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Alert;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AlertEventKind {
    Start,
    End,
}

impl AlertEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertEventKind::Start => "start",
            AlertEventKind::End => "end",
        }
    }
}

impl fmt::Display for AlertEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Start or end of an alert, derived by diffing two snapshots.
///
/// `observed_at` is the region `lastUpdate` of the snapshot that produced the
/// transition. Events are never persisted.
#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleEvent {
    AlertStart {
        alert: Alert,
        observed_at: DateTime<Utc>,
    },
    AlertEnd {
        alert: Alert,
        observed_at: DateTime<Utc>,
    },
}

impl LifecycleEvent {
    pub fn kind(&self) -> AlertEventKind {
        match self {
            LifecycleEvent::AlertStart { .. } => AlertEventKind::Start,
            LifecycleEvent::AlertEnd { .. } => AlertEventKind::End,
        }
    }

    pub fn alert(&self) -> &Alert {
        match self {
            LifecycleEvent::AlertStart { alert, .. } | LifecycleEvent::AlertEnd { alert, .. } => {
                alert
            }
        }
    }

    pub fn observed_at(&self) -> DateTime<Utc> {
        match self {
            LifecycleEvent::AlertStart { observed_at, .. }
            | LifecycleEvent::AlertEnd { observed_at, .. } => *observed_at,
        }
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.alert())
    }
}
