//! Pre-conditions every action checks before doing any work.
//!
//! The timetable gate and the staleness gate are independent: either, both or
//! neither may be configured on an action.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{LifecycleEvent, Timetable};

use super::ActionError;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ActionGates {
    /// Absent means always active.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timetable: Option<Timetable>,
    /// Maximum age in seconds of the transition that produced the event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_interval: Option<u64>,
}

impl ActionGates {
    pub fn check(&self, event: &LifecycleEvent, now: DateTime<FixedOffset>) -> Result<(), ActionError> {
        timetable_gate(self.timetable.as_ref(), now)?;
        staleness_gate(self.skip_interval, event, now)
    }
}

/// `now` is read as local wall-clock time in its own offset.
pub fn timetable_gate(timetable: Option<&Timetable>, now: DateTime<FixedOffset>) -> Result<(), ActionError> {
    match timetable {
        Some(timetable) if !timetable.is_in_timetable(now.naive_local()) => {
            Err(ActionError::OutOfTimetable)
        }
        _ => Ok(()),
    }
}

pub fn staleness_gate(
    skip_interval: Option<u64>,
    event: &LifecycleEvent,
    now: DateTime<FixedOffset>,
) -> Result<(), ActionError> {
    let Some(limit_secs) = skip_interval else {
        return Ok(());
    };

    let age_secs = (now.with_timezone(&Utc) - event.observed_at()).num_seconds();
    // Limits past i64::MAX seconds are effectively unbounded.
    if age_secs > i64::try_from(limit_secs).unwrap_or(i64::MAX) {
        return Err(ActionError::Stale {
            age_secs,
            limit_secs,
        });
    }
    Ok(())
}
