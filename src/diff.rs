//! Reconciles a fresh feed snapshot against the persisted status.
//!
//! The result is the replacement status plus the lifecycle events that the
//! transition implies: every ended alert first, then every started one.

use std::collections::HashSet;

use crate::models::{Alert, LifecycleEvent, Region, StatusModel};

#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    pub status: StatusModel,
    pub events: Vec<LifecycleEvent>,
    /// False when the region was absent or its `lastUpdate` had not moved.
    pub changed: bool,
}

impl Reconciliation {
    fn unchanged(prior: StatusModel) -> Self {
        Self {
            status: prior,
            events: Vec::new(),
            changed: false,
        }
    }
}

/// Diffs `fetched` against `prior` for the monitored region.
///
/// With `is_initial_run` set the status is resynchronised without emitting
/// events, so alerts that predate the process are neither started nor ended.
pub fn reconcile(
    prior: StatusModel,
    fetched: &[Region],
    region_id: &str,
    is_initial_run: bool,
) -> Reconciliation {
    let Some(region) = fetched.iter().find(|r| r.region_id == region_id) else {
        return Reconciliation::unchanged(prior);
    };

    if region.last_update == prior.last_update {
        return Reconciliation::unchanged(prior);
    }

    log::info!(
        "Status changed {} -> {}",
        prior.last_update,
        region.last_update
    );

    let events = if is_initial_run {
        Vec::new()
    } else {
        let removed = difference(&prior.active_alerts, &region.active_alerts);
        let added = difference(&region.active_alerts, &prior.active_alerts);

        removed
            .into_iter()
            .map(|alert| LifecycleEvent::AlertEnd {
                alert,
                observed_at: region.last_update,
            })
            .chain(added.into_iter().map(|alert| LifecycleEvent::AlertStart {
                alert,
                observed_at: region.last_update,
            }))
            .collect()
    };

    Reconciliation {
        status: StatusModel::new(region.last_update, region.active_alerts.clone()),
        events,
        changed: true,
    }
}

/// Alerts of `left` missing from `right`, by identity, first occurrence kept.
fn difference(left: &[Alert], right: &[Alert]) -> Vec<Alert> {
    let right: HashSet<&Alert> = right.iter().collect();
    let mut seen = HashSet::new();

    left.iter()
        .filter(|alert| !right.contains(alert) && seen.insert(*alert))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AlertEventKind, AlertType, RegionType};
    use chrono::{DateTime, TimeZone, Utc};

    const REGION: &str = "9";

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap()
    }

    fn alert(alert_type: AlertType, hour: u32) -> Alert {
        Alert {
            region_id: REGION.to_string(),
            region_type: RegionType::State,
            alert_type,
            last_update: at(hour),
        }
    }

    fn region(last_update: DateTime<Utc>, active_alerts: Vec<Alert>) -> Region {
        Region {
            region_id: REGION.to_string(),
            region_type: RegionType::State,
            region_name: String::new(),
            region_eng_name: String::new(),
            last_update,
            active_alerts,
        }
    }

    fn kinds(events: &[LifecycleEvent]) -> Vec<(AlertEventKind, AlertType)> {
        events
            .iter()
            .map(|e| (e.kind(), e.alert().alert_type))
            .collect()
    }

    #[test]
    fn test_missing_region_is_a_noop() {
        let prior = StatusModel::new(at(1), vec![alert(AlertType::Air, 1)]);
        let result = reconcile(prior.clone(), &[region(at(2), vec![])], "10", false);

        assert_eq!(result.status, prior);
        assert!(result.events.is_empty());
        assert!(!result.changed);
    }

    #[test]
    fn test_unchanged_last_update_short_circuits() {
        let prior = StatusModel::new(at(1), vec![alert(AlertType::Air, 1)]);
        // Different alert set, same timestamp: still treated as no change.
        let fetched = region(at(1), vec![alert(AlertType::Artillery, 1)]);
        let result = reconcile(prior.clone(), &[fetched], REGION, false);

        assert_eq!(result.status, prior);
        assert_eq!(result.status.active_alerts[0].alert_type, AlertType::Air);
        assert!(result.events.is_empty());
        assert!(!result.changed);
    }

    #[test]
    fn test_ends_are_emitted_before_starts() {
        let prior = StatusModel::new(at(0), vec![alert(AlertType::Air, 0)]);
        let fetched = region(at(1), vec![alert(AlertType::Artillery, 1)]);
        let result = reconcile(prior, &[fetched], REGION, false);

        assert_eq!(
            kinds(&result.events),
            vec![
                (AlertEventKind::End, AlertType::Air),
                (AlertEventKind::Start, AlertType::Artillery),
            ]
        );
        assert_eq!(result.status.last_update, at(1));
        assert_eq!(result.status.active_alerts, vec![alert(AlertType::Artillery, 1)]);
        assert!(result.events.iter().all(|e| e.observed_at() == at(1)));
    }

    #[test]
    fn test_many_transitions_keep_phase_order() {
        let prior = StatusModel::new(
            at(0),
            vec![
                alert(AlertType::Air, 0),
                alert(AlertType::Chemical, 0),
                alert(AlertType::Info, 0),
            ],
        );
        let fetched = region(
            at(2),
            vec![
                alert(AlertType::Nuclear, 2),
                alert(AlertType::Info, 2),
                alert(AlertType::UrbanFights, 2),
            ],
        );
        let result = reconcile(prior, &[fetched], REGION, false);

        assert_eq!(
            kinds(&result.events),
            vec![
                (AlertEventKind::End, AlertType::Air),
                (AlertEventKind::End, AlertType::Chemical),
                (AlertEventKind::Start, AlertType::Nuclear),
                (AlertEventKind::Start, AlertType::UrbanFights),
            ]
        );
    }

    #[test]
    fn test_timestamp_only_change_emits_nothing() {
        let prior = StatusModel::new(at(0), vec![alert(AlertType::Air, 0)]);
        let fetched = region(at(3), vec![alert(AlertType::Air, 3)]);
        let result = reconcile(prior, &[fetched], REGION, false);

        assert!(result.events.is_empty());
        assert!(result.changed);
        assert_eq!(result.status.last_update, at(3));
        assert_eq!(result.status.active_alerts[0].last_update, at(3));
    }

    #[test]
    fn test_initial_run_resyncs_silently() {
        let fetched = region(at(1), vec![alert(AlertType::Air, 1)]);
        let result = reconcile(StatusModel::new(at(0), vec![]), &[fetched], REGION, true);

        assert!(result.events.is_empty());
        assert!(result.changed);
        assert_eq!(result.status.active_alerts, vec![alert(AlertType::Air, 1)]);
        assert_eq!(result.status.last_update, at(1));
    }

    #[test]
    fn test_initial_run_does_not_end_stale_alerts() {
        let prior = StatusModel::new(at(0), vec![alert(AlertType::Artillery, 0)]);
        let fetched = region(at(5), vec![]);
        let result = reconcile(prior, &[fetched], REGION, true);

        assert!(result.events.is_empty());
        assert!(result.status.is_clear());
    }

    #[test]
    fn test_duplicate_identities_emit_once() {
        let fetched = region(
            at(1),
            vec![alert(AlertType::Air, 1), alert(AlertType::Air, 2)],
        );
        let result = reconcile(StatusModel::new(at(0), vec![]), &[fetched], REGION, false);

        assert_eq!(kinds(&result.events), vec![(AlertEventKind::Start, AlertType::Air)]);
        // Replacement is verbatim, duplicates included.
        assert_eq!(result.status.active_alerts.len(), 2);
    }

    #[test]
    fn test_other_regions_in_payload_are_ignored() {
        let mut other = region(at(4), vec![alert(AlertType::Nuclear, 4)]);
        other.region_id = "31".to_string();
        let mine = region(at(1), vec![alert(AlertType::Air, 1)]);
        let result = reconcile(StatusModel::new(at(0), vec![]), &[other, mine], REGION, false);

        assert_eq!(kinds(&result.events), vec![(AlertEventKind::Start, AlertType::Air)]);
        assert_eq!(result.status.last_update, at(1));
    }
}
