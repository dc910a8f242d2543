//! Configured side effects run on alert lifecycle events.
//!
//! Every variant exposes the single [`Act`] capability. The registry is just the
//! ordered `Vec<Action>` from the config; nothing outside a variant looks at its
//! fields.

pub mod copy_file;
pub mod error;
pub mod gates;
pub mod local_command;
pub mod powershell_shortcut;
pub mod process;
pub mod window_shortcut;

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::models::{AlertEventKind, AlertType, LifecycleEvent};

pub use copy_file::CopyFileAction;
pub use error::{ActionError, ActionErrorKind};
pub use gates::ActionGates;
pub use local_command::LocalCommandAction;
pub use powershell_shortcut::PowerShellShortcutAction;
pub use window_shortcut::WindowShortcutAction;

/// Per alert type, per event kind configuration value.
pub type EventMapping<T> = HashMap<AlertType, HashMap<AlertEventKind, T>>;

pub(crate) fn lookup<'a, T>(
    mapping: &'a EventMapping<T>,
    event: &LifecycleEvent,
) -> Result<&'a T, ActionError> {
    let alert_type = event.alert().alert_type;
    let kind = event.kind();
    mapping
        .get(&alert_type)
        .and_then(|by_kind| by_kind.get(&kind))
        .ok_or(ActionError::AlertTypeNotConfigured { alert_type, kind })
}

#[async_trait]
pub trait Act: Send + Sync {
    /// Variant name used in log lines.
    fn label(&self) -> &'static str;

    fn gates(&self) -> &ActionGates;

    /// The side effect itself; gates have already passed.
    async fn perform(&self, event: &LifecycleEvent) -> Result<(), ActionError>;

    async fn act(&self, event: &LifecycleEvent, now: DateTime<FixedOffset>) -> Result<(), ActionError> {
        self.gates().check(event, now)?;
        self.perform(event).await
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    CopyFile(CopyFileAction),
    LocalConsoleExecute(LocalCommandAction),
    WindowsApplicationShortcut(WindowShortcutAction),
    WindowsPowershellApplicationShortcut(PowerShellShortcutAction),
}

impl Action {
    fn inner(&self) -> &dyn Act {
        match self {
            Action::CopyFile(action) => action,
            Action::LocalConsoleExecute(action) => action,
            Action::WindowsApplicationShortcut(action) => action,
            Action::WindowsPowershellApplicationShortcut(action) => action,
        }
    }
}

#[async_trait]
impl Act for Action {
    fn label(&self) -> &'static str {
        self.inner().label()
    }

    fn gates(&self) -> &ActionGates {
        self.inner().gates()
    }

    async fn perform(&self, event: &LifecycleEvent) -> Result<(), ActionError> {
        self.inner().perform(event).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Alert, RegionType};
    use chrono::{TimeZone, Utc};

    fn end_of(alert_type: AlertType) -> LifecycleEvent {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        LifecycleEvent::AlertEnd {
            alert: Alert {
                region_id: "9".into(),
                region_type: RegionType::State,
                alert_type,
                last_update: at,
            },
            observed_at: at,
        }
    }

    #[test]
    fn test_lookup_by_type_and_kind() {
        let mut mapping: EventMapping<String> = HashMap::new();
        mapping
            .entry(AlertType::Air)
            .or_default()
            .insert(AlertEventKind::End, "all-clear".to_string());

        assert_eq!(lookup(&mapping, &end_of(AlertType::Air)).unwrap(), "all-clear");
        assert!(matches!(
            lookup(&mapping, &end_of(AlertType::Nuclear)),
            Err(ActionError::AlertTypeNotConfigured {
                alert_type: AlertType::Nuclear,
                kind: AlertEventKind::End
            })
        ));
    }

    #[test]
    fn test_actions_deserialize_by_type_tag() {
        let raw = r#"[
            {
                "type": "copy_file",
                "source_files": {"AIR": {"start": "sounds/air.mp3"}},
                "destination_folder": "/tmp/radio",
                "timetable": {"mon": [{"start": "08:00", "end": "20:00"}]}
            },
            {
                "type": "local_console_execute",
                "commands": {"ARTILLERY": {"end": "notify-send clear"}},
                "skip_interval": 120
            },
            {
                "type": "windows_application_shortcut",
                "window_name": "Radio",
                "shortcut": {"AIR": {"start": ["ctrl", "shift", "p"]}}
            },
            {
                "type": "windows_powershell_application_shortcut",
                "window_name": "Radio",
                "shortcut": {"AIR": {"start": "^p"}}
            }
        ]"#;

        let actions: Vec<Action> = serde_json::from_str(raw).unwrap();
        let labels: Vec<_> = actions.iter().map(|action| action.label()).collect();
        assert_eq!(
            labels,
            vec!["copy_file", "local_console_execute", "window_shortcut", "powershell_shortcut"]
        );
        assert!(actions[0].gates().timetable.is_some());
        assert_eq!(actions[1].gates().skip_interval, Some(120));
        assert!(actions[2].gates().timetable.is_none());
    }

    #[test]
    fn test_unknown_type_tag_is_rejected() {
        let raw = r#"[{"type": "py_auto_gui_shortcut"}]"#;
        assert!(serde_json::from_str::<Vec<Action>>(raw).is_err());
    }
}
