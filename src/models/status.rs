use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Alert;

/// Last known state of the monitored region, persisted between runs.
///
/// `active_alerts` holds exactly the alerts whose start has been announced and
/// whose end has not.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatusModel {
    #[serde(default = "Utc::now")]
    pub last_update: DateTime<Utc>,
    #[serde(default)]
    pub active_alerts: Vec<Alert>,
}

impl Default for StatusModel {
    fn default() -> Self {
        Self {
            last_update: Utc::now(),
            active_alerts: Vec::new(),
        }
    }
}

impl StatusModel {
    pub fn new(last_update: DateTime<Utc>, active_alerts: Vec<Alert>) -> Self {
        Self {
            last_update,
            active_alerts,
        }
    }

    pub fn is_clear(&self) -> bool {
        self.active_alerts.is_empty()
    }
}
