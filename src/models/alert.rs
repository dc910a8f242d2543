//! Alert and region records as served by the alert feed.

use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum RegionType {
    State,
    District,
    Community,
    Null,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertType {
    Unknown,
    Air,
    Artillery,
    UrbanFights,
    Chemical,
    Nuclear,
    Info,
}

impl AlertType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertType::Unknown => "UNKNOWN",
            AlertType::Air => "AIR",
            AlertType::Artillery => "ARTILLERY",
            AlertType::UrbanFights => "URBAN_FIGHTS",
            AlertType::Chemical => "CHEMICAL",
            AlertType::Nuclear => "NUCLEAR",
            AlertType::Info => "INFO",
        }
    }
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single active hazard for a region.
///
/// Identity is `(region_id, alert_type)`. `last_update` is carried along but
/// ignored by `PartialEq`/`Hash`, so two records of the same hazard with
/// different timestamps compare equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub region_id: String,
    pub region_type: RegionType,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub last_update: DateTime<Utc>,
}

impl Alert {
    pub fn identity(&self) -> (&str, AlertType) {
        (&self.region_id, self.alert_type)
    }
}

impl PartialEq for Alert {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for Alert {}

impl Hash for Alert {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.alert_type, self.region_id)
    }
}

/// Current alert state of one administrative area.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub region_id: String,
    pub region_type: RegionType,
    #[serde(default)]
    pub region_name: String,
    #[serde(default)]
    pub region_eng_name: String,
    pub last_update: DateTime<Utc>,
    #[serde(default)]
    pub active_alerts: Vec<Alert>,
}
