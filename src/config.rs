//! `conf.json`: which region to watch, how often, and what to do about it.

use std::{fs, path::Path, time::Duration};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::actions::Action;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigModel {
    #[serde(default = "default_region_id", alias = "reginId")]
    pub region_id: String,
    /// Seconds between feed polls.
    #[serde(default = "default_check_interval")]
    pub check_interval: u64,
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_true")]
    pub enable_ssl_validation: bool,
    /// Dispatch order; every action receives every event.
    #[serde(default)]
    pub actions: Vec<Action>,
}

fn default_region_id() -> String {
    "0".into()
}

fn default_check_interval() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

impl Default for ConfigModel {
    fn default() -> Self {
        Self {
            region_id: default_region_id(),
            check_interval: default_check_interval(),
            api_base_url: None,
            api_key: None,
            enable_ssl_validation: true,
            actions: Vec::new(),
        }
    }
}

impl ConfigModel {
    /// Reads the config at `path`.
    ///
    /// A missing file is replaced by a default template and reported as an
    /// error so the user can fill it in before the first run.
    pub fn load(path: &Path) -> Result<Self> {
        log::debug!("Loading config file {}", path.display());

        if !path.exists() {
            log::error!("Config file not found! Generating template.");
            Self::default()
                .save(path)
                .context("failed to write config template")?;
            bail!(
                "config file {} was missing; a template has been written, edit it and restart",
                path.display()
            );
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Invalid config in {}", path.display()))?;

        log::debug!(
            "Loaded config: region {}, {} actions",
            config.region_id,
            config.actions.len()
        );
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let serialized = serde_json::to_string_pretty(self)?;
        fs::write(path, serialized)
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval)
    }
}
