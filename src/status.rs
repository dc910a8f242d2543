//! Status Store: the last known state of the monitored region on disk.

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};

use crate::models::StatusModel;

pub struct StatusStore {
    path: PathBuf,
    model: StatusModel,
}

impl StatusStore {
    /// Loads `path`, or starts from an empty status if the file does not exist.
    pub fn open(path: PathBuf) -> Result<Self> {
        log::debug!("Loading status file {}", path.display());

        let model = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read status from {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Invalid status in {}", path.display()))?
        } else {
            log::warn!("Status file generated.");
            StatusModel::default()
        };

        Ok(Self { path, model })
    }

    pub fn model(&self) -> &StatusModel {
        &self.model
    }

    pub fn replace(&mut self, model: StatusModel) {
        self.model = model;
    }

    pub fn save(&self) -> Result<()> {
        log::debug!("Saving status file");
        let serialized = serde_json::to_string_pretty(&self.model)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write status to {}", self.path.display()))
    }
}
