//! Copies a per-alert source file into a fixed destination folder.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::LifecycleEvent;

use super::{lookup, Act, ActionError, ActionGates, EventMapping};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CopyFileAction {
    #[serde(flatten)]
    pub gates: ActionGates,
    /// File to copy, keyed by alert type and event kind.
    #[serde(default)]
    pub source_files: EventMapping<PathBuf>,
    #[serde(default)]
    pub destination_folder: PathBuf,
}

impl CopyFileAction {
    fn destination_for(&self, source: &Path) -> Result<PathBuf, ActionError> {
        let file_name = source.file_name().ok_or_else(|| {
            ActionError::io(
                "invalid copy source",
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("{} has no file name", source.display()),
                ),
            )
        })?;
        Ok(self.destination_folder.join(file_name))
    }
}

#[async_trait]
impl Act for CopyFileAction {
    fn label(&self) -> &'static str {
        "copy_file"
    }

    fn gates(&self) -> &ActionGates {
        &self.gates
    }

    async fn perform(&self, event: &LifecycleEvent) -> Result<(), ActionError> {
        let source = lookup(&self.source_files, event)?;
        let destination = self.destination_for(source)?;

        let bytes = tokio::fs::copy(source, &destination).await.map_err(|err| {
            ActionError::io(
                format!(
                    "failed to copy {} to {}",
                    source.display(),
                    destination.display()
                ),
                err,
            )
        })?;

        log::info!(
            "Copied {} -> {} ({bytes} bytes)",
            source.display(),
            destination.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Alert, AlertEventKind, AlertType, RegionType};
    use chrono::{TimeZone, Utc};
    use std::collections::HashMap;

    fn start_of(alert_type: AlertType) -> LifecycleEvent {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        LifecycleEvent::AlertStart {
            alert: Alert {
                region_id: "9".into(),
                region_type: RegionType::State,
                alert_type,
                last_update: at,
            },
            observed_at: at,
        }
    }

    fn action_for(source: PathBuf, destination: PathBuf) -> CopyFileAction {
        let mut source_files: EventMapping<PathBuf> = HashMap::new();
        source_files
            .entry(AlertType::Air)
            .or_default()
            .insert(AlertEventKind::Start, source);
        CopyFileAction {
            gates: ActionGates::default(),
            source_files,
            destination_folder: destination,
        }
    }

    #[tokio::test]
    async fn test_copies_mapped_file_into_folder() {
        let src_dir = tempfile::tempdir().unwrap();
        let dst_dir = tempfile::tempdir().unwrap();
        let source = src_dir.path().join("air_start.txt");
        std::fs::write(&source, "siren").unwrap();

        let action = action_for(source, dst_dir.path().to_path_buf());
        action.perform(&start_of(AlertType::Air)).await.unwrap();

        let copied = std::fs::read_to_string(dst_dir.path().join("air_start.txt")).unwrap();
        assert_eq!(copied, "siren");
    }

    #[tokio::test]
    async fn test_unmapped_alert_type_fails() {
        let dst_dir = tempfile::tempdir().unwrap();
        let action = action_for(PathBuf::from("unused"), dst_dir.path().to_path_buf());

        let err = action.perform(&start_of(AlertType::Chemical)).await.unwrap_err();
        assert!(matches!(err, ActionError::AlertTypeNotConfigured { .. }));
    }

    #[tokio::test]
    async fn test_missing_source_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let action = action_for(dir.path().join("absent.wav"), dir.path().join("out"));

        let err = action.perform(&start_of(AlertType::Air)).await.unwrap_err();
        assert!(matches!(err, ActionError::Io { .. }));
    }
}
