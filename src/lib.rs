pub mod actions;
pub mod config;
pub mod diff;
pub mod dispatcher;
pub mod feed;
pub mod models;
pub mod poll;
pub mod status;
pub mod supervisor;
pub mod utils;

use std::path::PathBuf;

use anyhow::{Context, Result};
use log::{error, info, warn};

use config::ConfigModel;
use feed::FeedClient;
use poll::{PollController, PollLoop};
use status::StatusStore;

pub use actions::{Act, Action, ActionError, ActionErrorKind};
pub use diff::{reconcile, Reconciliation};
pub use dispatcher::{dispatch, dispatch_all, DispatchReport};
pub use feed::{AlertFeed, FetchError};
pub use models::{Alert, AlertEventKind, AlertType, LifecycleEvent, Region, StatusModel};
pub use supervisor::{supervise, LogObserver, SuperviseObserver, Supervised};

/// File locations for one monitor instance.
#[derive(Debug, Clone)]
pub struct Paths {
    pub config: PathBuf,
    pub status: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self {
            config: PathBuf::from("conf.json"),
            status: PathBuf::from("status.json"),
        }
    }
}

/// Loads config and status, then polls until Ctrl-C or an unexpected action
/// failure.
pub async fn run(paths: Paths) -> Result<()> {
    let config = ConfigModel::load(&paths.config)?;
    let store = StatusStore::open(paths.status.clone())?;
    let feed = FeedClient::new(&config).context("failed to build feed client")?;
    info!(
        "Radio alarm starting: region {} via {}",
        config.region_id,
        feed.base_url()
    );

    let mut controller = PollController::new();
    controller.start(PollLoop::new(config, feed, store))?;

    tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            if let Err(err) = signal {
                warn!("Failed to listen for Ctrl-C: {err}");
            }
            info!("Stop requested");
            controller.stop().await
        }
        result = controller.join() => {
            if let Err(err) = &result {
                error!("Poll loop terminated: {err:?}");
            }
            result
        }
    }
}

/// Prints the feed's region catalogue as JSON.
pub async fn print_regions(paths: Paths) -> Result<()> {
    let feed = feed_for(&paths)?;
    let regions = feed
        .get_regions()
        .await
        .context("failed to fetch region list")?;
    println!("{}", serde_json::to_string_pretty(&regions)?);
    Ok(())
}

/// Prints the feed's last alert index, which moves on every change anywhere.
pub async fn print_alert_index(paths: Paths) -> Result<()> {
    let feed = feed_for(&paths)?;
    let index = feed
        .get_last_alert_index()
        .await
        .context("failed to fetch last alert index")?;
    println!("{}", serde_json::to_string_pretty(&index)?);
    Ok(())
}

fn feed_for(paths: &Paths) -> Result<FeedClient> {
    let config = ConfigModel::load(&paths.config)?;
    FeedClient::new(&config).context("failed to build feed client")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths_in(dir: &std::path::Path) -> Paths {
        Paths {
            config: dir.join("conf.json"),
            status: dir.join("status.json"),
        }
    }

    #[tokio::test]
    async fn test_alert_index_reports_unreachable_feed() {
        let dir = tempfile::tempdir().unwrap();
        let paths = paths_in(dir.path());
        ConfigModel {
            api_base_url: Some("http://127.0.0.1:9/api/v3".into()),
            ..Default::default()
        }
        .save(&paths.config)
        .unwrap();

        let err = print_alert_index(paths).await.unwrap_err();
        assert!(format!("{err:#}").contains("failed to fetch last alert index"));
    }

    #[tokio::test]
    async fn test_missing_config_writes_template_first() {
        let dir = tempfile::tempdir().unwrap();
        let paths = paths_in(dir.path());

        assert!(print_alert_index(paths.clone()).await.is_err());
        assert!(paths.config.exists());
    }
}
