use anyhow::{bail, Context, Result};
use log::info;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::feed::AlertFeed;

use super::loop_worker::{PollLoop, StatusSnapshot};

/// Owns the spawned poll loop and the means to stop it.
pub struct PollController {
    handle: Option<JoinHandle<Result<()>>>,
    cancel_token: Option<CancellationToken>,
    snapshot_rx: Option<watch::Receiver<StatusSnapshot>>,
}

impl Default for PollController {
    fn default() -> Self {
        Self::new()
    }
}

impl PollController {
    pub fn new() -> Self {
        Self {
            handle: None,
            cancel_token: None,
            snapshot_rx: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    pub fn start<F: AlertFeed + 'static>(&mut self, poll_loop: PollLoop<F>) -> Result<()> {
        if self.handle.is_some() {
            bail!("poll loop already running");
        }

        let cancel_token = CancellationToken::new();
        self.snapshot_rx = Some(poll_loop.subscribe());
        self.handle = Some(tokio::spawn(poll_loop.run(cancel_token.clone())));
        self.cancel_token = Some(cancel_token);
        info!("Poll loop started");
        Ok(())
    }

    /// Latest status published by the loop.
    pub fn status(&self) -> Option<StatusSnapshot> {
        self.snapshot_rx.as_ref().map(|rx| rx.borrow().clone())
    }

    pub fn snapshots(&self) -> Option<watch::Receiver<StatusSnapshot>> {
        self.snapshot_rx.clone()
    }

    /// Waits for the loop to end on its own (it only does so on error).
    ///
    /// Cancel-safe: dropping this future leaves the loop running and stoppable.
    pub async fn join(&mut self) -> Result<()> {
        let Some(handle) = self.handle.as_mut() else {
            return Ok(());
        };
        let joined = handle.await;
        self.handle = None;
        self.cancel_token = None;
        joined.context("poll loop task failed to join")?
    }

    pub async fn stop(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.handle.take() {
            handle.await.context("poll loop task failed to join")?
        } else {
            Ok(())
        }
    }
}
