use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, FixedOffset, Local, Utc};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::{
    actions::ActionError,
    config::ConfigModel,
    diff::reconcile,
    dispatcher::{dispatch_all, DispatchReport},
    feed::AlertFeed,
    models::{LifecycleEvent, StatusModel},
    status::StatusStore,
    supervisor::{LogObserver, SuperviseObserver},
};

pub type Clock = Arc<dyn Fn() -> DateTime<FixedOffset> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollPhase {
    /// Cold start: resynchronise with the feed without firing actions.
    Priming,
    Steady,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The fetch failed; nothing was touched.
    Skipped,
    /// The feed reported the same `lastUpdate` (or omitted the region).
    Unchanged,
    Updated {
        events: usize,
        report: DispatchReport,
    },
}

/// What front-ends get to see of the loop.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusSnapshot {
    pub status: StatusModel,
    /// When the feed last answered successfully.
    pub last_fetch: Option<DateTime<Utc>>,
}

pub struct PollLoop<F> {
    config: ConfigModel,
    feed: F,
    store: StatusStore,
    observer: Box<dyn SuperviseObserver>,
    clock: Clock,
    snapshot_tx: watch::Sender<StatusSnapshot>,
}

impl<F: AlertFeed> PollLoop<F> {
    pub fn new(config: ConfigModel, feed: F, store: StatusStore) -> Self {
        let (snapshot_tx, _) = watch::channel(StatusSnapshot {
            status: store.model().clone(),
            last_fetch: None,
        });

        Self {
            config,
            feed,
            store,
            observer: Box::new(LogObserver),
            clock: Arc::new(|| Local::now().fixed_offset()),
            snapshot_tx,
        }
    }

    pub fn with_observer(mut self, observer: impl SuperviseObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<StatusSnapshot> {
        self.snapshot_tx.subscribe()
    }

    pub fn status(&self) -> &StatusModel {
        self.store.model()
    }

    /// One fetch → diff → dispatch → persist pass.
    ///
    /// Only an unexpected action failure is returned as `Err`; fetch and
    /// persistence failures are logged and absorbed.
    pub async fn run_cycle(&mut self, phase: PollPhase) -> Result<CycleOutcome, ActionError> {
        let region_id = self.config.region_id.clone();
        log::debug!("Status check {}", Local::now());

        let regions = match self.feed.fetch_regions(&region_id).await {
            Ok(regions) => regions,
            Err(err) => {
                log::error!("Status check failed, skipping cycle: {err}");
                return Ok(CycleOutcome::Skipped);
            }
        };
        let fetched_at = Utc::now();

        let is_initial_run = phase == PollPhase::Priming;
        let reconciliation = reconcile(
            self.store.model().clone(),
            &regions,
            &region_id,
            is_initial_run,
        );

        if !reconciliation.changed {
            if is_initial_run {
                self.persist();
            }
            self.publish(fetched_at);
            return Ok(CycleOutcome::Unchanged);
        }

        let events = only_monitored_region(reconciliation.events, &region_id);
        let report = dispatch_all(
            &events,
            &self.config.actions,
            (self.clock)(),
            self.observer.as_ref(),
        )
        .await?;

        self.store.replace(reconciliation.status);
        self.persist();
        self.publish(fetched_at);

        Ok(CycleOutcome::Updated {
            events: events.len(),
            report,
        })
    }

    /// Polls until `cancel` fires or an action fails unexpectedly.
    ///
    /// Cancellation is observed between cycles and during the sleep; a cycle
    /// that has started dispatching runs to completion first.
    pub async fn run(mut self, cancel: CancellationToken) -> Result<()> {
        let interval = self.config.poll_interval();
        let mut phase = PollPhase::Priming;
        let mut first = true;

        log::info!(
            "Mainloop enter: region {}, every {}s, {} actions",
            self.config.region_id,
            interval.as_secs(),
            self.config.actions.len()
        );

        loop {
            if !first {
                tokio::select! {
                    _ = tokio::time::sleep(interval) => {}
                    _ = cancel.cancelled() => break,
                }
            }
            first = false;

            if cancel.is_cancelled() {
                break;
            }

            let outcome = self.run_cycle(phase).await?;
            // A failed priming fetch is retried; it must not turn into a
            // steady cycle that replays alerts from before startup.
            if phase == PollPhase::Priming && outcome != CycleOutcome::Skipped {
                phase = PollPhase::Steady;
            }
        }

        log::info!("Mainloop exit");
        Ok(())
    }

    fn persist(&self) {
        if let Err(err) = self.store.save() {
            log::error!("Failed to persist status: {err:?}");
        }
    }

    fn publish(&self, fetched_at: DateTime<Utc>) {
        self.snapshot_tx.send_replace(StatusSnapshot {
            status: self.store.model().clone(),
            last_fetch: Some(fetched_at),
        });
    }
}

fn only_monitored_region(events: Vec<LifecycleEvent>, region_id: &str) -> Vec<LifecycleEvent> {
    events
        .into_iter()
        .filter(|event| {
            let keep = event.alert().region_id == region_id;
            if !keep {
                log::info!("Alert action silent (wrong regionId): {event}");
            }
            keep
        })
        .collect()
}
