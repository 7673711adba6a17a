//! One collection-and-transmission cycle
//!
//! Collection and transmission run on a spawned task. Every progress event is
//! queued on an unbounded FIFO channel and handed to the listener only by
//! [`RunHandle::drive`], on whichever task drives the handle.

use mamabear_api::{InventoryListener, ListenerEvent, ProgressSink, TransmissionOutcome};
use mamabear_client::TransmissionClient;
use mamabear_inventory::InventoryCollector;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::config::Config;
use crate::error::CoreError;

/// A configured, not yet started run
pub struct InventoryRun {
    collector: InventoryCollector,
    client: TransmissionClient,
}

impl InventoryRun {
    /// Create a run from explicit parts
    pub fn new(collector: InventoryCollector, client: TransmissionClient) -> Self {
        Self { collector, client }
    }

    /// Create a run using local utilities and the configured backend
    ///
    /// # Errors
    /// Returns error if the backend URL is invalid
    pub fn from_config(config: &Config) -> Result<Self, CoreError> {
        Ok(Self::new(config.build_collector(), config.build_client()?))
    }

    /// Number of steps the run will report
    #[must_use]
    pub fn total_steps(&self) -> usize {
        self.collector.total_steps()
    }

    /// Start the run on a background task
    ///
    /// Must be called within a tokio runtime.
    #[must_use]
    pub fn start(self) -> RunHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(self.execute(ChannelSink(tx)));
        RunHandle { events: rx, task }
    }

    #[instrument(skip_all, fields(url = %self.client.url()))]
    async fn execute(self, sink: ChannelSink) {
        let record = self.collector.collect(&sink).await;

        let outcome = self
            .client
            .spawn_transmit(record)
            .await
            .unwrap_or_else(|_| {
                TransmissionOutcome::Failure(
                    "transmission ended without reporting an outcome".to_string(),
                )
            });

        info!(success = outcome.is_success(), "run completed");
        sink.emit(ListenerEvent::WorkCompleted { outcome });
    }
}

/// Producer side of the event queue
struct ChannelSink(mpsc::UnboundedSender<ListenerEvent>);

impl ProgressSink for ChannelSink {
    fn emit(&self, event: ListenerEvent) {
        if self.0.send(event).is_err() {
            debug!("run handle dropped, event discarded");
        }
    }
}

/// Consumer side of a started run
pub struct RunHandle {
    events: mpsc::UnboundedReceiver<ListenerEvent>,
    task: JoinHandle<()>,
}

impl RunHandle {
    /// Next event in emission order, or `None` once the run has finished
    pub async fn next_event(&mut self) -> Option<ListenerEvent> {
        self.events.recv().await
    }

    /// Deliver every event to `listener` in order and return the outcome
    ///
    /// # Errors
    /// Returns an error if the run task panicked before reporting an outcome.
    pub async fn drive(
        mut self,
        listener: &mut dyn InventoryListener,
    ) -> Result<TransmissionOutcome, CoreError> {
        let mut outcome = None;

        while let Some(event) = self.events.recv().await {
            if let ListenerEvent::WorkCompleted { outcome: result } = &event {
                outcome = Some(result.clone());
            }
            event.deliver(listener);
        }

        if let Err(e) = self.task.await {
            warn!(error = %e, "run task failed");
            return Err(CoreError::RunAborted(e.to_string()));
        }

        outcome.ok_or_else(|| CoreError::RunAborted("no outcome reported".to_string()))
    }
}
