//! High-level inventory collection API

use std::sync::Arc;
use std::time::Duration;

use mamabear_api::{FactValue, InventoryRecord, ListenerEvent, ProgressSink, TRANSMIT_STEP};
use mamabear_exec::cache::DEFAULT_COMMAND_TIMEOUT;
use mamabear_exec::{CommandCache, CommandExecutor};
use tracing::{debug, info, instrument, warn};

use crate::catalog::{FactCatalog, ToolPaths};

/// Inventory collector
///
/// Runs every catalog entry in order against a fresh [`CommandCache`], so
/// command output is shared between facts of one run but never across runs.
pub struct InventoryCollector {
    executor: Arc<dyn CommandExecutor>,
    catalog: FactCatalog,
    tools: ToolPaths,
    command_timeout: Duration,
}

impl InventoryCollector {
    /// Create a new inventory collector
    pub fn new(executor: Arc<dyn CommandExecutor>, catalog: FactCatalog) -> Self {
        Self {
            executor,
            catalog,
            tools: ToolPaths::default(),
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }

    /// Override utility locations
    #[must_use]
    pub fn with_tools(mut self, tools: ToolPaths) -> Self {
        self.tools = tools;
        self
    }

    /// Set the per-command timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    #[must_use]
    pub fn catalog(&self) -> &FactCatalog {
        &self.catalog
    }

    /// Number of steps reported for a full run: one per fact plus transmission
    #[must_use]
    pub fn total_steps(&self) -> usize {
        self.catalog.len() + 1
    }

    /// Collect every fact, then announce the transmission step
    ///
    /// Emits `WorkStarted` counting the transmission step, a
    /// `StepStarted`/`StepCompleted` pair per fact and a final `StepStarted` for
    /// transmission. Fact failures are logged and stored as empty values; they
    /// never stop the loop.
    #[instrument(skip_all, fields(facts = self.catalog.len()))]
    pub async fn collect(&self, sink: &dyn ProgressSink) -> InventoryRecord {
        let record = self.run_catalog(sink, self.total_steps()).await;

        sink.emit(ListenerEvent::StepStarted {
            name: TRANSMIT_STEP.to_string(),
        });

        record
    }

    /// Collect every fact without announcing transmission
    ///
    /// `WorkStarted` counts only the fact steps.
    #[instrument(skip_all, fields(facts = self.catalog.len()))]
    pub async fn collect_facts(&self, sink: &dyn ProgressSink) -> InventoryRecord {
        self.run_catalog(sink, self.catalog.len()).await
    }

    async fn run_catalog(&self, sink: &dyn ProgressSink, total_steps: usize) -> InventoryRecord {
        info!("collecting inventory");

        sink.emit(ListenerEvent::WorkStarted { total_steps });

        let cache = CommandCache::new(self.executor.clone()).with_timeout(self.command_timeout);
        let mut record = InventoryRecord::new();

        for entry in self.catalog.entries() {
            sink.emit(ListenerEvent::StepStarted {
                name: entry.name.clone(),
            });

            let value = match entry.source.produce(&cache, &self.tools).await {
                Ok(value) => {
                    debug!(fact = %entry.name, "fact collected");
                    value
                }
                Err(e) => {
                    warn!(fact = %entry.name, error = %e, "fact degraded to empty value");
                    FactValue::empty()
                }
            };
            record.insert(entry.name.clone(), value);

            sink.emit(ListenerEvent::StepCompleted);
        }

        let commands = cache.len().await;
        info!(facts = record.len(), commands, "inventory collection completed");

        record
    }
}
