//! Progress events and the listener interface

use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::outcome::TransmissionOutcome;

/// Step name announced before the inventory is sent to the backend
pub const TRANSMIT_STEP: &str = "Transmitting to mothership...";

/// Progress notification emitted during a run
///
/// A run emits exactly one `WorkStarted`, a `StepStarted`/`StepCompleted` pair per
/// fact, a final unpaired `StepStarted` for transmission and exactly one
/// `WorkCompleted`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ListenerEvent {
    WorkStarted { total_steps: usize },
    StepStarted { name: String },
    StepCompleted,
    WorkCompleted { outcome: TransmissionOutcome },
}

impl ListenerEvent {
    /// Invoke the matching listener callback
    pub fn deliver(self, listener: &mut dyn InventoryListener) {
        match self {
            ListenerEvent::WorkStarted { total_steps } => listener.work_started(total_steps),
            ListenerEvent::StepStarted { name } => listener.step_started(&name),
            ListenerEvent::StepCompleted => listener.step_completed(),
            ListenerEvent::WorkCompleted { outcome } => {
                let (success, result) = outcome.into_listener_result();
                listener.work_completed(success, result);
            }
        }
    }

    /// Check if this is the terminal event of a run
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, ListenerEvent::WorkCompleted { .. })
    }
}

/// Presentation-side observer of a run
///
/// Implemented by front ends. Callbacks are always invoked from the task that
/// drives the run handle, never from the collection or transmission tasks.
pub trait InventoryListener {
    fn work_started(&mut self, total_steps: usize);
    fn step_started(&mut self, name: &str);
    fn step_completed(&mut self);
    fn work_completed(&mut self, success: bool, result: Map<String, Value>);
}

/// Producer-side sink for progress events
pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: ListenerEvent);
}

/// Sink that keeps every event in memory, in emission order
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<ListenerEvent>>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events emitted so far
    #[must_use]
    pub fn events(&self) -> Vec<ListenerEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ProgressSink for RecordingSink {
    fn emit(&self, event: ListenerEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}
