//! Terminal listener

use std::io::Write;
use std::sync::{Mutex, PoisonError};

use mamabear_api::{ERROR_KEY, InventoryListener, ListenerEvent, ProgressSink, TransmissionOutcome};
use serde_json::{Map, Value};
use tracing::warn;

/// Prints run progress as text lines or JSON lines
pub struct ConsoleListener<W: Write> {
    out: W,
    json: bool,
    total: usize,
    current: usize,
}

impl<W: Write> ConsoleListener<W> {
    pub fn new(out: W, json: bool) -> Self {
        Self {
            out,
            json,
            total: 0,
            current: 0,
        }
    }

    // Output errors (closed pipe) must not fail the run
    fn line(&mut self, text: &str) {
        let _ = writeln!(self.out, "{text}");
    }

    fn event_line(&mut self, event: &ListenerEvent) {
        match serde_json::to_string(event) {
            Ok(text) => self.line(&text),
            Err(e) => warn!(error = %e, "failed to encode progress event"),
        }
    }
}

impl<W: Write> InventoryListener for ConsoleListener<W> {
    fn work_started(&mut self, total_steps: usize) {
        self.total = total_steps;
        self.current = 0;
        if self.json {
            self.event_line(&ListenerEvent::WorkStarted { total_steps });
        } else {
            self.line(&format!("Collecting inventory ({total_steps} steps)"));
        }
    }

    fn step_started(&mut self, name: &str) {
        self.current += 1;
        if self.json {
            self.event_line(&ListenerEvent::StepStarted {
                name: name.to_string(),
            });
        } else {
            let (current, total) = (self.current, self.total);
            self.line(&format!("[{current}/{total}] {name}"));
        }
    }

    fn step_completed(&mut self) {
        if self.json {
            self.event_line(&ListenerEvent::StepCompleted);
        }
    }

    fn work_completed(&mut self, success: bool, result: Map<String, Value>) {
        if self.json {
            let outcome = TransmissionOutcome::from_listener_result(success, result);
            self.event_line(&ListenerEvent::WorkCompleted { outcome });
            return;
        }

        if success {
            self.line("Inventory accepted by the backend.");
            let pretty = serde_json::to_string_pretty(&Value::Object(result)).unwrap_or_default();
            self.line(&pretty);
        } else {
            let message = result
                .get(ERROR_KEY)
                .and_then(Value::as_str)
                .unwrap_or("unknown error");
            self.line(&format!("Inventory was not delivered: {message}"));
        }
    }
}

/// Delivers events straight to a listener, on the emitting task
///
/// For collection-only runs, which have no run handle to drive.
pub struct ListenerSink<L> {
    listener: Mutex<L>,
}

impl<L: InventoryListener + Send> ListenerSink<L> {
    pub fn new(listener: L) -> Self {
        Self {
            listener: Mutex::new(listener),
        }
    }
}

impl<L: InventoryListener + Send> ProgressSink for ListenerSink<L> {
    fn emit(&self, event: ListenerEvent) {
        let mut listener = self.listener.lock().unwrap_or_else(PoisonError::into_inner);
        event.deliver(&mut *listener);
    }
}
