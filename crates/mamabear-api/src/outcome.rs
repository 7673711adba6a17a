//! Transmission outcome

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key under which a failure message is delivered to listeners
pub const ERROR_KEY: &str = "err";

/// Terminal result of the transmission phase of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "result", rename_all = "snake_case")]
pub enum TransmissionOutcome {
    /// Backend answered 200 with a JSON object, passed through verbatim
    Success(Map<String, Value>),
    /// Transport or protocol failure
    Failure(String),
}

impl TransmissionOutcome {
    /// Check if the backend accepted the inventory
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, TransmissionOutcome::Success(_))
    }

    /// Failure message, if any
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match self {
            TransmissionOutcome::Success(_) => None,
            TransmissionOutcome::Failure(msg) => Some(msg),
        }
    }

    /// Split into the `(success, result)` pair handed to a listener
    ///
    /// Failures become a single-entry map `{"err": message}`.
    #[must_use]
    pub fn into_listener_result(self) -> (bool, Map<String, Value>) {
        match self {
            TransmissionOutcome::Success(payload) => (true, payload),
            TransmissionOutcome::Failure(msg) => {
                let mut map = Map::new();
                map.insert(ERROR_KEY.to_string(), Value::String(msg));
                (false, map)
            }
        }
    }

    /// Rebuild an outcome from a listener's `(success, result)` pair
    #[must_use]
    pub fn from_listener_result(success: bool, mut result: Map<String, Value>) -> Self {
        if success {
            return TransmissionOutcome::Success(result);
        }
        match result.remove(ERROR_KEY) {
            Some(Value::String(msg)) => TransmissionOutcome::Failure(msg),
            Some(other) => TransmissionOutcome::Failure(other.to_string()),
            None => TransmissionOutcome::Failure(String::new()),
        }
    }
}
