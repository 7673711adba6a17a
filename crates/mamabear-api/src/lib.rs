//! mamabear-api: Shared inventory types
//!
//! Contains the inventory record, transmission outcome and listener event types
//! shared by the collector, the transmission client and any front end.

pub mod events;
pub mod outcome;
pub mod record;

pub use events::{InventoryListener, ListenerEvent, ProgressSink, RecordingSink, TRANSMIT_STEP};
pub use outcome::{ERROR_KEY, TransmissionOutcome};
pub use record::{FactValue, InventoryRecord};
