//! mamabear-core: Configuration and run orchestration
//!
//! Wires the collector and the transmission client together for one
//! collection-and-send cycle, and marshals progress events to the task that
//! drives the listener.

pub mod config;
pub mod error;
pub mod run;

pub use config::{CollectorConfig, Config, FleetBranding, FleetConfig};
pub use error::CoreError;
pub use run::{InventoryRun, RunHandle};
