//! mamabear-inventory: Host fact collection
//!
//! Declares the ordered fact catalog, the helpers that parse `system_profiler`,
//! `sw_vers` and home directory listings, and the collector that runs the
//! catalog while reporting progress.

pub mod catalog;
pub mod collector;
pub mod error;
pub mod parse;

pub use catalog::{CatalogEntry, FactCatalog, FactSource, ToolPaths};
pub use collector::InventoryCollector;
pub use error::InventoryError;
