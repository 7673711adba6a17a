//! Error types for mamabear-inventory

use thiserror::Error;

/// Errors raised while deriving a fact from command output
///
/// None of these abort a collection; the collector logs them and stores an
/// empty value for the fact.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InventoryError {
    /// The command produced no output (failed, timed out or missing)
    #[error("no output from {command}")]
    NoOutput {
        /// Command line that was run
        command: String,
    },

    /// No profiler line carries the expected label
    #[error("label {key:?} not found in {category} output")]
    LabelNotFound {
        /// Profiler category that was queried
        category: String,
        /// Label substring that was searched for
        key: String,
    },
}
