//! mamabear-exec: Local command execution
//!
//! Provides the executor trait, a local `tokio::process` implementation and a
//! per-run memoizing cache keyed by program and arguments.

pub mod cache;
pub mod error;
pub mod local;
pub mod result;
pub mod traits;

pub use cache::CommandCache;
pub use error::ExecError;
pub use local::LocalExecutor;
pub use result::{CommandKey, CommandResult};
pub use traits::CommandExecutor;
