//! Core error types for mamabear-core

use thiserror::Error;

/// Errors raised while configuring or driving a run
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration file could not be read
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file is not valid TOML for the expected schema
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// Configuration value out of range or malformed
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// Transmission client could not be built
    #[error("client error: {0}")]
    Client(#[from] mamabear_client::ClientError),

    /// The run task stopped without reporting an outcome
    #[error("run aborted: {0}")]
    RunAborted(String),
}
