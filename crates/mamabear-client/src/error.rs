//! Error types for the transmission client

use thiserror::Error;

/// Errors that can occur while transmitting an inventory
///
/// The `Display` text of each variant is the failure message reported to listeners.
#[derive(Error, Debug)]
pub enum ClientError {
    /// No response was received
    #[error("{0}")]
    Transport(String),

    /// Failed to build the HTTP client
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Inventory could not be encoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid backend URL
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Backend answered with a status other than 200
    #[error("The backend responded with HTTP error {status}.")]
    Status {
        /// HTTP status code
        status: u16,
    },

    /// Backend answered 200 with a body that is not a JSON object
    #[error("The backend didn't respond with a valid response.")]
    InvalidResponse,
}

/// Result type for client operations
pub type Result<T> = std::result::Result<T, ClientError>;
