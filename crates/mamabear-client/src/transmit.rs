//! HTTP transmission of inventory records

use std::error::Error as _;

use mamabear_api::{InventoryRecord, TransmissionOutcome};
use reqwest::header::{self, CONTENT_TYPE, HeaderValue};
use reqwest::{Client, StatusCode};
use serde_json::{Map, Value};
use tokio::sync::oneshot;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::error::{ClientError, Result};

/// User-Agent sent with every inventory
pub const USER_AGENT: &str = concat!(
    "mamabear-i3/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/MamabearIO/i3)"
);

/// Client posting inventory records to the backend
///
/// Exactly one request is made per call; there is no retry and no timeout beyond
/// the HTTP stack's defaults.
#[derive(Debug, Clone)]
pub struct TransmissionClient {
    client: Client,
    url: Url,
}

impl TransmissionClient {
    /// Create a new client for `url`
    ///
    /// # Errors
    /// Returns an error if the URL is invalid or the HTTP client cannot be built.
    pub fn new(url: impl AsRef<str>) -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Self::with_client(url, client)
    }

    /// Create a new client with a custom `reqwest::Client`
    ///
    /// The User-Agent is set on every request, whatever the client's defaults.
    ///
    /// # Errors
    /// Returns an error if the URL is invalid.
    pub fn with_client(url: impl AsRef<str>, client: Client) -> Result<Self> {
        let url = Url::parse(url.as_ref())?;
        Ok(Self { client, url })
    }

    /// Backend endpoint
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Send `record` and map the response onto an outcome
    #[instrument(skip_all, fields(url = %self.url, facts = record.len()))]
    pub async fn transmit(&self, record: &InventoryRecord) -> TransmissionOutcome {
        match self.send(record).await {
            Ok(payload) => {
                info!("backend accepted inventory");
                TransmissionOutcome::Success(payload)
            }
            Err(e) => {
                warn!(error = %e, "inventory transmission failed");
                TransmissionOutcome::Failure(e.to_string())
            }
        }
    }

    /// Transmit on a background task
    ///
    /// The receiver yields exactly one outcome.
    #[must_use]
    pub fn spawn_transmit(
        &self,
        record: InventoryRecord,
    ) -> oneshot::Receiver<TransmissionOutcome> {
        let (tx, rx) = oneshot::channel();
        let client = self.clone();

        tokio::spawn(async move {
            let outcome = client.transmit(&record).await;
            if tx.send(outcome).is_err() {
                debug!("transmission outcome dropped, receiver gone");
            }
        });

        rx
    }

    /// Perform the POST and parse the response body
    ///
    /// # Errors
    /// Returns an error on transport failure, a status other than 200, or a body
    /// that is not a JSON object.
    pub async fn send(&self, record: &InventoryRecord) -> Result<Map<String, Value>> {
        let body = serde_json::to_vec(record)?;

        debug!(bytes = body.len(), "posting inventory");

        let response = self
            .client
            .post(self.url.clone())
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .header(header::USER_AGENT, HeaderValue::from_static(USER_AGENT))
            .body(body)
            .send()
            .await
            .map_err(|e| ClientError::Transport(error_chain(&e)))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ClientError::Status {
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClientError::Transport(error_chain(&e)))?;

        serde_json::from_slice::<Map<String, Value>>(&bytes)
            .map_err(|_| ClientError::InvalidResponse)
    }
}

/// Render an error with its sources, e.g. `error sending request: connection refused`
fn error_chain(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.contains(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }
    message
}
