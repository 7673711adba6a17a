//! mamabear-client: Inventory transmission client
//!
//! Sends one inventory record to the backend and maps the response onto a
//! [`TransmissionOutcome`](mamabear_api::TransmissionOutcome).
//!
//! ```no_run
//! use mamabear_api::InventoryRecord;
//! use mamabear_client::TransmissionClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = TransmissionClient::new("http://localhost:7777/inventory/mamabear")?;
//! let outcome = client.transmit(&InventoryRecord::new()).await;
//! println!("accepted: {}", outcome.is_success());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod transmit;

pub use error::{ClientError, Result};
pub use transmit::{TransmissionClient, USER_AGENT};
