//! Pathfinder Client Library
//!
//! Provides the HTTP transport and the typed wire codec for the Pathfinder
//! rover control API.
//!
//! # Example
//!
//! ```rust,no_run
//! use pathfinder_client::{codec, endpoints, BatteryResponse, Method, PathfinderClient, Transport};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = PathfinderClient::new("http://localhost:8080")?;
//!
//!     let response = client.send(Method::GET, endpoints::BATTERY, None).await?;
//!     let battery: BatteryResponse = codec::decode(&response.body)?;
//!     println!("{}{}", battery.value, battery.unit);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Testing
//!
//! The `testing` module provides an in-process server for integration tests
//! and a scripted [`Transport`] that records every request:
//!
//! ```rust,ignore
//! use pathfinder_client::testing::{RecordingTransport, TestServer};
//!
//! let server = TestServer::start(router).await?;
//! let transport = RecordingTransport::new().respond(201, r#"{"moving":true}"#);
//! ```

mod client;
pub mod codec;
pub mod endpoints;
mod error;
pub mod testing;
mod transport;
mod types;

pub use client::{ClientConfig, PathfinderClient};
pub use codec::{CodecError, Envelope};
pub use error::{ClientError, Result};
pub use transport::{RawResponse, Transport};
pub use types::*;

// Re-export the HTTP vocabulary used by the transport
pub use reqwest::{Method, StatusCode};
