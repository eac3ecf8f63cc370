//! Event pipeline, scope and client lifecycle for Beacon.
//!
//! Events captured by application code flow through a fixed sequence of steps:
//!
//!  1. The [`Monitoring`] client merges its [`Scope`] into the event.
//!  2. The event runs through the [`EventPipeline`], one [`Transform`] per registered
//!     [`Integration`] in registration order. Any transform may drop the event.
//!  3. A surviving event is handed to the configured [`Transport`].
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use beacon_core::{Hub, Monitoring};
//! use beacon_core::test::TestTransport;
//! use beacon_event_schema::protocol::{Event, Level};
//!
//! let transport = Arc::new(TestTransport::new());
//!
//! Hub::run(Arc::new(Hub::new()), async {
//!     let client = Monitoring::new();
//!     client.init(transport.clone());
//!
//!     beacon_core::capture_message("hello", Level::Info).await.unwrap();
//! })
//! .await;
//!
//! assert_eq!(transport.len(), 1);
//! ```
//!
//! # Concurrency
//!
//! The client can be shared across tasks. Scope and pipeline are snapshotted at the start of each
//! capture, so concurrent calls to [`Monitoring::init`] or [`Monitoring::configure_scope`] never
//! affect an event that is already in flight. There is no ordering guarantee between concurrent
//! captures: an event whose transforms suspend longer may reach the transport after a later one.

#![warn(missing_docs)]

mod client;
mod error;
mod hub;
mod integration;
mod pipeline;
mod scope;
mod transport;

#[cfg(any(test, feature = "test"))]
pub mod test;

pub use self::client::*;
pub use self::error::*;
pub use self::hub::*;
pub use self::integration::*;
pub use self::pipeline::*;
pub use self::scope::*;
pub use self::transport::*;
