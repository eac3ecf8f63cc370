//! Event schema for the Beacon pipeline.
//!
//! An [`Event`](protocol::Event) is one unit of telemetry captured by application code. It is
//! made of a shared envelope (timestamp, severity, user, tags, breadcrumbs, metadata written by
//! integrations) and a category-specific payload in [`EventData`](protocol::EventData).
//!
//! On the wire, events are flat JSON records discriminated by their `type` field:
//!
//! ```json
//! {
//!   "type": "error",
//!   "timestamp": "2024-01-01T00:00:00.000Z",
//!   "message": "Cannot read properties of undefined",
//!   "stack": "TypeError: Cannot read properties of undefined\n    at render (app.js:10:5)",
//!   "tags": {"env": "production"},
//!   "_deduplication": {"fingerprint": "1k3x9a", "count": 1}
//! }
//! ```
#![warn(missing_docs)]

pub mod protocol;
