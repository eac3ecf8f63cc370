use async_trait::async_trait;
use beacon_event_schema::protocol::Event;

use crate::TransportError;

/// The delivery boundary of the pipeline.
///
/// A transport receives every event that survives the pipeline. Batching, retries and buffering
/// are entirely the transport's responsibility. `flush` and `close` default to no-ops.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Delivers one event.
    async fn send(&self, event: Event) -> Result<(), TransportError>;

    /// Forces delivery of any buffered events.
    async fn flush(&self) -> Result<(), TransportError> {
        Ok(())
    }

    /// Releases transport resources.
    async fn close(&self) -> Result<(), TransportError> {
        Ok(())
    }
}
