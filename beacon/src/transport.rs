//! Transports shipped with Beacon.

use std::io::{self, Write};

use async_trait::async_trait;
use beacon_core::{Transport, TransportError};
use beacon_event_schema::protocol::Event;
use parking_lot::Mutex;

/// Writes every event as a single line of JSON.
///
/// Writes happen synchronously while sending, so the writer should be buffered or cheap to write
/// to.
#[derive(Debug)]
pub struct JsonLinesTransport<W> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonLinesTransport<W> {
    /// Creates a transport writing to `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Consumes the transport and returns the writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl JsonLinesTransport<io::Stdout> {
    /// Creates a transport writing to standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

#[async_trait]
impl<W: Write + Send> Transport for JsonLinesTransport<W> {
    async fn send(&self, event: Event) -> Result<(), TransportError> {
        let mut writer = self.writer.lock();
        serde_json::to_writer(&mut *writer, &event).map_err(TransportError::new)?;
        writer.write_all(b"\n")?;
        Ok(())
    }

    async fn flush(&self) -> Result<(), TransportError> {
        self.writer.lock().flush()?;
        Ok(())
    }

    async fn close(&self) -> Result<(), TransportError> {
        self.flush().await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use beacon_event_schema::protocol::Level;

    use super::*;

    #[tokio::test]
    async fn test_writes_one_line_per_event() {
        let transport = JsonLinesTransport::new(Vec::new());
        transport.send(Event::message("first", Level::Info)).await.unwrap();
        transport.send(Event::error("second", None)).await.unwrap();

        let output = String::from_utf8(transport.into_inner()).unwrap();
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 2);

        let first = Event::from_json(lines[0]).unwrap();
        assert_eq!(first, Event::message("first", Level::Info));
    }

    #[tokio::test]
    async fn test_recover_writer_after_close() {
        let transport = Arc::new(JsonLinesTransport::new(Vec::new()));
        let client = beacon_core::Monitoring::new();
        client.init(transport.clone());

        client.capture_message("hello", Level::Info).await.unwrap();
        client.close().await.unwrap();

        let transport = Arc::into_inner(transport).unwrap();
        let output = String::from_utf8(transport.into_inner()).unwrap();
        assert!(output.ends_with('\n'));
        assert_eq!(output.lines().count(), 1);
    }
}
