//! Helpers for testing the pipeline.
//!
//! Requires the `test` feature.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use beacon_event_schema::protocol::Event;
use parking_lot::Mutex;

use crate::{Transport, TransportError};

/// A transport that records every event it receives.
#[derive(Debug, Default)]
pub struct TestTransport {
    events: Mutex<Vec<Event>>,
    failing: AtomicBool,
    flushes: AtomicUsize,
    closed: AtomicBool,
}

impl TestTransport {
    /// Creates an empty transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `send` fail.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Returns a copy of all received events.
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }

    /// Removes and returns all received events.
    pub fn take_events(&self) -> Vec<Event> {
        std::mem::take(&mut *self.events.lock())
    }

    /// Returns the number of received events.
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Returns `true` if no event was received.
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// Returns how often the transport was flushed.
    pub fn flush_count(&self) -> usize {
        self.flushes.load(Ordering::SeqCst)
    }

    /// Returns `true` once the transport was closed.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for TestTransport {
    async fn send(&self, event: Event) -> Result<(), TransportError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(TransportError::new("transport unavailable"));
        }

        self.events.lock().push(event);
        Ok(())
    }

    async fn flush(&self) -> Result<(), TransportError> {
        self.flushes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn close(&self) -> Result<(), TransportError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}
