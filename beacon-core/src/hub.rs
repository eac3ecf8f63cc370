use std::error::Error;
use std::future::Future;
use std::sync::Arc;

use beacon_event_schema::protocol::{Event, Level};
use parking_lot::RwLock;

use crate::{CaptureError, Monitoring};

tokio::task_local! {
    static CURRENT_HUB: Arc<Hub>;
}

/// A handle to the client of the current task.
///
/// Ambient capture helpers such as [`capture_event`] resolve the client through the hub bound to
/// the running task with [`Hub::run`]. There is no process-wide hub: outside of [`Hub::run`], and
/// before a client is bound, the helpers do nothing.
///
/// Task-locals are not inherited by spawned tasks. To capture from a spawned task, run it within
/// the same hub:
///
/// ```
/// use std::sync::Arc;
/// use beacon_core::Hub;
///
/// # async fn example() {
/// let hub = Arc::new(Hub::new());
/// tokio::spawn(Hub::run(hub.clone(), async {
///     assert!(Hub::current().is_some());
/// }));
/// # }
/// ```
#[derive(Debug, Default)]
pub struct Hub {
    client: RwLock<Option<Arc<Monitoring>>>,
}

impl Hub {
    /// Creates a hub without a client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a hub bound to the given client.
    pub fn with_client(client: Arc<Monitoring>) -> Self {
        Self {
            client: RwLock::new(Some(client)),
        }
    }

    /// Returns the hub bound to the current task, if any.
    pub fn current() -> Option<Arc<Hub>> {
        CURRENT_HUB.try_with(Arc::clone).ok()
    }

    /// Runs a future with the given hub bound as the current hub.
    pub async fn run<F>(hub: Arc<Hub>, future: F) -> F::Output
    where
        F: Future,
    {
        CURRENT_HUB.scope(hub, future).await
    }

    /// Returns the client bound to this hub.
    pub fn client(&self) -> Option<Arc<Monitoring>> {
        self.client.read().clone()
    }

    /// Binds a client to this hub, replacing the previous one.
    pub fn bind_client(&self, client: Option<Arc<Monitoring>>) {
        *self.client.write() = client;
    }

    /// Unbinds the given client, unless another client has been bound in the meantime.
    pub(crate) fn unbind_client(&self, client: &Arc<Monitoring>) {
        let mut current = self.client.write();
        if current.as_ref().is_some_and(|c| Arc::ptr_eq(c, client)) {
            *current = None;
        }
    }
}

/// Returns the client bound to the current hub.
///
/// Returns `None` outside of [`Hub::run`] or before any client was initialized in it.
pub fn current_client() -> Option<Arc<Monitoring>> {
    Hub::current()?.client()
}

/// Captures an event with the current client.
///
/// Does nothing if there is no current client.
pub async fn capture_event(event: Event) -> Result<(), CaptureError> {
    match current_client() {
        Some(client) => client.capture_event(event).await,
        None => Ok(()),
    }
}

/// Captures an error with the current client.
///
/// Does nothing if there is no current client.
pub async fn capture_error(error: &(dyn Error + Send + Sync)) -> Result<(), CaptureError> {
    match current_client() {
        Some(client) => client.capture_error(error).await,
        None => Ok(()),
    }
}

/// Captures a message with the current client.
///
/// Does nothing if there is no current client.
pub async fn capture_message(message: &str, level: Level) -> Result<(), CaptureError> {
    match current_client() {
        Some(client) => client.capture_message(message, level).await,
        None => Ok(()),
    }
}
