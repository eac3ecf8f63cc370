use std::error::Error;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use beacon_event_schema::protocol::{ErrorData, Event, EventData, Level};
use parking_lot::{Mutex, RwLock};

use crate::{CaptureError, EventPipeline, Hub, Integration, Scope, Transport, TransportError};

/// The monitoring client.
///
/// The client owns the registered integrations, the pipeline built from them, the [`Scope`] and
/// the [`Transport`]. It is always used behind an [`Arc`], so that it can bind itself to the
/// current [`Hub`] on [`init`](Self::init).
pub struct Monitoring {
    integrations: Mutex<Vec<Arc<dyn Integration>>>,
    setup_done: AtomicBool,
    pipeline: RwLock<Arc<EventPipeline>>,
    transport: RwLock<Option<Arc<dyn Transport>>>,
    scope: RwLock<Scope>,
}

impl Monitoring {
    /// Creates a new client without integrations or transport.
    pub fn new() -> Arc<Self> {
        Self::with_scope(Scope::new())
    }

    /// Creates a new client with an initial scope.
    pub fn with_scope(scope: Scope) -> Arc<Self> {
        Arc::new(Self {
            integrations: Mutex::new(Vec::new()),
            setup_done: AtomicBool::new(false),
            pipeline: RwLock::new(Arc::new(EventPipeline::new())),
            transport: RwLock::new(None),
            scope: RwLock::new(scope),
        })
    }

    /// Registers an integration.
    ///
    /// Integrations take effect on the next call to [`init`](Self::init). Their transforms run in
    /// registration order.
    pub fn add_integration(&self, integration: Arc<dyn Integration>) -> &Self {
        self.integrations.lock().push(integration);
        self
    }

    /// Returns the names of all registered integrations.
    pub fn integration_names(&self) -> Vec<String> {
        self.integrations
            .lock()
            .iter()
            .map(|i| i.name().to_owned())
            .collect()
    }

    /// Initializes the client with a transport.
    ///
    /// Binds this client to the current [`Hub`], if there is one, and runs the integration
    /// lifecycle:
    ///
    ///  1. `setup_once` of every integration, on the first call only.
    ///  2. `init` of every integration, on every call.
    ///  3. Rebuilds the pipeline from the integrations' transforms.
    ///
    /// Calling `init` again replaces the transport and rebuilds the pipeline from scratch, so
    /// transforms are never registered twice.
    pub fn init(self: &Arc<Self>, transport: Arc<dyn Transport>) {
        *self.transport.write() = Some(transport.clone());

        match Hub::current() {
            Some(hub) => hub.bind_client(Some(self.clone())),
            None => beacon_log::debug!("no hub bound to the current task"),
        }

        let integrations = self.integrations.lock().clone();

        if !self.setup_done.swap(true, Ordering::SeqCst) {
            for integration in &integrations {
                beacon_log::debug!(integration = integration.name(), "setting up integration");
                integration.setup_once();
            }
        }

        let mut pipeline = EventPipeline::new();
        for integration in integrations {
            beacon_log::debug!(integration = integration.name(), "initializing integration");
            integration.init(&transport);

            if let Some(transform) = integration.transform() {
                pipeline.push(transform);
            }
        }

        beacon_log::debug!(pipeline = ?pipeline, "client initialized");
        *self.pipeline.write() = Arc::new(pipeline);
    }

    /// Returns `true` if the client has a transport.
    pub fn is_enabled(&self) -> bool {
        self.transport.read().is_some()
    }

    /// Returns a snapshot of the current scope.
    pub fn scope(&self) -> Scope {
        self.scope.read().clone()
    }

    /// Modifies the scope.
    pub fn configure_scope<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Scope) -> R,
    {
        f(&mut self.scope.write())
    }

    /// Captures an event.
    ///
    /// The scope is merged into the event before it runs through the pipeline. If the event
    /// survives, it is sent to the transport. Events dropped by the pipeline, or captured before
    /// [`init`](Self::init), are discarded silently.
    pub async fn capture_event(&self, event: Event) -> Result<(), CaptureError> {
        let event = self.scope.read().apply_to_event(event);
        let pipeline = self.pipeline.read().clone();

        let Some(event) = pipeline.execute(event).await? else {
            return Ok(());
        };

        let transport = self.transport.read().clone();
        match transport {
            Some(transport) => transport.send(event).await?,
            None => beacon_log::debug!("discarding event without transport"),
        }

        Ok(())
    }

    /// Captures an error along with its chain of sources.
    ///
    /// The error's sources are recorded as the event's stack, one per line.
    pub async fn capture_error(&self, error: &(dyn Error + Send + Sync)) -> Result<(), CaptureError> {
        let mut event = Event::new(EventData::Error(ErrorData {
            message: Some(error.to_string()),
            stack: error_chain(error),
            ..ErrorData::default()
        }));
        event.ensure_timestamp();
        event.level = Some(Level::Error);

        self.capture_event(event).await
    }

    /// Captures a plain message.
    pub async fn capture_message(&self, message: &str, level: Level) -> Result<(), CaptureError> {
        let mut event = Event::message(message, level);
        event.ensure_timestamp();

        self.capture_event(event).await
    }

    /// Flushes the transport.
    pub async fn flush(&self) -> Result<(), TransportError> {
        let transport = self.transport.read().clone();
        match transport {
            Some(transport) => transport.flush().await,
            None => Ok(()),
        }
    }

    /// Flushes and closes the transport, then unbinds this client from the current [`Hub`].
    ///
    /// Events captured after closing are discarded until the client is initialized again.
    pub async fn close(self: &Arc<Self>) -> Result<(), TransportError> {
        self.flush().await?;

        let transport = self.transport.write().take();
        if let Some(hub) = Hub::current() {
            hub.unbind_client(self);
        }

        match transport {
            Some(transport) => transport.close().await,
            None => Ok(()),
        }
    }
}

impl fmt::Debug for Monitoring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Monitoring")
            .field("integrations", &self.integration_names())
            .field("pipeline", &self.pipeline.read())
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

fn error_chain(error: &dyn Error) -> Option<String> {
    let mut lines = Vec::new();
    let mut source = error.source();
    while let Some(s) = source {
        lines.push(format!("caused by: {s}"));
        source = s.source();
    }

    (!lines.is_empty()).then(|| lines.join("\n"))
}
