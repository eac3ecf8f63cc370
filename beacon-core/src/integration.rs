use std::sync::Arc;

use async_trait::async_trait;
use beacon_event_schema::protocol::Event;

use crate::{Transport, TransformError};

/// A per-event step of the [`EventPipeline`](crate::EventPipeline).
///
/// A transform receives the current event and returns either a (possibly modified) event or
/// `None` to drop it. Dropping is a successful outcome; errors are reserved for broken transforms
/// and abort the capture.
///
/// Synchronous closures can be turned into a transform with [`transform_fn`].
#[async_trait]
pub trait Transform: Send + Sync {
    /// The name under which this transform appears in logs and errors.
    fn name(&self) -> &str {
        "transform"
    }

    /// Applies this transform to an event.
    async fn apply(&self, event: Event) -> Result<Option<Event>, TransformError>;
}

/// A named transform backed by a synchronous closure.
///
/// Created by [`transform_fn`].
pub struct FnTransform<F> {
    name: &'static str,
    f: F,
}

/// Creates a named transform from a synchronous closure.
///
/// ```
/// use beacon_core::{EventPipeline, transform_fn};
///
/// let pipeline = EventPipeline::new().with(transform_fn("tag", |mut event| {
///     event.tags.insert("release".to_owned(), "1.0".to_owned());
///     Ok(Some(event))
/// }));
/// # assert_eq!(pipeline.len(), 1);
/// ```
pub fn transform_fn<F>(name: &'static str, f: F) -> FnTransform<F>
where
    F: Fn(Event) -> Result<Option<Event>, TransformError> + Send + Sync,
{
    FnTransform { name, f }
}

#[async_trait]
impl<F> Transform for FnTransform<F>
where
    F: Fn(Event) -> Result<Option<Event>, TransformError> + Send + Sync,
{
    fn name(&self) -> &str {
        self.name
    }

    async fn apply(&self, event: Event) -> Result<Option<Event>, TransformError> {
        (self.f)(event)
    }
}

/// A pluggable unit that hooks into the client lifecycle.
///
/// All hooks are optional:
///
///  - [`setup_once`](Self::setup_once) runs on the first [`Monitoring::init`] of a client only.
///  - [`init`](Self::init) runs on every [`Monitoring::init`] and receives the transport.
///  - [`transform`](Self::transform) contributes a per-event step to the pipeline.
///
/// [`Monitoring::init`]: crate::Monitoring::init
pub trait Integration: Send + Sync {
    /// A unique, human-readable name.
    fn name(&self) -> &str;

    /// One-time global setup, such as registering listeners.
    fn setup_once(&self) {}

    /// Per-initialization setup.
    fn init(&self, transport: &Arc<dyn Transport>) {
        let _ = transport;
    }

    /// Returns the per-event transform of this integration, if any.
    fn transform(self: Arc<Self>) -> Option<Arc<dyn Transform>> {
        None
    }
}
