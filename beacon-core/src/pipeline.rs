use std::fmt;
use std::sync::Arc;

use beacon_event_schema::protocol::Event;

use crate::{CaptureError, Transform};

/// An ordered chain of event transforms with early exit.
///
/// Transforms run strictly one after another. Each receives the event returned by its
/// predecessor. As soon as one transform drops the event, no later transform is invoked.
#[derive(Clone, Default)]
pub struct EventPipeline {
    transforms: Vec<Arc<dyn Transform>>,
}

impl EventPipeline {
    /// Creates an empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a transform to the end of the pipeline.
    pub fn push(&mut self, transform: Arc<dyn Transform>) -> &mut Self {
        self.transforms.push(transform);
        self
    }

    /// Appends a transform and returns the pipeline for chaining.
    pub fn with(mut self, transform: impl Transform + 'static) -> Self {
        self.push(Arc::new(transform));
        self
    }

    /// Returns the number of transforms.
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    /// Returns `true` if the pipeline has no transforms.
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Runs an event through all transforms.
    ///
    /// Returns `Ok(None)` if a transform dropped the event.
    pub async fn execute(&self, mut event: Event) -> Result<Option<Event>, CaptureError> {
        for transform in &self.transforms {
            let result = transform.apply(event).await;

            event = match result {
                Ok(Some(event)) => event,
                Ok(None) => {
                    beacon_log::trace!(stage = transform.name(), "event dropped");
                    return Ok(None);
                }
                Err(source) => {
                    return Err(CaptureError::Transform {
                        stage: transform.name().to_owned(),
                        source,
                    });
                }
            };
        }

        Ok(Some(event))
    }
}

impl fmt::Debug for EventPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.transforms.iter().map(|t| t.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use beacon_event_schema::protocol::Level;
    use parking_lot::Mutex;
    use similar_asserts::assert_eq;

    use super::*;
    use crate::{TransformError, transform_fn};

    /// Appends its name to a shared log and passes the event on.
    struct Record {
        name: &'static str,
        log: Arc<Mutex<Vec<&'static str>>>,
        delay: Option<Duration>,
    }

    #[async_trait]
    impl Transform for Record {
        fn name(&self) -> &str {
            self.name
        }

        async fn apply(&self, event: Event) -> Result<Option<Event>, TransformError> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.log.lock().push(self.name);
            Ok(Some(event))
        }
    }

    fn record(name: &'static str, log: &Arc<Mutex<Vec<&'static str>>>) -> Record {
        Record {
            name,
            log: log.clone(),
            delay: None,
        }
    }

    #[tokio::test]
    async fn test_runs_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));

        let pipeline = EventPipeline::new()
            .with(Record {
                delay: Some(Duration::from_millis(20)),
                ..record("first", &log)
            })
            .with(record("second", &log))
            .with(record("third", &log));

        let event = pipeline
            .execute(Event::message("hello", Level::Info))
            .await
            .unwrap();

        assert!(event.is_some());
        assert_eq!(*log.lock(), vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_drop_short_circuits() {
        let calls = Arc::new(AtomicUsize::new(0));
        let spy = {
            let calls = calls.clone();
            transform_fn("spy", move |event| {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(Some(event))
            })
        };

        let pipeline = EventPipeline::new()
            .with(transform_fn("pass", |event| Ok(Some(event))))
            .with(transform_fn("drop", |_event| Ok(None)))
            .with(spy);

        let result = pipeline
            .execute(Event::message("hello", Level::Info))
            .await
            .unwrap();

        assert!(result.is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_transforms_see_previous_changes() {
        let pipeline = EventPipeline::new()
            .with(transform_fn("one", |mut event| {
                event.tags.insert("stage".to_owned(), "one".to_owned());
                Ok(Some(event))
            }))
            .with(transform_fn("two", |mut event| {
                let previous = event.tags.get("stage").cloned().unwrap_or_default();
                event.tags.insert("stage".to_owned(), format!("{previous}+two"));
                Ok(Some(event))
            }));

        let event = pipeline
            .execute(Event::message("hello", Level::Info))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(event.tags["stage"].as_str(), "one+two");
    }

    #[tokio::test]
    async fn test_error_names_stage() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let pipeline = EventPipeline::new()
            .with(transform_fn("broken", |_event| Err(TransformError::new("boom"))))
            .with(record("after", &log));

        let error = pipeline
            .execute(Event::message("hello", Level::Info))
            .await
            .unwrap_err();

        assert!(matches!(error, CaptureError::Transform { ref stage, .. } if stage == "broken"));
        assert!(log.lock().is_empty());
    }

    #[tokio::test]
    async fn test_empty_pipeline_passes() {
        let pipeline = EventPipeline::new();
        assert!(pipeline.is_empty());

        let event = Event::message("hello", Level::Info);
        let result = pipeline.execute(event.clone()).await.unwrap();
        assert_eq!(result, Some(event));
    }
}
