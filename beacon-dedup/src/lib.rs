//! Fingerprint-based deduplication of events.
//!
//! The [`DeduplicationIntegration`] computes a [`fingerprint`] for every error-like, message,
//! performance and web vital event. Repeats of a fingerprint within the configured time window
//! are dropped. The first event of every window passes and carries `_deduplication` metadata:
//!
//! ```json
//! {
//!   "type": "error",
//!   "message": "x is undefined",
//!   "_deduplication": {"fingerprint": "-1xk8mo", "count": 1}
//! }
//! ```
//!
//! Fingerprints are kept in a cache of fixed capacity that evicts in insertion order.

#![warn(missing_docs)]

use std::sync::Arc;

use async_trait::async_trait;
use beacon_common::UnixTimestamp;
use beacon_core::{Integration, Transform, TransformError};
use beacon_event_schema::protocol::{DeduplicationMeta, Event};
use parking_lot::Mutex;

mod cache;
mod config;
mod fingerprint;
mod normalize;

pub use self::cache::{CacheEntry, Decision};
pub use self::config::*;
pub use self::fingerprint::*;
pub use self::normalize::*;

use self::cache::FingerprintCache;

/// Drops repeated events within a time window.
#[derive(Debug)]
pub struct DeduplicationIntegration {
    config: DeduplicationConfig,
    cache: Mutex<FingerprintCache>,
}

impl DeduplicationIntegration {
    /// Creates the integration from a configuration.
    pub fn new(config: DeduplicationConfig) -> Result<Self, DeduplicationConfigError> {
        if config.max_cache_size == 0 {
            return Err(DeduplicationConfigError::ZeroCapacity);
        }

        let cache = FingerprintCache::new(config.max_cache_size, config.window());

        Ok(Self {
            config,
            cache: Mutex::new(cache),
        })
    }

    /// Returns the configuration of this integration.
    pub fn config(&self) -> &DeduplicationConfig {
        &self.config
    }

    /// Returns the number of cached fingerprints.
    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    /// Returns `true` if no fingerprint is cached.
    pub fn is_empty(&self) -> bool {
        self.cache.lock().is_empty()
    }

    /// Returns the cache entry of a fingerprint.
    pub fn get(&self, fingerprint: &str) -> Option<CacheEntry> {
        self.cache.lock().get(fingerprint)
    }

    /// Deduplicates an event as if it was seen at `now`.
    ///
    /// Returns `None` if the event repeats a fingerprint within the window. Events of categories
    /// that are not deduplicated pass unchanged.
    pub fn process(&self, mut event: Event, now: UnixTimestamp) -> Option<Event> {
        let Some(fingerprint) = fingerprint(&event) else {
            return Some(event);
        };

        let decision = self.cache.lock().check(&fingerprint, now);

        match decision {
            Decision::Suppress { count } => {
                beacon_log::trace!(fingerprint = %fingerprint, count, "dropping duplicate event");
                None
            }
            Decision::Pass { count } => {
                event.deduplication = Some(DeduplicationMeta { fingerprint, count });
                Some(event)
            }
        }
    }
}

impl Integration for DeduplicationIntegration {
    fn name(&self) -> &str {
        "deduplication"
    }

    fn transform(self: Arc<Self>) -> Option<Arc<dyn Transform>> {
        Some(self)
    }
}

#[async_trait]
impl Transform for DeduplicationIntegration {
    fn name(&self) -> &str {
        "deduplication"
    }

    async fn apply(&self, event: Event) -> Result<Option<Event>, TransformError> {
        Ok(self.process(event, UnixTimestamp::now()))
    }
}

#[cfg(test)]
mod tests {
    use beacon_event_schema::protocol::{CustomData, EventData, Level, Object};

    use super::*;

    fn at(millis: u64) -> UnixTimestamp {
        UnixTimestamp::from_millis(millis)
    }

    fn dedup(max_cache_size: usize, time_window: u64) -> DeduplicationIntegration {
        DeduplicationIntegration::new(DeduplicationConfig {
            max_cache_size,
            time_window,
        })
        .unwrap()
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let result = DeduplicationIntegration::new(DeduplicationConfig {
            max_cache_size: 0,
            ..DeduplicationConfig::default()
        });

        assert_eq!(result.unwrap_err(), DeduplicationConfigError::ZeroCapacity);
    }

    #[test]
    fn test_default_config_accepted() {
        let dedup = DeduplicationIntegration::new(DeduplicationConfig::default()).unwrap();
        assert_eq!(dedup.config().max_cache_size, DEFAULT_MAX_CACHE_SIZE);
        assert!(dedup.is_empty());
    }

    #[test]
    fn test_suffixed_ids_share_fingerprint() {
        let dedup = dedup(10, 1000);

        let first = Event::message("request_id=8f2c failed", Level::Error);
        let second = Event::message("request_id=91aa failed", Level::Error);
        assert!(dedup.process(first, at(0)).is_some());
        assert!(dedup.process(second, at(1)).is_none());
    }

    #[test]
    fn test_metadata_on_first_sighting() {
        let dedup = dedup(10, 1000);
        let event = dedup.process(Event::error("boom", None), at(0)).unwrap();

        let meta = event.deduplication.unwrap();
        assert!(!meta.fingerprint.is_empty());
        assert_eq!(meta.count, 1);
        assert_eq!(dedup.get(&meta.fingerprint).map(|e| e.count), Some(1));
    }

    #[test]
    fn test_count_after_window() {
        let dedup = dedup(10, 100);

        assert!(dedup.process(Event::error("boom", None), at(0)).is_some());
        assert!(dedup.process(Event::error("boom", None), at(10)).is_none());
        assert!(dedup.process(Event::error("boom", None), at(20)).is_none());

        let event = dedup.process(Event::error("boom", None), at(150)).unwrap();
        assert_eq!(event.deduplication.map(|meta| meta.count), Some(3));
    }

    #[test]
    fn test_other_categories_pass_untouched() {
        let dedup = dedup(10, 1000);
        let click = Event::new(EventData::Custom(CustomData {
            ty: "click".to_owned(),
            fields: Object::new(),
        }));

        for _ in 0..3 {
            let event = dedup.process(click.clone(), at(0)).unwrap();
            assert!(event.deduplication.is_none());
        }
        assert!(dedup.is_empty());
    }

    #[test]
    fn test_messages_deduplicated() {
        let dedup = dedup(10, 1000);

        assert!(dedup.process(Event::message("took 5ms", Level::Info), at(0)).is_some());
        assert!(dedup.process(Event::message("took 9ms", Level::Warning), at(1)).is_none());
        assert_eq!(dedup.len(), 1);
    }
}
