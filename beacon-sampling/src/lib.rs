//! Probabilistic sampling of events.
//!
//! The [`SamplingIntegration`] keeps each event with the probability configured for its category
//! and drops it otherwise. Retained events carry the provenance of the decision:
//!
//! ```json
//! {
//!   "type": "webVital",
//!   "name": "LCP",
//!   "_sampling": {"rate": 0.1, "sampled": true, "timestamp": 1704067200000}
//! }
//! ```
//!
//! Rates are validated when the integration is created, never at event time.

#![warn(missing_docs)]

use std::sync::Arc;

use async_trait::async_trait;
use beacon_common::UnixTimestamp;
use beacon_core::{Integration, Transform, TransformError};
use beacon_event_schema::protocol::{Event, SamplingMeta};
use parking_lot::Mutex;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

mod config;
mod evaluation;

pub use self::config::*;
pub use self::evaluation::*;

/// Keeps events with a per-category probability.
#[derive(Debug)]
pub struct SamplingIntegration {
    config: SamplingConfig,
    rng: Mutex<Pcg32>,
}

impl SamplingIntegration {
    /// Creates the integration with a randomly seeded generator.
    ///
    /// Fails if a rate lies outside of `[0, 1]`.
    pub fn new(config: SamplingConfig) -> Result<Self, SamplingConfigError> {
        Self::with_seed(config, rand::random())
    }

    /// Creates the integration with a fixed seed, which makes decisions reproducible.
    pub fn with_seed(config: SamplingConfig, seed: u64) -> Result<Self, SamplingConfigError> {
        config.validate()?;

        Ok(Self {
            config,
            rng: Mutex::new(Pcg32::seed_from_u64(seed)),
        })
    }

    /// Returns the configuration of this integration.
    pub fn config(&self) -> &SamplingConfig {
        &self.config
    }

    /// Samples an event and stamps the decision with `now`.
    ///
    /// Returns `None` if the event was sampled out.
    pub fn process(&self, mut event: Event, now: UnixTimestamp) -> Option<Event> {
        let rate = sample_rate(&self.config, &event.ty());
        let random_number = self.rng.lock().random::<f64>();

        if !sampling_match(rate, random_number) {
            return None;
        }

        event.sampling = Some(SamplingMeta {
            rate,
            sampled: true,
            timestamp: now,
        });

        Some(event)
    }
}

impl Integration for SamplingIntegration {
    fn name(&self) -> &str {
        "sampling"
    }

    fn transform(self: Arc<Self>) -> Option<Arc<dyn Transform>> {
        Some(self)
    }
}

#[async_trait]
impl Transform for SamplingIntegration {
    fn name(&self) -> &str {
        "sampling"
    }

    async fn apply(&self, event: Event) -> Result<Option<Event>, TransformError> {
        Ok(self.process(event, UnixTimestamp::now()))
    }
}
