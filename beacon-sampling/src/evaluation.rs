//! Sampling decisions.

use beacon_event_schema::protocol::EventType;

use crate::SamplingConfig;

/// Returns the sample rate that applies to an event category.
///
/// `error` events use the error rate. Every other category, including unhandled rejections and
/// custom categories, uses the performance rate.
pub fn sample_rate(config: &SamplingConfig, ty: &EventType) -> f64 {
    match ty {
        EventType::Error => config.error_sample_rate,
        EventType::WebVital | EventType::Performance => config.performance_sample_rate,
        EventType::UnhandledRejection | EventType::Message | EventType::Custom(_) => {
            config.performance_sample_rate
        }
    }
}

/// Decides whether an event is kept, given a uniform random draw in `[0, 1)`.
///
/// A rate of `0` drops every event and a rate of `1` keeps every event.
pub fn sampling_match(sample_rate: f64, random_number: f64) -> bool {
    beacon_log::trace!(sample_rate, random_number, "applying sampling to event");

    if random_number >= sample_rate {
        beacon_log::trace!("dropping event that was sampled out");
        false
    } else {
        beacon_log::trace!("keeping event that was sampled in");
        true
    }
}
