use beacon_common::UnixTimestamp;
use serde::{Deserialize, Serialize};

/// Provenance of a sampling decision, attached as `_sampling` to every retained event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SamplingMeta {
    /// The sample rate in `[0, 1]` that was applied to the event.
    pub rate: f64,
    /// Whether the event was sampled. Always `true` on events that leave the pipeline.
    pub sampled: bool,
    /// When the sampling decision was made.
    pub timestamp: UnixTimestamp,
}

/// Deduplication state, attached as `_deduplication` to every event that passed deduplication.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct DeduplicationMeta {
    /// The fingerprint under which the event was deduplicated.
    pub fingerprint: String,
    /// `1` on the first sighting, otherwise the number of sightings in the previous window.
    pub count: u32,
}
