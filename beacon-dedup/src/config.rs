use std::time::Duration;

use serde::{Deserialize, Serialize};

/// The default number of fingerprints kept in the cache.
pub const DEFAULT_MAX_CACHE_SIZE: usize = 100;

/// The default suppression window in milliseconds.
pub const DEFAULT_TIME_WINDOW: u64 = 5000;

/// Configuration of the [`DeduplicationIntegration`](crate::DeduplicationIntegration).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeduplicationConfig {
    /// The maximum number of fingerprints kept. Must be at least one.
    pub max_cache_size: usize,

    /// Repeats of a fingerprint within this many milliseconds are suppressed.
    pub time_window: u64,
}

impl DeduplicationConfig {
    /// Returns the suppression window as a duration.
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.time_window)
    }
}

impl Default for DeduplicationConfig {
    fn default() -> Self {
        Self {
            max_cache_size: DEFAULT_MAX_CACHE_SIZE,
            time_window: DEFAULT_TIME_WINDOW,
        }
    }
}

/// An error returned when the deduplication configuration is invalid.
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
pub enum DeduplicationConfigError {
    /// The cache must hold at least one fingerprint.
    #[error("maxCacheSize must be at least 1")]
    ZeroCapacity,
}
