use std::time::Duration;

use beacon_common::UnixTimestamp;
use indexmap::IndexMap;

/// State kept per fingerprint.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CacheEntry {
    /// When the current window of this fingerprint started.
    pub timestamp: UnixTimestamp,
    /// The number of sightings in the current window.
    pub count: u32,
}

/// Outcome of looking up a fingerprint.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Decision {
    /// The event passes. `count` is `1` for new fingerprints, otherwise the number of sightings
    /// in the window that just elapsed.
    Pass {
        /// The count to report on the event.
        count: u32,
    },
    /// The event repeats a fingerprint within the window and is suppressed.
    Suppress {
        /// The number of sightings in the current window, including this one.
        count: u32,
    },
}

/// A capacity-bounded map from fingerprint to [`CacheEntry`].
///
/// Eviction is in insertion order: when full, the entry inserted first is removed, regardless of
/// how recently it was seen. Entries never expire on their own.
#[derive(Debug)]
pub struct FingerprintCache {
    entries: IndexMap<String, CacheEntry>,
    capacity: usize,
    window: Duration,
}

impl FingerprintCache {
    /// Creates an empty cache.
    ///
    /// `capacity` must be at least one.
    pub fn new(capacity: usize, window: Duration) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
            capacity,
            window,
        }
    }

    /// Records a sighting of `fingerprint` at `now` and decides whether the event passes.
    pub fn check(&mut self, fingerprint: &str, now: UnixTimestamp) -> Decision {
        if let Some(entry) = self.entries.get_mut(fingerprint) {
            if now - entry.timestamp < self.window {
                entry.count = entry.count.saturating_add(1);
                return Decision::Suppress { count: entry.count };
            }

            let previous = entry.count;
            *entry = CacheEntry {
                timestamp: now,
                count: 1,
            };
            return Decision::Pass { count: previous };
        }

        if self.entries.len() >= self.capacity {
            self.entries.shift_remove_index(0);
        }

        self.entries.insert(
            fingerprint.to_owned(),
            CacheEntry {
                timestamp: now,
                count: 1,
            },
        );

        Decision::Pass { count: 1 }
    }

    /// Returns the entry of a fingerprint.
    pub fn get(&self, fingerprint: &str) -> Option<CacheEntry> {
        self.entries.get(fingerprint).copied()
    }

    /// Returns the number of cached fingerprints.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no fingerprint is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
