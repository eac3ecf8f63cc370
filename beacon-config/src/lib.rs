//! Configuration for the Beacon pipeline.
//!
//! The configuration is read from a YAML file, by default `config.yml` within a configuration
//! folder. All sections are optional:
//!
//! ```yaml
//! logging:
//!   level: info
//!   format: auto
//! scope:
//!   user: {id: "42"}
//!   tags: {env: production}
//!   level: warning
//! deduplication:
//!   enabled: true
//!   maxCacheSize: 100
//!   timeWindow: 5000
//! sampling:
//!   errorSampleRate: 1.0
//!   performanceSampleRate: 0.1
//! ```

#![warn(missing_docs)]

mod config;

pub use self::config::*;
