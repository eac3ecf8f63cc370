//! Client-side monitoring of errors, messages and performance measurements.
//!
//! This crate bundles the Beacon building blocks behind a single dependency. Applications capture
//! events through a [`Monitoring`] client. Before reaching the [`Transport`], every event is
//! enriched from the client's [`Scope`], deduplicated and sampled.
//!
//! The quickest way to a working client is [`init`], which configures everything from a
//! [`Config`]:
//!
//! ```
//! use std::sync::Arc;
//!
//! use beacon::transport::JsonLinesTransport;
//! use beacon::{Config, Hub};
//! use beacon::protocol::Level;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! Hub::run(Arc::new(Hub::new()), async {
//!     let transport = Arc::new(JsonLinesTransport::new(Vec::new()));
//!     let client = beacon::init(&Config::default(), transport).unwrap();
//!
//!     beacon::capture_message("hello", Level::Info).await.unwrap();
//!     client.close().await.unwrap();
//! })
//! .await;
//! # });
//! ```

#![warn(missing_docs)]

use std::sync::Arc;

pub mod transport;

pub use beacon_config::{Config, ConfigError, ConfigErrorKind, OverridableConfig, ScopeConfig};
pub use beacon_core::{
    CaptureError, EventPipeline, Hub, Integration, Monitoring, Scope, Transform, TransformError,
    Transport, TransportError, capture_error, capture_event, capture_message, current_client,
    transform_fn,
};
pub use beacon_dedup::{DeduplicationConfig, DeduplicationConfigError, DeduplicationIntegration};
pub use beacon_event_schema::protocol;
pub use beacon_sampling::{SamplingConfig, SamplingConfigError, SamplingIntegration};

/// An error returned by [`init`] when an integration rejects its configuration.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    /// The deduplication settings are invalid.
    #[error("invalid deduplication config")]
    Deduplication(#[from] DeduplicationConfigError),
    /// The sampling settings are invalid.
    #[error("invalid sampling config")]
    Sampling(#[from] SamplingConfigError),
}

/// Creates the initial scope of a client from its configuration.
pub fn scope_from_config(config: &ScopeConfig) -> Scope {
    let mut scope = Scope::new();
    scope.set_user(config.user.clone());
    scope.set_tags(config.tags.clone());
    scope.set_extras(config.extra.clone());
    scope.set_level(config.level);
    scope
}

/// Creates an uninitialized client with the configured scope and integrations.
///
/// Deduplication is registered before sampling, so duplicates never consume a sampling draw.
pub fn build_client(config: &Config) -> Result<Arc<Monitoring>, InitError> {
    let client = Monitoring::with_scope(scope_from_config(config.scope()));

    if config.deduplication_enabled() {
        let deduplication = DeduplicationIntegration::new(config.deduplication().clone())?;
        client.add_integration(Arc::new(deduplication));
    }

    if let Some(sampling) = config.sampling() {
        client.add_integration(Arc::new(SamplingIntegration::new(*sampling)?));
    }

    Ok(client)
}

/// Creates a client from the configuration and initializes it with the given transport.
///
/// When called within [`Hub::run`], the client is bound to the current hub and the free capture
/// functions route to it.
pub fn init(config: &Config, transport: Arc<dyn Transport>) -> Result<Arc<Monitoring>, InitError> {
    let client = build_client(config)?;
    client.init(transport);

    beacon_log::debug!(
        integrations = ?client.integration_names(),
        "monitoring client initialized"
    );

    Ok(client)
}
