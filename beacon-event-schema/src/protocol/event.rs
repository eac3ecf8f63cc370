use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::protocol::{
    Breadcrumb, DeduplicationMeta, ErrorData, EventData, EventType, Level, MessageData, Object,
    SamplingMeta, Timestamp, User,
};

/// Named, structured contexts of an event.
///
/// A `None` value marks a context that was explicitly cleared.
pub type Contexts = BTreeMap<String, Option<Value>>;

/// One unit of telemetry flowing through the pipeline.
///
/// The event consists of a shared envelope and the category-specific [`EventData`]. It serializes
/// to a flat JSON record with the category in the `type` field and the payload fields inlined.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawEvent", into = "RawEvent")]
pub struct Event {
    /// When the event was recorded by the application.
    pub timestamp: Option<Timestamp>,

    /// The category-specific payload.
    pub data: EventData,

    /// Severity of the event.
    pub level: Option<Level>,

    /// The user who triggered the event.
    pub user: Option<User>,

    /// Custom tags for this event.
    pub tags: BTreeMap<String, String>,

    /// Arbitrary extra information set by the user.
    pub extra: Object,

    /// List of breadcrumbs recorded before this event.
    pub breadcrumbs: Vec<Breadcrumb>,

    /// Named contexts, such as device or runtime information.
    pub contexts: Contexts,

    /// Set by sampling when the event was retained.
    pub sampling: Option<SamplingMeta>,

    /// Set by deduplication when the event passed.
    pub deduplication: Option<DeduplicationMeta>,
}

impl Event {
    /// Creates a new event with the given payload and an empty envelope.
    pub fn new(data: EventData) -> Self {
        Self {
            timestamp: None,
            data,
            level: None,
            user: None,
            tags: BTreeMap::new(),
            extra: Object::new(),
            breadcrumbs: Vec::new(),
            contexts: Contexts::new(),
            sampling: None,
            deduplication: None,
        }
    }

    /// Creates an error event with the given message and optional stack trace.
    pub fn error(message: impl Into<String>, stack: Option<String>) -> Self {
        Self::new(EventData::Error(ErrorData {
            message: Some(message.into()),
            stack,
            ..ErrorData::default()
        }))
    }

    /// Creates a message event.
    pub fn message(message: impl Into<String>, level: Level) -> Self {
        let mut event = Self::new(EventData::Message(MessageData {
            message: message.into(),
            ..MessageData::default()
        }));
        event.level = Some(level);
        event
    }

    /// Returns the category of this event.
    pub fn ty(&self) -> EventType {
        self.data.ty()
    }

    /// Sets the timestamp to now if the event does not have one yet.
    pub fn ensure_timestamp(&mut self) {
        self.timestamp.get_or_insert_with(Timestamp::now);
    }

    /// Parses an event from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serializes this event to its JSON representation.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// The flat wire representation of an [`Event`].
#[derive(Serialize, Deserialize)]
struct RawEvent {
    #[serde(rename = "type")]
    ty: EventType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    timestamp: Option<Timestamp>,

    #[serde(
        default,
        deserialize_with = "crate::protocol::types::deserialize_level_lenient",
        skip_serializing_if = "Option::is_none"
    )]
    level: Option<Level>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<User>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    tags: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Object::is_empty")]
    extra: Object,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    breadcrumbs: Vec<Breadcrumb>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    contexts: Contexts,

    #[serde(default, rename = "_sampling", skip_serializing_if = "Option::is_none")]
    sampling: Option<SamplingMeta>,

    #[serde(default, rename = "_deduplication", skip_serializing_if = "Option::is_none")]
    deduplication: Option<DeduplicationMeta>,

    #[serde(flatten)]
    fields: Object,
}

impl TryFrom<RawEvent> for Event {
    type Error = serde_json::Error;

    fn try_from(raw: RawEvent) -> Result<Self, Self::Error> {
        Ok(Self {
            timestamp: raw.timestamp,
            data: EventData::from_fields(raw.ty, raw.fields)?,
            level: raw.level,
            user: raw.user,
            tags: raw.tags,
            extra: raw.extra,
            breadcrumbs: raw.breadcrumbs,
            contexts: raw.contexts,
            sampling: raw.sampling,
            deduplication: raw.deduplication,
        })
    }
}

impl From<Event> for RawEvent {
    fn from(event: Event) -> Self {
        let (ty, fields) = event.data.into_fields();

        Self {
            ty,
            timestamp: event.timestamp,
            level: event.level,
            user: event.user,
            tags: event.tags,
            extra: event.extra,
            breadcrumbs: event.breadcrumbs,
            contexts: event.contexts,
            sampling: event.sampling,
            deduplication: event.deduplication,
            fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use beacon_common::UnixTimestamp;
    use serde_json::json;
    use similar_asserts::assert_eq;

    use super::*;
    use crate::protocol::{HttpError, WebVitalData};

    #[test]
    fn test_parse_error_event() {
        let event = Event::from_json(
            r#"{
                "type": "error",
                "timestamp": 1704067200000,
                "name": "TypeError",
                "message": "x is undefined",
                "stack": "TypeError: x is undefined\n    at main (app.js:1:1)",
                "httpError": {"method": "GET", "url": "https://api.example.com/users/42", "status": 500},
                "componentStack": "<App>",
                "tags": {"feature": "login"}
            }"#,
        )
        .unwrap();

        let EventData::Error(ref error) = event.data else {
            panic!("expected an error event, got {:?}", event.ty());
        };

        assert_eq!(error.name.as_deref(), Some("TypeError"));
        assert_eq!(error.message.as_deref(), Some("x is undefined"));
        assert_eq!(
            error.http_error,
            Some(HttpError {
                method: Some("GET".to_owned()),
                url: Some("https://api.example.com/users/42".to_owned()),
                status: Some(500),
                other: Object::new(),
            })
        );
        assert_eq!(error.other.get("componentStack"), Some(&json!("<App>")));
        assert_eq!(event.tags.get("feature").map(String::as_str), Some("login"));
        assert!(event.timestamp.is_some());
    }

    #[test]
    fn test_serialize_flat_record() {
        let mut event = Event::new(EventData::WebVital(WebVitalData {
            name: "LCP".to_owned(),
            value: Some(2400.0),
            path: Some("/checkout".to_owned()),
            ..WebVitalData::default()
        }));
        event.sampling = Some(SamplingMeta {
            rate: 0.5,
            sampled: true,
            timestamp: UnixTimestamp::from_millis(1_000),
        });
        event.deduplication = Some(DeduplicationMeta {
            fingerprint: "abc".to_owned(),
            count: 1,
        });

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "webVital",
                "name": "LCP",
                "value": 2400.0,
                "path": "/checkout",
                "_sampling": {"rate": 0.5, "sampled": true, "timestamp": 1000},
                "_deduplication": {"fingerprint": "abc", "count": 1}
            })
        );

        let parsed: Event = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, event);
    }

    #[test]
    fn test_custom_category_preserves_fields() {
        let input = json!({
            "type": "resourceError",
            "message": "failed to load",
            "resource": {"url": "/app.js"}
        });

        let event: Event = serde_json::from_value(input.clone()).unwrap();
        assert_eq!(event.ty(), EventType::Custom("resourceError".to_owned()));
        assert!(event.ty().is_error_like());
        assert_eq!(serde_json::to_value(&event).unwrap(), input);
    }

    #[test]
    fn test_cleared_context_serializes_null() {
        let mut event = Event::message("hello", Level::Info);
        event.contexts.insert("device".to_owned(), None);

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["contexts"], json!({"device": null}));
        assert_eq!(value["level"], json!("info"));
    }

    #[test]
    fn test_unknown_level_dropped() {
        let event = Event::from_json(
            r#"{"type": "message", "message": "hi", "level": "verbose", "breadcrumbs": [{"level": "loud"}]}"#,
        )
        .unwrap();

        assert_eq!(event.level, None);
        assert_eq!(event.breadcrumbs[0].level, None);
    }

    #[test]
    fn test_timestamp_shape_preserved() {
        let input = json!({"type": "message", "message": "hi", "timestamp": 1704067200000.5});

        let mut event: Event = serde_json::from_value(input.clone()).unwrap();
        event.ensure_timestamp();
        assert_eq!(serde_json::to_value(&event).unwrap(), input);
    }

    #[test]
    fn test_ensure_timestamp_fills_missing() {
        let mut event = Event::message("hi", Level::Info);
        assert!(event.timestamp.is_none());

        event.ensure_timestamp();
        assert!(event.timestamp.is_some());
    }

    #[test]
    fn test_missing_type_is_rejected() {
        assert!(Event::from_json(r#"{"message": "no type"}"#).is_err());
    }
}
