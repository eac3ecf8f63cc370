use serde::{Deserialize, Serialize};

use crate::protocol::{EventType, Object};

/// Details of a failed HTTP request reported as an error.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpError {
    /// The request method, such as `GET`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    /// The full request URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// The response status code, if a response was received.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,

    /// Additional arbitrary fields for forwards compatibility.
    #[serde(flatten)]
    pub other: Object,
}

/// Payload of error-like events.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorData {
    /// The error class or name, such as `TypeError`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// The error message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// The raw stack trace, one frame per line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,

    /// Set if the error was caused by a failed HTTP request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_error: Option<HttpError>,

    /// Additional arbitrary fields for forwards compatibility.
    #[serde(flatten)]
    pub other: Object,
}

/// Payload of message events.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageData {
    /// The formatted message.
    #[serde(default)]
    pub message: String,

    /// Additional arbitrary fields for forwards compatibility.
    #[serde(flatten)]
    pub other: Object,
}

/// Payload of performance events.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceData {
    /// The kind of measurement, such as `resource` or `navigation`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// The name of the measured entry.
    #[serde(default)]
    pub name: String,

    /// The measured value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,

    /// Additional arbitrary fields for forwards compatibility.
    #[serde(flatten)]
    pub other: Object,
}

/// Payload of web vital events.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WebVitalData {
    /// The metric name, such as `LCP`, `CLS` or `INP`.
    #[serde(default)]
    pub name: String,

    /// The measured value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,

    /// The rating assigned by the collector, such as `good` or `poor`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,

    /// The path of the page the metric was measured on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// The full URL of the page, used when no explicit path is given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Additional arbitrary fields for forwards compatibility.
    #[serde(flatten)]
    pub other: Object,
}

/// Payload of events in a category unknown to Beacon.
#[derive(Clone, Debug, PartialEq)]
pub struct CustomData {
    /// The category name, as given in the `type` field.
    pub ty: String,
    /// All category-specific fields.
    pub fields: Object,
}

impl CustomData {
    /// Returns a string field, if present.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key)?.as_str()
    }
}

/// The category-specific part of an [`Event`](crate::protocol::Event).
#[derive(Clone, Debug, PartialEq)]
pub enum EventData {
    /// See [`EventType::Error`].
    Error(ErrorData),
    /// See [`EventType::UnhandledRejection`].
    UnhandledRejection(ErrorData),
    /// See [`EventType::Message`].
    Message(MessageData),
    /// See [`EventType::Performance`].
    Performance(PerformanceData),
    /// See [`EventType::WebVital`].
    WebVital(WebVitalData),
    /// See [`EventType::Custom`].
    Custom(CustomData),
}

impl EventData {
    /// Returns the category of this payload.
    pub fn ty(&self) -> EventType {
        match self {
            EventData::Error(_) => EventType::Error,
            EventData::UnhandledRejection(_) => EventType::UnhandledRejection,
            EventData::Message(_) => EventType::Message,
            EventData::Performance(_) => EventType::Performance,
            EventData::WebVital(_) => EventType::WebVital,
            EventData::Custom(custom) => EventType::Custom(custom.ty.clone()),
        }
    }

    /// Parses the payload of the given category from its flat fields.
    pub fn from_fields(ty: EventType, fields: Object) -> Result<Self, serde_json::Error> {
        fn parse<T: serde::de::DeserializeOwned>(fields: Object) -> Result<T, serde_json::Error> {
            serde_json::from_value(serde_json::Value::Object(fields))
        }

        Ok(match ty {
            EventType::Error => EventData::Error(parse(fields)?),
            EventType::UnhandledRejection => EventData::UnhandledRejection(parse(fields)?),
            EventType::Message => EventData::Message(parse(fields)?),
            EventType::Performance => EventData::Performance(parse(fields)?),
            EventType::WebVital => EventData::WebVital(parse(fields)?),
            EventType::Custom(ty) => EventData::Custom(CustomData { ty, fields }),
        })
    }

    /// Splits the payload into its category and flat fields.
    pub fn into_fields(self) -> (EventType, Object) {
        fn flatten<T: Serialize>(data: T) -> Object {
            match serde_json::to_value(data) {
                Ok(serde_json::Value::Object(fields)) => fields,
                _ => Object::new(),
            }
        }

        match self {
            EventData::Error(data) => (EventType::Error, flatten(data)),
            EventData::UnhandledRejection(data) => (EventType::UnhandledRejection, flatten(data)),
            EventData::Message(data) => (EventType::Message, flatten(data)),
            EventData::Performance(data) => (EventType::Performance, flatten(data)),
            EventData::WebVital(data) => (EventType::WebVital, flatten(data)),
            EventData::Custom(CustomData { ty, fields }) => (EventType::Custom(ty), fields),
        }
    }
}
