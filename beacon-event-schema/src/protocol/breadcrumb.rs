use serde::{Deserialize, Serialize};

use crate::protocol::{Level, Object, Timestamp};

/// A breadcrumb.
///
/// Breadcrumbs are a trail of events that happened prior to an issue. When recorded on a scope,
/// a missing `timestamp` defaults to the time of recording and a missing `level` to
/// [`Level::Info`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Breadcrumb {
    /// The timestamp of the breadcrumb.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Timestamp>,

    /// The type of the breadcrumb.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub ty: Option<String>,

    /// The optional category of the breadcrumb.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Severity level of the breadcrumb. Unknown levels are dropped.
    #[serde(
        default,
        deserialize_with = "crate::protocol::types::deserialize_level_lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub level: Option<Level>,

    /// Human readable message for the breadcrumb.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Custom user-defined data of this breadcrumb.
    #[serde(default, skip_serializing_if = "Object::is_empty")]
    pub data: Object,
}

impl Breadcrumb {
    /// Creates a breadcrumb with the given message.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }
}
