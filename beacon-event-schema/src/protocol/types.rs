use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An object of arbitrary JSON values, used for open-ended fields.
pub type Object = serde_json::Map<String, serde_json::Value>;

/// The category of an event.
///
/// The category decides which payload an event carries and how integrations treat it. Categories
/// that are not known to Beacon are preserved as [`EventType::Custom`].
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum EventType {
    /// A captured error or exception.
    Error,
    /// An unhandled promise rejection or equivalent asynchronous failure.
    UnhandledRejection,
    /// A plain log message.
    Message,
    /// A performance measurement.
    Performance,
    /// A web vital measurement, such as LCP or CLS.
    WebVital,
    /// Any other category, identified by its name.
    Custom(String),
}

impl EventType {
    /// Returns the string representation of this event type.
    pub fn as_str(&self) -> &str {
        match self {
            EventType::Error => "error",
            EventType::UnhandledRejection => "unhandledrejection",
            EventType::Message => "message",
            EventType::Performance => "performance",
            EventType::WebVital => "webVital",
            EventType::Custom(name) => name,
        }
    }

    /// Returns `true` for categories that represent a failure.
    ///
    /// Besides errors and unhandled rejections, custom categories whose name ends in `error` (in
    /// any casing, e.g. `resourceError`) are considered error-like.
    pub fn is_error_like(&self) -> bool {
        match self {
            EventType::Error | EventType::UnhandledRejection => true,
            EventType::Custom(name) => name.to_ascii_lowercase().ends_with("error"),
            EventType::Message | EventType::Performance | EventType::WebVital => false,
        }
    }
}

impl FromStr for EventType {
    type Err = std::convert::Infallible;

    fn from_str(string: &str) -> Result<Self, Self::Err> {
        Ok(match string {
            "error" => EventType::Error,
            "unhandledrejection" => EventType::UnhandledRejection,
            "message" => EventType::Message,
            "performance" => EventType::Performance,
            "webVital" => EventType::WebVital,
            other => EventType::Custom(other.to_owned()),
        })
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EventType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EventType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let string = Cow::<'_, str>::deserialize(deserializer)?;
        let Ok(ty) = string.parse::<EventType>();
        Ok(ty)
    }
}

/// An error used when parsing [`Level`].
#[derive(Debug, thiserror::Error)]
#[error("invalid level")]
pub struct ParseLevelError;

/// Severity level of an event or breadcrumb.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Level {
    /// Indicates very spammy debug information.
    Debug,
    /// Informational messages.
    #[default]
    Info,
    /// A warning.
    Warning,
    /// An error.
    Error,
    /// Similar to error but indicates a critical event that usually causes a shutdown.
    Fatal,
}

impl Level {
    /// Returns the string representation of this level.
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warning => "warning",
            Level::Error => "error",
            Level::Fatal => "fatal",
        }
    }
}

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(string: &str) -> Result<Self, Self::Err> {
        Ok(match string {
            "debug" => Level::Debug,
            "info" | "log" => Level::Info,
            "warning" | "warn" => Level::Warning,
            "error" => Level::Error,
            "fatal" | "critical" => Level::Fatal,
            _ => return Err(ParseLevelError),
        })
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Level {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Level {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let string = Cow::<'_, str>::deserialize(deserializer)?;
        string.parse().map_err(serde::de::Error::custom)
    }
}

/// Deserializes an optional level leniently.
///
/// Unknown level names deserialize as `None` instead of rejecting the surrounding record.
pub(crate) fn deserialize_level_lenient<'de, D>(deserializer: D) -> Result<Option<Level>, D::Error>
where
    D: Deserializer<'de>,
{
    let string = Option::<Cow<'_, str>>::deserialize(deserializer)?;
    Ok(string.and_then(|string| string.parse().ok()))
}

/// The largest epoch milliseconds whose nanoseconds still fit into an `i64`.
const MAX_EPOCH_MILLIS: f64 = 9.2e12;

/// The representation a [`Timestamp`] was read from.
#[derive(Clone, Debug)]
enum TimestampRepr {
    /// Created in-process, serialized as RFC 3339 with millisecond precision.
    Generated,
    /// Numeric epoch milliseconds, possibly fractional.
    Millis(serde_json::Number),
    /// An RFC 3339 string, kept verbatim.
    Rfc3339(String),
}

/// A point in time at which an event or breadcrumb was recorded.
///
/// Accepts both RFC 3339 strings and numeric epoch milliseconds, and serializes back in the
/// representation it was read from. Timestamps created in-process serialize as RFC 3339 strings
/// with millisecond precision. Comparisons only consider the point in time.
#[derive(Clone, Debug)]
pub struct Timestamp {
    date_time: DateTime<Utc>,
    repr: TimestampRepr,
}

impl Timestamp {
    /// Returns the current time.
    pub fn now() -> Self {
        Self::from(Utc::now())
    }

    /// Returns the inner date time.
    pub fn into_inner(self) -> DateTime<Utc> {
        self.date_time
    }

    fn from_millis(number: serde_json::Number) -> Option<Self> {
        let millis = number
            .as_f64()
            .filter(|millis| millis.is_finite() && millis.abs() < MAX_EPOCH_MILLIS)?;

        let whole = millis.trunc();
        let nanos = whole as i64 * 1_000_000 + ((millis - whole) * 1_000_000.0).round() as i64;

        Some(Self {
            date_time: DateTime::from_timestamp_nanos(nanos),
            repr: TimestampRepr::Millis(number),
        })
    }

    fn from_rfc3339(string: String) -> Option<Self> {
        let date_time = DateTime::parse_from_rfc3339(&string).ok()?;

        Some(Self {
            date_time: date_time.with_timezone(&Utc),
            repr: TimestampRepr::Rfc3339(string),
        })
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(date_time: DateTime<Utc>) -> Self {
        Self {
            date_time,
            repr: TimestampRepr::Generated,
        }
    }
}

impl PartialEq for Timestamp {
    fn eq(&self, other: &Self) -> bool {
        self.date_time == other.date_time
    }
}

impl Eq for Timestamp {}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timestamp {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.date_time.cmp(&other.date_time)
    }
}

impl std::hash::Hash for Timestamp {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.date_time.hash(state);
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.date_time.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.repr {
            TimestampRepr::Generated => serializer.collect_str(self),
            TimestampRepr::Millis(ref number) => number.serialize(serializer),
            TimestampRepr::Rfc3339(ref string) => serializer.serialize_str(string),
        }
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Millis(serde_json::Number),
            String(String),
        }

        let timestamp = match Repr::deserialize(deserializer)? {
            Repr::Millis(number) => Timestamp::from_millis(number),
            Repr::String(string) => Timestamp::from_rfc3339(string),
        };

        timestamp.ok_or_else(|| serde::de::Error::custom("expected an RFC 3339 date or epoch millis"))
    }
}
