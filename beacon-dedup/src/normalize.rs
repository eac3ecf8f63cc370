//! Normalization of the volatile parts of messages, URLs and stack traces.
//!
//! Two events that differ only in timestamps, durations, identifiers or query strings should
//! receive the same fingerprint.

use beacon_common::truncate_chars;
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

/// The maximum length of every normalized fingerprint component, in characters.
pub const MAX_COMPONENT_LENGTH: usize = 200;

/// The number of leading stack lines that contribute to the fingerprint.
const STACK_LINES: usize = 3;

/// Stack lines containing this marker belong to third-party dependencies.
const DEPENDENCY_MARKER: &str = "node_modules";

/// ISO 8601 dates with optional time and offset.
static ISO_DATE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)
        [0-9]{4}-[0-9]{2}-[0-9]{2}
        (?:
            [T\x20][0-9]{2}:[0-9]{2}
            (?::[0-9]{2}(?:\.[0-9]+)?)?
            (?:Z|[+-][0-9]{2}:?[0-9]{2})?
        )?",
    )
    .unwrap()
});

/// Durations in milliseconds, such as `250ms`, `12.5ms` or `retry_35ms`.
static DURATION_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]+(?:\.[0-9]+)?ms\b").unwrap());

/// Identifiers in `id=...` or `id: ...` notation, including suffixes like `request_id=...`.
static ID_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"id[:=]\s*[A-Za-z0-9_-]+").unwrap());

/// Normalizes a message for fingerprinting.
///
/// Replaces dates with `DATE`, durations with `TIMEms` and identifiers with `id=ID`.
///
/// ```
/// use beacon_dedup::normalize_message;
///
/// assert_eq!(
///     normalize_message("job id=8f2c failed on 2024-01-01 after 350ms"),
///     "job id=ID failed on DATE after TIMEms",
/// );
/// ```
pub fn normalize_message(message: &str) -> String {
    let message = ISO_DATE_REGEX.replace_all(message, "DATE");
    let message = DURATION_REGEX.replace_all(&message, "TIMEms");
    let message = ID_REGEX.replace_all(&message, "id=ID");

    truncate_chars(message.into_owned(), MAX_COMPONENT_LENGTH)
}

/// Builds the stack component of a fingerprint.
///
/// Takes the first three lines of the stack, skips lines from third-party dependencies and joins
/// the rest with `|`.
pub fn stack_key(stack: &str) -> String {
    let key = stack
        .lines()
        .take(STACK_LINES)
        .filter(|line| !line.contains(DEPENDENCY_MARKER))
        .collect::<Vec<_>>()
        .join("|");

    truncate_chars(key, MAX_COMPONENT_LENGTH)
}

/// Normalizes a URL for fingerprinting.
///
/// Strips query string, fragment, scheme and host. Numeric path segments become `:id` and
/// hexadecimal segments of at least eight characters become `:hash`.
///
/// ```
/// use beacon_dedup::normalize_url;
///
/// assert_eq!(
///     normalize_url("https://api.example.com/users/42/avatars/deadbeef01?size=large"),
///     "/users/:id/avatars/:hash",
/// );
/// ```
pub fn normalize_url(url: &str) -> String {
    let url = url.split(['?', '#']).next().unwrap_or_default();

    let path = match Url::parse(url) {
        Ok(parsed) if parsed.has_host() => parsed.path().to_owned(),
        _ => url.to_owned(),
    };

    let normalized = path
        .split('/')
        .map(normalize_segment)
        .collect::<Vec<_>>()
        .join("/");

    truncate_chars(normalized, MAX_COMPONENT_LENGTH)
}

/// Returns the path of a URL without scheme, host and query.
pub fn url_path(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) if parsed.has_host() => parsed.path().to_owned(),
        _ => url.split(['?', '#']).next().unwrap_or_default().to_owned(),
    }
}

fn normalize_segment(segment: &str) -> &str {
    if !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()) {
        ":id"
    } else if segment.len() >= 8 && segment.bytes().all(|b| b.is_ascii_hexdigit()) {
        ":hash"
    } else {
        segment
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_dates() {
        assert_eq!(normalize_message("Error on 2024-01-01"), "Error on DATE");
        assert_eq!(
            normalize_message("expired at 2024-03-05T10:22:31.123Z"),
            "expired at DATE"
        );
        assert_eq!(
            normalize_message("expired at 2024-03-05T10:22:31+02:00, retrying"),
            "expired at DATE, retrying"
        );
    }

    #[test]
    fn test_normalize_durations() {
        assert_eq!(normalize_message("took 35ms"), "took TIMEms");
        assert_eq!(normalize_message("took 35.75ms"), "took TIMEms");
        assert_eq!(normalize_message("took 35 seconds"), "took 35 seconds");
        assert_eq!(normalize_message("retry_35ms timeout"), "retry_TIMEms timeout");
    }

    #[test]
    fn test_normalize_ids() {
        assert_eq!(normalize_message("user id: a1b2-c3"), "user id=ID");
        assert_eq!(normalize_message("order id=991"), "order id=ID");
        assert_eq!(normalize_message("request_id=8f2c failed"), "request_id=ID failed");
        assert_eq!(normalize_message("session_id: 91aa-x"), "session_id=ID");
        assert_eq!(normalize_message("uuid:abc123 missing"), "uuid=ID missing");
        assert_eq!(normalize_message("id missing"), "id missing");
    }

    #[test]
    fn test_suffixed_ids_collapse() {
        assert_eq!(
            normalize_message("request_id=8f2c failed"),
            normalize_message("request_id=91aa failed")
        );
        assert_eq!(
            normalize_message("user_id:42 not found after retry_35ms"),
            normalize_message("user_id:7 not found after retry_120ms")
        );
    }

    #[test]
    fn test_message_truncated() {
        let message = "x".repeat(500);
        assert_eq!(normalize_message(&message).chars().count(), MAX_COMPONENT_LENGTH);
    }

    #[test]
    fn test_stack_key_skips_dependencies() {
        let stack = "TypeError: x is undefined\n    at main (app.js:1:1)\n    at run (node_modules/lib/index.js:4:2)\n    at boot (app.js:9:1)";
        assert_eq!(
            stack_key(stack),
            "TypeError: x is undefined|    at main (app.js:1:1)"
        );
        assert_eq!(stack_key(""), "");
    }

    #[test]
    fn test_normalize_relative_url() {
        assert_eq!(normalize_url("/orders/123#summary"), "/orders/:id");
        assert_eq!(normalize_url("/api/v2/items"), "/api/v2/items");
        assert_eq!(normalize_url("/sessions/0123456789abcdef"), "/sessions/:hash");
    }

    #[test]
    fn test_short_hex_segment_kept() {
        assert_eq!(normalize_url("/files/cafe"), "/files/cafe");
        assert_eq!(normalize_url("/files/deadbeef"), "/files/:hash");
    }

    #[test]
    fn test_url_path() {
        assert_eq!(url_path("https://shop.example.com/checkout?step=2"), "/checkout");
        assert_eq!(url_path("/checkout#top"), "/checkout");
    }
}
