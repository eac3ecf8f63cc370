use std::fmt::Write;

use beacon_event_schema::protocol::{ErrorData, Event, EventData, HttpError, WebVitalData};

use crate::normalize::{normalize_message, normalize_url, stack_key, url_path};

/// Computes the deduplication fingerprint of an event.
///
/// Returns `None` for categories that are not deduplicated. These are all custom categories that
/// are not error-like.
///
/// | Category     | Fingerprint input                          |
/// |--------------|--------------------------------------------|
/// | error-like   | `type\|message\|stack`                     |
/// | HTTP error   | `http\|method\|url\|status`                |
/// | web vital    | `webVital\|name\|path`                     |
/// | performance  | `performance\|category\|name`              |
/// | message      | `message\|message`                         |
pub fn fingerprint(event: &Event) -> Option<String> {
    let input = match &event.data {
        EventData::Error(data) | EventData::UnhandledRejection(data) => match data.http_error {
            Some(ref http) => http_input(http),
            None => error_input(event.ty().as_str(), data),
        },
        EventData::Message(data) => format!("message|{}", normalize_message(&data.message)),
        EventData::Performance(data) => format!(
            "performance|{}|{}",
            data.category.as_deref().unwrap_or_default(),
            data.name
        ),
        EventData::WebVital(data) => web_vital_input(data),
        EventData::Custom(data) if event.ty().is_error_like() => join_error(
            &data.ty,
            data.str_field("message"),
            data.str_field("stack"),
        ),
        EventData::Custom(_) => return None,
    };

    Some(hash_string(&input))
}

fn error_input(ty: &str, data: &ErrorData) -> String {
    join_error(ty, data.message.as_deref(), data.stack.as_deref())
}

fn join_error(ty: &str, message: Option<&str>, stack: Option<&str>) -> String {
    format!(
        "{ty}|{}|{}",
        normalize_message(message.unwrap_or_default()),
        stack_key(stack.unwrap_or_default())
    )
}

fn http_input(http: &HttpError) -> String {
    let mut input = String::from("http|");
    input.push_str(http.method.as_deref().unwrap_or_default());
    input.push('|');
    input.push_str(&normalize_url(http.url.as_deref().unwrap_or_default()));
    input.push('|');
    if let Some(status) = http.status {
        write!(input, "{status}").ok();
    }
    input
}

fn web_vital_input(data: &WebVitalData) -> String {
    let path = match (&data.path, &data.url) {
        (Some(path), _) => path.clone(),
        (None, Some(url)) => url_path(url),
        (None, None) => String::new(),
    };

    format!("webVital|{}|{path}", data.name)
}

/// Hashes a string into a short base-36 token.
///
/// This is the classic 31-based rolling hash over UTF-16 code units with 32-bit signed wraparound.
/// Negative hashes keep their sign, so the token may start with `-`.
pub fn hash_string(input: &str) -> String {
    let hash = input
        .encode_utf16()
        .fold(0i32, |hash, unit| {
            hash.wrapping_mul(31).wrapping_add(i32::from(unit))
        });

    to_base36(hash)
}

fn to_base36(value: i32) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    let mut magnitude = value.unsigned_abs();
    let mut digits = Vec::new();
    loop {
        digits.push(DIGITS[(magnitude % 36) as usize]);
        magnitude /= 36;
        if magnitude == 0 {
            break;
        }
    }

    if value < 0 {
        digits.push(b'-');
    }

    digits.iter().rev().map(|&b| char::from(b)).collect()
}
