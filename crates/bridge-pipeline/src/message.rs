//! Accessors for host message maps.
//!
//! Requests look like
//! `{ "method", "URI", "headers": {..}, "payload": { "inlinedJsonBody": {..} } }`
//! and response pairs like `{ "request": {..}, "response": {..} }` where the
//! response carries its own `headers` and `payload`.

use crate::error::{BridgeError, BridgeResult};
use serde_json::{Map, Value};

pub const METHOD_KEY: &str = "method";
pub const URI_KEY: &str = "URI";
pub const HEADERS_KEY: &str = "headers";
pub const PAYLOAD_KEY: &str = "payload";
pub const BODY_KEY: &str = "inlinedJsonBody";
pub const STATUS_KEY: &str = "statusCode";
pub const REQUEST_KEY: &str = "request";
pub const RESPONSE_KEY: &str = "response";

/// Full URI of a request, or `""` when absent.
pub fn uri(message: &Map<String, Value>) -> &str {
    message.get(URI_KEY).and_then(Value::as_str).unwrap_or("")
}

/// Split a URI into its path and optional query string.
pub fn split_uri(uri: &str) -> (&str, Option<&str>) {
    match uri.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (uri, None),
    }
}

/// Path component of a request's URI.
pub fn path(message: &Map<String, Value>) -> &str {
    split_uri(uri(message)).0
}

pub fn method(message: &Map<String, Value>) -> &str {
    message.get(METHOD_KEY).and_then(Value::as_str).unwrap_or("")
}

/// Detach the body from a message.
///
/// Only object bodies are taken; anything else stays where it is and an
/// empty map is returned. The flag reports whether an object was taken.
pub fn take_body(message: &mut Map<String, Value>) -> (Map<String, Value>, bool) {
    let slot = message
        .get_mut(PAYLOAD_KEY)
        .and_then(Value::as_object_mut)
        .and_then(|payload| {
            if matches!(payload.get(BODY_KEY), Some(Value::Object(_))) {
                payload.remove(BODY_KEY)
            } else {
                None
            }
        });

    match slot {
        Some(Value::Object(body)) => (body, true),
        _ => (Map::new(), false),
    }
}

/// Store a body at the conventional location, creating `payload` if needed.
pub fn put_body(message: &mut Map<String, Value>, body: Map<String, Value>) {
    let payload = message
        .entry(PAYLOAD_KEY)
        .or_insert_with(|| Value::Object(Map::new()));
    if !payload.is_object() {
        *payload = Value::Object(Map::new());
    }
    if let Value::Object(payload) = payload {
        payload.insert(BODY_KEY.to_string(), Value::Object(body));
    }
}

/// Case-insensitive header lookup.
pub fn header<'a>(message: &'a Map<String, Value>, name: &str) -> Option<&'a str> {
    message
        .get(HEADERS_KEY)?
        .as_object()?
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .and_then(|(_, value)| value.as_str())
}

/// Set a header, replacing any existing spelling of the same name.
pub fn set_header(message: &mut Map<String, Value>, name: &str, value: &str) {
    let headers = message
        .entry(HEADERS_KEY)
        .or_insert_with(|| Value::Object(Map::new()));
    if !headers.is_object() {
        *headers = Value::Object(Map::new());
    }
    if let Value::Object(headers) = headers {
        headers.retain(|key, _| !key.eq_ignore_ascii_case(name));
        headers.insert(name.to_string(), Value::String(value.to_string()));
    }
}

/// Remove `key` from `map` if it holds an object; other values are left in place.
pub fn take_object(map: &mut Map<String, Value>, key: &str) -> Option<Map<String, Value>> {
    match map.remove(key) {
        Some(Value::Object(object)) => Some(object),
        Some(other) => {
            map.insert(key.to_string(), other);
            None
        }
        None => None,
    }
}

/// Decode a host message strictly: valid JSON and an object at the top.
pub fn decode(input: &str) -> BridgeResult<Value> {
    let value: Value = serde_json::from_str(input)?;
    if !value.is_object() {
        return Err(BridgeError::message("top-level value must be an object"));
    }
    Ok(value)
}
