//! Wire codec: URL-encoded request forms, JSON response bodies.

use serde::de::DeserializeOwned;

use crate::error::CarwingsError;

/// Logical success code embedded in every response envelope.
pub const LOGICAL_OK: i64 = 200;

/// Serialize ordered form fields. Field order does not matter to the portal
/// but is reproduced deterministically so request bodies can be asserted
/// byte-for-byte.
pub fn encode_form(fields: &[(&str, &str)]) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in fields {
        serializer.append_pair(key, value);
    }
    serializer.finish()
}

/// Decode a response body. An empty body is "no content" (`Ok(None)`), not a
/// parse failure; malformed JSON is a decode failure distinct from transport
/// failure.
pub fn decode<T: DeserializeOwned>(body: &str) -> Result<Option<T>, CarwingsError> {
    if body.is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(body)?))
}
