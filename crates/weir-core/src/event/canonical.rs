//! Canonical JSON serialization for event hashing.
//!
//! An event's identity is the digest of its serialized base, so the
//! serialization must be byte-stable across implementations. The protocol
//! fixes it as:
//!
//! - Compact: no whitespace between tokens.
//! - Object keys in lexicographic (byte) order, recursively at every depth.
//! - Arrays keep element order (predecessor lists are ordered).
//! - Strings escaped per JSON; numbers in serde_json's shortest form.
//!
//! Any peer producing a different byte sequence for the same logical event
//! will disagree about its hash, so changes here are protocol changes.

use serde_json::Value;

/// Produce the canonical form of a [`serde_json::Value`].
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use weir_core::event::canonical::canonicalize_json;
///
/// let val = json!({"salt": "x", "creatorAddress": "0xAb", "prevEvents": []});
/// assert_eq!(
///     canonicalize_json(&val),
///     r#"{"creatorAddress":"0xAb","prevEvents":[],"salt":"x"}"#
/// );
/// ```
#[must_use]
pub fn canonicalize_json(value: &Value) -> String {
    let mut buf = String::new();
    write_canonical(value, &mut buf);
    buf
}

/// Canonicalize a JSON string received off the wire.
///
/// # Errors
///
/// Returns `serde_json::Error` if the input is not valid JSON.
pub fn canonicalize_json_str(json: &str) -> Result<String, serde_json::Error> {
    let value: Value = serde_json::from_str(json)?;
    Ok(canonicalize_json(&value))
}

fn write_canonical(value: &Value, buf: &mut String) {
    match value {
        Value::Null => buf.push_str("null"),
        Value::Bool(true) => buf.push_str("true"),
        Value::Bool(false) => buf.push_str("false"),
        Value::Number(n) => buf.push_str(&n.to_string()),
        Value::String(s) => write_escaped(s, buf),
        Value::Array(items) => {
            buf.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    buf.push(',');
                }
                write_canonical(item, buf);
            }
            buf.push(']');
        }
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by_key(|(key, _)| *key);

            buf.push('{');
            for (i, (key, val)) in entries.iter().enumerate() {
                if i > 0 {
                    buf.push(',');
                }
                write_escaped(key, buf);
                buf.push(':');
                write_canonical(val, buf);
            }
            buf.push('}');
        }
    }
}

fn write_escaped(s: &str, buf: &mut String) {
    // serde_json's escaping is the normative one
    buf.push_str(&serde_json::to_string(s).expect("string serialization cannot fail"));
}
