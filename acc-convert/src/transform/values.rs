//! Scalar and array conversions applied while copying a source property.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{json, Map, Value};

/// Values starting with this prefix are already encrypted by the device.
pub const ENCRYPTED_PREFIX: &str = "$M$";

const PROTECTED_PLAIN: &str = r#"{"alg":"dir","enc":"none"}"#;
const PROTECTED_DEVICE: &str = r#"{"alg":"dir","enc":"f5sv"}"#;

/// `example-string-here` -> `exampleStringHere`.
pub fn hyphens_to_camel(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut upper = false;
    for ch in text.chars() {
        if ch == '-' {
            upper = true;
        } else if upper {
            out.extend(ch.to_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// `enabled`/`disabled` -> `enable`/`disable`; anything else unchanged.
pub fn enabled_to_enable(text: &str) -> &str {
    match text {
        "enabled" => "enable",
        "disabled" => "disable",
        other => other,
    }
}

/// Boolean spelling used by the device (`enabled`, `yes`, `true`, ...).
pub fn parse_flag(text: &str) -> Option<bool> {
    match text {
        "enabled" | "enable" | "yes" | "true" => Some(true),
        "disabled" | "disable" | "no" | "false" => Some(false),
        _ => None,
    }
}

/// Count the prefix bits of a dotted-decimal netmask.
pub fn netmask_bits(mask: &str) -> Option<u32> {
    let octets = mask
        .split('.')
        .map(|part| part.parse::<u8>().ok())
        .collect::<Option<Vec<_>>>()?;
    if octets.len() != 4 {
        return None;
    }
    Some(octets.iter().map(|octet| octet.count_ones()).sum())
}

/// `255.255.240.0` -> `"/20"`, or the bare number `20` with `no_slash`.
///
/// Masks that are not dotted-decimal pass through as strings.
pub fn netmask_to_cidr(mask: &str, no_slash: bool) -> Value {
    match netmask_bits(mask) {
        Some(bits) if no_slash => json!(bits),
        Some(bits) => json!(format!("/{bits}")),
        None => json!(mask),
    }
}

/// `"name: value"` -> `{name, value}`. A trailing colon gives an empty value.
pub fn name_value(text: &str) -> Value {
    let text = tmsh_conf_core::unquote(text);
    match text.split_once(':') {
        Some((name, value)) => json!({ "name": name.trim(), "value": value.trim() }),
        None => json!({ "name": text.trim(), "value": "" }),
    }
}

/// Drop repeated strings and repeated references, keeping first occurrences.
///
/// References compare by pointer target only, so `{use: x}` and a later
/// `{use: x, extra: 1}` count as the same entry.
pub fn dedupe(items: Vec<Value>) -> Vec<Value> {
    let mut seen: Vec<Value> = Vec::new();
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        let identity = match &item {
            Value::Object(map) => ref_target(map).unwrap_or_else(|| item.clone()),
            other => other.clone(),
        };
        if !seen.contains(&identity) {
            seen.push(identity);
            out.push(item);
        }
    }
    out
}

fn ref_target(map: &Map<String, Value>) -> Option<Value> {
    ["use", "bigip"].iter().find_map(|key| {
        map.get(*key)
            .map(|target| json!({ "pointer": key, "target": target }))
    })
}

/// Wrap a credential into a ciphertext envelope.
///
/// Values carrying the device's encryption prefix are marked as such so the
/// target decrypts them with the device key; everything else is plaintext.
pub fn protected_value(raw: &str) -> Value {
    let raw = tmsh_conf_core::unquote(raw);
    let header = if raw.starts_with(ENCRYPTED_PREFIX) {
        PROTECTED_DEVICE
    } else {
        PROTECTED_PLAIN
    };
    json!({
        "ciphertext": STANDARD.encode(raw),
        "protected": STANDARD.encode(header),
        "ignoreChanges": true,
    })
}

/// `none` -> `{}`; other values are returned as given.
pub fn none_as_empty(value: Value) -> Value {
    match value.as_str() {
        Some("none") => Value::Object(Map::new()),
        _ => value,
    }
}

/// Parse decimal text into a JSON integer; non-numeric text passes through.
pub fn integer(text: &str) -> Value {
    text.parse::<i64>().map(Value::from).unwrap_or_else(|_| json!(text))
}

/// Whether text (or a JSON value) is a decimal integer.
pub fn is_integer(value: &Value) -> bool {
    match value {
        Value::Number(number) => number.is_i64() || number.is_u64(),
        Value::String(text) => !text.is_empty() && text.parse::<i64>().is_ok(),
        _ => false,
    }
}

/// Prefix every key of `map`: `prepend_keys({period: 1}, "hsts")` -> `{hstsPeriod: 1}`.
pub fn prepend_keys(map: Map<String, Value>, prefix: &str) -> Map<String, Value> {
    map.into_iter()
        .map(|(key, value)| {
            let mut chars = key.chars();
            let capitalized = match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            };
            (format!("{prefix}{capitalized}"), value)
        })
        .collect()
}
