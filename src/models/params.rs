//! Request parameter serialization
//!
//! One algorithm serves both the cache key and the query string of GET-style
//! requests, so two requests share a cache entry exactly when they would hit
//! the same URL. The query string percent-encodes values; keys keep them raw.

use std::borrow::Cow;

use serde_json::{Map, Value};

/// Ordered request parameters. Insertion order is preserved and significant.
pub type Params = Map<String, Value>;

/// Serializes parameters as `name=value` pairs joined by `glue`.
///
/// - null values are skipped
/// - arrays expand to repeated `name[]=element`
/// - objects expand to `name[subkey]=value`
pub fn build_params(params: &Params, glue: &str) -> String {
    serialize(params, glue, |text| Cow::Borrowed(text))
}

/// Serializes parameters as a URL query string.
///
/// Same layout as [`build_params`] with `&` as glue, but values are
/// percent-encoded so `&`, `#` or `=` inside a value stay part of it.
pub fn build_query(params: &Params) -> String {
    serialize(params, "&", urlencoding::encode)
}

fn serialize(params: &Params, glue: &str, encode: fn(&str) -> Cow<'_, str>) -> String {
    let mut pairs = Vec::with_capacity(params.len());

    for (name, value) in params {
        match value {
            Value::Null => continue,
            Value::Array(items) => {
                for item in items {
                    pairs.push(format!("{}[]={}", name, encode(&scalar_text(item))));
                }
            }
            Value::Object(fields) => {
                for (sub_key, sub_value) in fields {
                    pairs.push(format!(
                        "{}[{}]={}",
                        name,
                        sub_key,
                        encode(&scalar_text(sub_value))
                    ));
                }
            }
            scalar => pairs.push(format!("{}={}", name, encode(&scalar_text(scalar)))),
        }
    }

    pairs.join(glue)
}

/// Renders a value without JSON quoting for strings.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
