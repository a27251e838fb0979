//! Canonical textual serialization of values.
//!
//! The canonical form is pretty-printed JSON with a 2-space indent, extended
//! with bare `undefined` and `NaN` tokens. Any structured node visited a second
//! time during a single serialization is emitted as the string `"[Circular]"`.

use std::collections::HashSet;

use crate::value::Value;

/// Marker emitted in place of an already-visited structured node.
pub const CIRCULAR: &str = "[Circular]";

const VOID_SENTINEL: &str = "[__VOID__]";
const NAN_SENTINEL: &str = "[__NAN__]";
const VOID_TOKEN: &str = "\"[__VOID__]\"";
const NAN_TOKEN: &str = "\"[__NAN__]\"";

/// Largest magnitude below which an integral number is printed without a fraction.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Serializes a value to its canonical text.
pub fn stringify(value: &Value) -> String {
    let mut visited = HashSet::new();
    let json = to_json(value, &mut visited);

    serde_json::to_string_pretty(&json)
        .unwrap_or_default()
        .replace(NAN_TOKEN, "NaN")
        .replace(VOID_TOKEN, "undefined")
}

fn to_json(value: &Value, visited: &mut HashSet<usize>) -> serde_json::Value {
    match value {
        Value::Undefined => serde_json::Value::from(VOID_SENTINEL),
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Number(n) => number_to_json(*n),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Pattern(p) => serde_json::Value::String(p.to_string()),
        Value::Array(items) => {
            if !visited.insert(items.ptr()) {
                return serde_json::Value::from(CIRCULAR);
            }

            serde_json::Value::Array(
                items
                    .snapshot()
                    .iter()
                    .map(|item| to_json(item, visited))
                    .collect(),
            )
        }
        Value::Object(entries) => {
            if !visited.insert(entries.ptr()) {
                return serde_json::Value::from(CIRCULAR);
            }

            serde_json::Value::Object(
                entries
                    .snapshot()
                    .iter()
                    .map(|(key, item)| (key.clone(), to_json(item, visited)))
                    .collect(),
            )
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn number_to_json(n: f64) -> serde_json::Value {
    if n.is_nan() {
        serde_json::Value::from(NAN_SENTINEL)
    } else if n.is_infinite() {
        serde_json::Value::Null
    } else if n.fract() == 0.0 && n.abs() < MAX_SAFE_INTEGER {
        serde_json::Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n).map_or(serde_json::Value::Null, serde_json::Value::Number)
    }
}
