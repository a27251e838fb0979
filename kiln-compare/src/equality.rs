//! Deep structural equality.

use std::collections::HashSet;

use crate::value::Value;

/// Returns whether two values are structurally equal.
///
/// Objects compare by key set and per-key values regardless of key order, arrays
/// compare element-wise, `NaN` equals `NaN`, and patterns compare by source.
/// Cyclic structures terminate: a pair of nodes already under comparison is
/// assumed equal.
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    let mut in_progress = HashSet::new();
    equal(a, b, &mut in_progress)
}

#[allow(clippy::float_cmp)]
fn equal(a: &Value, b: &Value, in_progress: &mut HashSet<(usize, usize)>) -> bool {
    match (a, b) {
        (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => x == y || (x.is_nan() && y.is_nan()),
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Pattern(x), Value::Pattern(y)) => x == y,
        (Value::Array(x), Value::Array(y)) => {
            if x.ptr_eq(y) || !in_progress.insert((x.ptr(), y.ptr())) {
                return true;
            }

            let (xs, ys) = (x.snapshot(), y.snapshot());
            xs.len() == ys.len()
                && xs
                    .iter()
                    .zip(ys.iter())
                    .all(|(l, r)| equal(l, r, in_progress))
        }
        (Value::Object(x), Value::Object(y)) => {
            if x.ptr_eq(y) || !in_progress.insert((x.ptr(), y.ptr())) {
                return true;
            }

            let (xs, ys) = (x.snapshot(), y.snapshot());
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(key, l)| ys.get(key).is_some_and(|r| equal(l, r, in_progress)))
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_order_is_ignored() {
        let a = Value::from(json!({"a": 1, "b": [1, 2]}));
        let b = Value::from(json!({"b": [1, 2], "a": 1}));
        assert!(deep_equal(&a, &b));
    }

    #[test]
    fn test_mismatches() {
        assert!(!deep_equal(&Value::from(json!([1, 2])), &Value::from(json!([1, 2, 3]))));
        assert!(!deep_equal(&Value::from(json!({"a": 1})), &Value::from(json!({"b": 1}))));
        assert!(!deep_equal(&Value::from(1), &Value::from("1")));
        assert!(!deep_equal(&Value::Null, &Value::Undefined));
    }

    #[test]
    fn test_nan_equals_nan() {
        assert!(deep_equal(
            &Value::Number(f64::NAN),
            &Value::Number(f64::NAN)
        ));
    }

    #[test]
    fn test_cycles_terminate() {
        let a = Value::from(json!({"name": "a"}));
        a.insert("self", a.clone());
        let b = Value::from(json!({"name": "a"}));
        b.insert("self", b.clone());

        assert!(deep_equal(&a, &b));

        let c = Value::from(json!({"name": "c"}));
        c.insert("self", c.clone());
        assert!(!deep_equal(&a, &c));
    }
}
