//! Key-order canonicalization of actual values against expected values.

use indexmap::IndexMap;
use std::collections::HashMap;

use crate::value::{Shared, Value};

/// Produces a copy of `actual` whose object keys follow `expected`'s order.
///
/// Keys that `expected` also has come first, in `expected`'s order; keys only
/// `actual` has follow in their original order. The reordering recurses into
/// nested structured values depth-first, with arrays mirrored element-wise.
/// Aliased and cyclic nodes of `actual` map to a single node of the copy.
///
/// # Arguments
///
/// * `actual` - The value to reorder.
/// * `expected` - The value whose key order is mirrored.
pub fn mirror_key_order(actual: &Value, expected: &Value) -> Value {
    let mut memo = HashMap::new();
    mirror(actual, expected, &mut memo)
}

fn mirror(actual: &Value, expected: &Value, memo: &mut HashMap<usize, Value>) -> Value {
    match actual {
        Value::Array(items) => {
            if let Some(done) = memo.get(&items.ptr()) {
                return done.clone();
            }

            let copy = Shared::new(Vec::new());
            memo.insert(items.ptr(), Value::Array(copy.clone()));

            let mirrored = items
                .snapshot()
                .iter()
                .enumerate()
                .map(|(index, item)| mirror(item, &expected.item(index).unwrap_or_default(), memo))
                .collect();
            *copy.write() = mirrored;

            Value::Array(copy)
        }
        Value::Object(entries) => {
            if let Some(done) = memo.get(&entries.ptr()) {
                return done.clone();
            }

            let copy = Shared::new(IndexMap::new());
            memo.insert(entries.ptr(), Value::Object(copy.clone()));

            let entries = entries.snapshot();
            let mut ordered = IndexMap::with_capacity(entries.len());

            if let Value::Object(expected_entries) = expected {
                let keys: Vec<String> = expected_entries.read().keys().cloned().collect();
                for key in keys {
                    if let Some(item) = entries.get(&key) {
                        let child = mirror(item, &expected.get(&key).unwrap_or_default(), memo);
                        ordered.insert(key, child);
                    }
                }
            }

            for (key, item) in &entries {
                if !ordered.contains_key(key) {
                    ordered.insert(key.clone(), item.clone());
                }
            }

            *copy.write() = ordered;
            Value::Object(copy)
        }
        _ => actual.clone(),
    }
}
