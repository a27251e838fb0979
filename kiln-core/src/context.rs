//! Execution context handed to tests and hooks.

use indexmap::IndexMap;
use kiln_compare::Value;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Snapshot of where a callback runs, plus the suite's shared user payload.
///
/// Every invocation receives its own `Context`; the suite and test identity
/// are fixed at creation. The payload is shared by all callbacks of one suite
/// registration, so hooks can hand values to tests.
#[derive(Clone, Debug)]
pub struct Context {
    suite: String,
    test: Option<String>,
    payload: Payload,
}

impl Context {
    pub(crate) fn for_suite(suite: &str) -> Self {
        Self {
            suite: suite.to_owned(),
            test: None,
            payload: Payload::default(),
        }
    }

    pub(crate) fn for_test(&self, description: &str) -> Self {
        Self {
            suite: self.suite.clone(),
            test: Some(description.to_owned()),
            payload: self.payload.clone(),
        }
    }

    /// Returns the name of the suite being executed.
    pub fn suite(&self) -> &str {
        &self.suite
    }

    /// Returns the description of the test being executed, if any. Suite-level
    /// `before` and `after` hooks see `None`.
    pub fn test(&self) -> Option<&str> {
        self.test.as_deref()
    }

    /// Returns the shared user payload.
    pub const fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Reads a payload entry.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.payload.get(key)
    }

    /// Writes a payload entry, returning the previous value.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.payload.set(key, value)
    }
}

/// Key-value store shared by the callbacks of one suite registration.
#[derive(Clone, Debug, Default)]
pub struct Payload(Arc<Mutex<IndexMap<String, Value>>>);

impl Payload {
    fn entries(&self) -> MutexGuard<'_, IndexMap<String, Value>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reads an entry.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.entries().get(key).cloned()
    }

    /// Writes an entry, returning the previous value.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries().insert(key.into(), value.into())
    }

    /// Removes an entry, returning its value.
    pub fn remove(&self, key: &str) -> Option<Value> {
        self.entries().shift_remove(key)
    }

    /// Returns whether an entry exists.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries().contains_key(key)
    }

    /// Returns the keys in insertion order.
    pub fn keys(&self) -> Vec<String> {
        self.entries().keys().cloned().collect()
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    /// Returns whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_and_shared_payload() {
        let suite_ctx = Context::for_suite("Math");
        suite_ctx.set("answer", 42);

        let test_ctx = suite_ctx.for_test("adds");
        assert_eq!(test_ctx.suite(), "Math");
        assert_eq!(test_ctx.test(), Some("adds"));
        assert_eq!(suite_ctx.test(), None);
        assert_eq!(test_ctx.get("answer"), Some(Value::from(42)));

        test_ctx.set("seen", true);
        assert!(suite_ctx.payload().contains_key("seen"));
        assert_eq!(suite_ctx.payload().keys(), vec!["answer", "seen"]);
    }

    #[test]
    fn test_remove() {
        let ctx = Context::for_suite("s");
        ctx.set("k", "v");
        assert_eq!(ctx.payload().remove("k"), Some(Value::from("v")));
        assert!(ctx.payload().is_empty());
    }
}
