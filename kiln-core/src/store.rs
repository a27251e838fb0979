//! Suite registration bookkeeping and the batch queue.

use std::collections::{HashMap, VecDeque};

use crate::context::Context;
use crate::testcase::{ExclusionKind, HookKind, TestCase, TestFn};

/// Everything registered by one declaration of a suite.
pub(crate) struct SuiteStore {
    pub name: String,
    pub order: usize,
    pub context: Context,
    pub before: Vec<TestFn>,
    pub after: Vec<TestFn>,
    pub before_each: Vec<TestFn>,
    pub after_each: Vec<TestFn>,
    pub tests: Vec<TestCase>,
    pub only: Vec<TestCase>,
    pub skip: Vec<TestCase>,
}

impl SuiteStore {
    fn new(name: &str, order: usize) -> Self {
        Self {
            name: name.to_owned(),
            order,
            context: Context::for_suite(name),
            before: vec![],
            after: vec![],
            before_each: vec![],
            after_each: vec![],
            tests: vec![],
            only: vec![],
            skip: vec![],
        }
    }

    pub const fn hooks_mut(&mut self, kind: HookKind) -> &mut Vec<TestFn> {
        match kind {
            HookKind::Before => &mut self.before,
            HookKind::After => &mut self.after,
            HookKind::BeforeEach => &mut self.before_each,
            HookKind::AfterEach => &mut self.after_each,
        }
    }

    pub const fn exclusions_mut(&mut self, kind: ExclusionKind) -> &mut Vec<TestCase> {
        match kind {
            ExclusionKind::Only => &mut self.only,
            ExclusionKind::Skip => &mut self.skip,
        }
    }
}

/// Pending suite stores, keyed by name, and the queue of batches to run.
///
/// A batch holds each name at most once; declaring a name that the newest
/// batch already holds opens a new batch.
#[derive(Default)]
pub(crate) struct Registry {
    suites: HashMap<String, VecDeque<SuiteStore>>,
    batches: VecDeque<Vec<String>>,
    declared: usize,
}

impl Registry {
    /// Creates a store for `name` and queues the name. Returns the store's
    /// creation order.
    pub fn declare(&mut self, name: &str) -> usize {
        let order = self.declared;
        self.declared += 1;

        match self.batches.back_mut() {
            Some(batch) if !batch.iter().any(|queued| queued == name) => {
                batch.push(name.to_owned());
            }
            _ => self.batches.push_back(vec![name.to_owned()]),
        }

        self.suites
            .entry(name.to_owned())
            .or_default()
            .push_back(SuiteStore::new(name, order));

        order
    }

    /// Returns the newest store for `name` that has not been executed yet.
    pub fn most_recent(&mut self, name: &str) -> Option<&mut SuiteStore> {
        self.suites.get_mut(name).and_then(VecDeque::back_mut)
    }

    /// Removes and returns the oldest batch.
    pub fn next_batch(&mut self) -> Option<Vec<String>> {
        self.batches.pop_front()
    }

    /// Removes and returns the oldest pending store for `name`.
    pub fn take_store(&mut self, name: &str) -> Option<SuiteStore> {
        let stores = self.suites.get_mut(name)?;
        let store = stores.pop_front();
        if stores.is_empty() {
            self.suites.remove(name);
        }
        store
    }

    /// Returns the number of batches waiting to run.
    pub fn pending_batches(&self) -> usize {
        self.batches.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_distinct_names_share_a_batch() {
        let mut registry = Registry::default();
        registry.declare("A");
        registry.declare("B");

        assert_eq!(registry.pending_batches(), 1);
        assert_eq!(registry.next_batch(), Some(vec![String::from("A"), String::from("B")]));
    }

    #[test]
    fn test_redeclaration_opens_new_batch() {
        let mut registry = Registry::default();
        registry.declare("A");
        registry.declare("B");
        registry.declare("A");
        registry.declare("C");

        assert_eq!(registry.next_batch(), Some(vec![String::from("A"), String::from("B")]));
        assert_eq!(registry.next_batch(), Some(vec![String::from("A"), String::from("C")]));
        assert_eq!(registry.next_batch(), None);
    }

    #[test]
    fn test_stores_are_consumed_oldest_first() {
        let mut registry = Registry::default();
        let first = registry.declare("A");
        let second = registry.declare("A");
        assert!(first < second);

        assert_eq!(registry.most_recent("A").map(|store| store.order), Some(second));
        assert_eq!(registry.take_store("A").map(|store| store.order), Some(first));
        assert_eq!(registry.take_store("A").map(|store| store.order), Some(second));
        assert!(registry.take_store("A").is_none());
        assert!(registry.most_recent("A").is_none());
    }
}
