//! Suite registration handles.

use std::future::Future;

use crate::context::Context;
use crate::engine::Engine;
use crate::testcase::{ExclusionKind, HookKind, TestCase, callback};

/// Handle for registering tests and hooks with one suite declaration.
///
/// The handle holds no state of its own; every call forwards to the engine,
/// which appends to the newest store declared under the handle's name.
#[derive(Clone, Debug)]
pub struct Suite {
    name: String,
    engine: Engine,
}

impl Suite {
    pub(crate) const fn new(name: String, engine: Engine) -> Self {
        Self { name, engine }
    }

    /// Returns the suite's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the engine the suite is registered with.
    pub const fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Registers a test.
    ///
    /// # Arguments
    ///
    /// * `description` - Description of the test; need not be unique.
    /// * `test` - The test body.
    pub fn test<F, Fut>(&self, description: impl Into<String>, test: F) -> &Self
    where
        F: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.engine
            .register_test_case(&self.name, TestCase::new(description, test));
        self
    }

    /// Registers a hook run once before the suite's first test.
    pub fn before<F, Fut>(&self, hook: F) -> &Self
    where
        F: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.hook(HookKind::Before, hook)
    }

    /// Registers a hook run once after the suite's last test.
    pub fn after<F, Fut>(&self, hook: F) -> &Self
    where
        F: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.hook(HookKind::After, hook)
    }

    /// Registers a hook run before every test that is not skipped.
    pub fn before_each<F, Fut>(&self, hook: F) -> &Self
    where
        F: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.hook(HookKind::BeforeEach, hook)
    }

    /// Registers a hook run after every test that is not skipped, whatever its
    /// outcome.
    pub fn after_each<F, Fut>(&self, hook: F) -> &Self
    where
        F: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.hook(HookKind::AfterEach, hook)
    }

    /// Registers a test that runs in place of the regular tests.
    ///
    /// Once any suite in a batch has an `only` test, every suite in that batch
    /// runs just its `only` tests.
    pub fn only<F, Fut>(&self, description: impl Into<String>, test: F) -> &Self
    where
        F: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.engine.register_exclusion(
            &self.name,
            ExclusionKind::Only,
            TestCase::new(description, test),
        );
        self
    }

    /// Marks tests with the given description as skipped. The callback is
    /// never run.
    pub fn skip<F, Fut>(&self, description: impl Into<String>, test: F) -> &Self
    where
        F: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.engine.register_exclusion(
            &self.name,
            ExclusionKind::Skip,
            TestCase::new(description, test),
        );
        self
    }

    fn hook<F, Fut>(&self, kind: HookKind, hook: F) -> &Self
    where
        F: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.engine.register_hook(&self.name, kind, callback(hook));
        self
    }
}
