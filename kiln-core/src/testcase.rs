//! Test and hook callbacks.

use futures::FutureExt;
use futures::future::BoxFuture;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::context::Context;

/// A type-erased asynchronous test or hook callback.
pub type TestFn = Arc<dyn Fn(Context) -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;

/// Erases an async closure into a [`TestFn`].
pub fn callback<F, Fut>(f: F) -> TestFn
where
    F: Fn(Context) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    Arc::new(move |ctx: Context| f(ctx).boxed())
}

/// A described test callback.
#[derive(Clone)]
pub struct TestCase {
    /// Description of the test; not required to be unique.
    pub description: String,
    /// The test body.
    pub test: TestFn,
}

impl TestCase {
    /// Creates a new test case.
    pub fn new<F, Fut>(description: impl Into<String>, test: F) -> Self
    where
        F: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Self {
            description: description.into(),
            test: callback(test),
        }
    }
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Lifecycle hook kinds.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum_macros::Display, strum_macros::EnumString,
)]
#[strum(serialize_all = "camelCase")]
pub enum HookKind {
    /// Runs once before the suite's first test.
    Before,
    /// Runs once after the suite's last test.
    After,
    /// Runs before every test that is not skipped.
    BeforeEach,
    /// Runs after every test that is not skipped.
    AfterEach,
}

/// Inclusion and exclusion markers.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum_macros::Display, strum_macros::EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub enum ExclusionKind {
    /// Run only marked tests across the whole batch.
    Only,
    /// Record the described tests as skipped.
    Skip,
}

#[cfg(test)]
#[allow(clippy::panic_in_result_fn)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_kind_names() -> anyhow::Result<()> {
        assert_eq!(HookKind::BeforeEach.to_string(), "beforeEach");
        assert_eq!(HookKind::from_str("afterEach")?, HookKind::AfterEach);
        assert_eq!(ExclusionKind::Only.to_string(), "only");
        Ok(())
    }

    #[tokio::test]
    async fn test_callback_erasure() -> anyhow::Result<()> {
        let case = TestCase::new("sets a value", |ctx: Context| async move {
            ctx.set("ran", true);
            Ok(())
        });

        let ctx = Context::for_suite("s");
        (case.test)(ctx.clone()).await?;
        assert!(ctx.payload().contains_key("ran"));
        Ok(())
    }
}
