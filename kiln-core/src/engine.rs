//! The suite execution engine.

use futures::FutureExt;
use std::collections::HashSet;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use crate::config::Config;
use crate::context::Context;
use crate::error::Error;
use crate::format::format_failure;
use crate::report::{Report, Status, TestCaseSummary, TestSuiteSummary};
use crate::store::{Registry, SuiteStore};
use crate::suite::Suite;
use crate::testcase::{ExclusionKind, HookKind, TestCase, TestFn};
use crate::trace_categories;
use crate::util::panic_message;

/// Registers suites and runs them in batches.
///
/// Cloning an engine yields another handle to the same registry. Runs are
/// serialized: a call to [`Engine::run`] waits, in arrival order, until every
/// earlier run has completed.
#[derive(Clone, Default)]
pub struct Engine {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    registry: Mutex<Registry>,
    config: RwLock<Config>,
    run_lock: tokio::sync::Mutex<()>,
    running: AtomicBool,
}

/// Marks the engine as running until dropped, including on unwind.
struct RunningGuard<'a>(&'a AtomicBool);

impl<'a> RunningGuard<'a> {
    fn set(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl Engine {
    /// Creates an engine with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine with the given configuration.
    pub fn with_config(config: Config) -> Self {
        let engine = Self::default();
        engine.update_config(config);
        engine
    }

    /// Returns a copy of the current configuration.
    pub fn config(&self) -> Config {
        self.inner
            .config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces the configuration.
    pub fn update_config(&self, config: Config) {
        *self
            .inner
            .config
            .write()
            .unwrap_or_else(PoisonError::into_inner) = config;
    }

    /// Declares a suite and returns its registration handle.
    ///
    /// Every declaration creates a fresh store; declaring a name that is
    /// already queued in the newest batch opens a new batch. An empty name is
    /// rejected with a warning and yields a handle whose registrations are
    /// ignored.
    pub fn suite(&self, name: impl Into<String>) -> Suite {
        let name = name.into();

        if name.is_empty() {
            tracing::warn!(target: trace_categories::REGISTRATION, "suite name must not be empty; ignoring declaration");
        } else {
            let order = self.registry().declare(&name);
            tracing::debug!(target: trace_categories::REGISTRATION, suite = %name, order, "declared suite");
        }

        Suite::new(name, self.clone())
    }

    /// Appends a test case to the newest pending store of the named suite.
    pub fn register_test_case(&self, suite: &str, test_case: TestCase) {
        self.with_store(suite, "test", |store| store.tests.push(test_case));
    }

    /// Appends a hook to the newest pending store of the named suite.
    pub fn register_hook(&self, suite: &str, kind: HookKind, hook: TestFn) {
        self.with_store(suite, "hook", |store| store.hooks_mut(kind).push(hook));
    }

    /// Appends an `only` or `skip` entry to the newest pending store of the
    /// named suite.
    pub fn register_exclusion(&self, suite: &str, kind: ExclusionKind, test_case: TestCase) {
        self.with_store(suite, "exclusion", |store| {
            store.exclusions_mut(kind).push(test_case);
        });
    }

    /// Returns whether a run is in progress.
    pub fn is_running(&self) -> bool {
        self.inner.running.load(Ordering::SeqCst)
    }

    /// Returns the number of batches waiting to run.
    pub fn pending_batches(&self) -> usize {
        self.registry().pending_batches()
    }

    /// Runs the oldest pending batch and returns its report.
    ///
    /// With nothing queued, returns an empty report. A failing hook aborts the
    /// batch and is returned as [`Error::HookFailed`]; the batch's stores are
    /// consumed either way.
    pub async fn run(&self) -> Result<Report, Error> {
        let _permit = self.inner.run_lock.lock().await;
        let _running = RunningGuard::set(&self.inner.running);

        let config = self.config();
        if config.verbose {
            tracing::info!(target: trace_categories::ENGINE, project = %config.app_name, "starting run");
        }

        let next_batch = self.registry().next_batch();
        let Some(batch) = next_batch else {
            tracing::debug!(target: trace_categories::ENGINE, "no pending batches");
            return Ok(Report::empty(&config.app_name));
        };

        tracing::debug!(target: trace_categories::ENGINE, suites = ?batch, "running batch");

        let stores: Vec<SuiteStore> = batch
            .iter()
            .filter_map(|name| {
                let store = self.registry().take_store(name);
                if store.is_none() && config.verbose {
                    tracing::warn!(target: trace_categories::ENGINE, suite = %name, "no pending store for suite; skipping");
                }
                store
            })
            .collect();

        let run_only = stores.iter().any(|store| !store.only.is_empty());

        let mut report = Report::new(&config.app_name);
        for store in stores {
            report.add_suite(run_suite(store, run_only).await?);
        }
        report.finalize();

        tracing::debug!(
            target: trace_categories::ENGINE,
            total = report.stats().total,
            failed = report.stats().failed,
            "finished batch"
        );

        Ok(report)
    }

    fn registry(&self) -> MutexGuard<'_, Registry> {
        self.inner
            .registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn with_store(&self, suite: &str, what: &str, register: impl FnOnce(&mut SuiteStore)) {
        let mut registry = self.registry();
        if let Some(store) = registry.most_recent(suite) {
            tracing::debug!(target: trace_categories::REGISTRATION, suite, what, "registered");
            register(store);
        } else {
            drop(registry);
            if self.config().verbose {
                tracing::warn!(target: trace_categories::REGISTRATION, suite, what, "no pending store for suite; ignoring registration");
            }
        }
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("running", &self.is_running())
            .field("pending_batches", &self.pending_batches())
            .finish_non_exhaustive()
    }
}

async fn run_suite(store: SuiteStore, run_only: bool) -> Result<TestSuiteSummary, Error> {
    let SuiteStore {
        name,
        order,
        context,
        before,
        after,
        before_each,
        after_each,
        tests,
        only,
        skip,
    } = store;

    let mut summary = TestSuiteSummary::new(&name, order);
    let skipped: HashSet<&str> = skip.iter().map(|case| case.description.as_str()).collect();
    let to_run = if run_only { only } else { tests };

    if !to_run.is_empty() {
        run_hooks(&name, HookKind::Before, &before, &context).await?;

        for (index, case) in to_run.iter().enumerate() {
            if skipped.contains(case.description.as_str()) {
                let mut case_summary = TestCaseSummary::new(index, &case.description, &name);
                case_summary.record(Status::Skipped, None);
                summary.add(case_summary);
                continue;
            }

            let ctx = context.for_test(&case.description);
            run_hooks(&name, HookKind::BeforeEach, &before_each, &ctx).await?;

            let mut case_summary = TestCaseSummary::new(index, &case.description, &name);
            let outcome = AssertUnwindSafe((case.test)(ctx.clone()))
                .catch_unwind()
                .await
                .unwrap_or_else(|payload| {
                    Err(anyhow::anyhow!(
                        "test panicked: {}",
                        panic_message(payload.as_ref())
                    ))
                });

            match outcome {
                Ok(()) => case_summary.record(Status::Passed, None),
                Err(error) => {
                    let block = format_failure(&case.description, &error, &name);
                    case_summary.record(Status::Failed, Some(block));
                }
            }

            tracing::debug!(
                target: trace_categories::ENGINE,
                suite = %name,
                test = %case.description,
                status = %case_summary.results().status,
                "test finished"
            );
            summary.add(case_summary);

            run_hooks(&name, HookKind::AfterEach, &after_each, &ctx).await?;
        }

        run_hooks(&name, HookKind::After, &after, &context).await?;
    }

    summary.finalize();
    Ok(summary)
}

async fn run_hooks(
    suite: &str,
    kind: HookKind,
    hooks: &[TestFn],
    ctx: &Context,
) -> Result<(), Error> {
    for hook in hooks {
        tracing::debug!(target: trace_categories::HOOKS, suite, %kind, "running hook");
        hook(ctx.clone()).await.map_err(|source| Error::HookFailed {
            suite: suite.to_owned(),
            hook: kind,
            source,
        })?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::panic_in_result_fn)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_empty_run() -> anyhow::Result<()> {
        let engine = Engine::with_config(Config::default().with_app_name("Empty"));
        let report = engine.run().await?;

        assert_eq!(report.data().project_name, "Empty");
        assert_eq!(report.stats().total, 0);
        assert!(report.is_ok());
        assert!(report.stats().duration.abs() < f64::EPSILON);
        assert!(!engine.is_running());
        Ok(())
    }

    #[test]
    fn test_empty_name_is_not_declared() {
        let engine = Engine::new();
        engine.suite("").test("ignored", |_| async { Ok(()) });
        assert_eq!(engine.pending_batches(), 0);
    }

    #[test]
    fn test_registration_without_store_is_ignored() {
        let engine = Engine::new();
        engine.register_test_case("missing", TestCase::new("t", |_| async { Ok(()) }));
        assert_eq!(engine.pending_batches(), 0);
    }

    #[test]
    fn test_config_round_trip() {
        let engine = Engine::new();
        assert_eq!(engine.config(), Config::default());

        engine.update_config(Config::default().with_verbose(true));
        assert!(engine.config().verbose);
    }

    #[test]
    fn test_clones_share_registry() {
        let engine = Engine::new();
        let other = engine.clone();
        other.suite("A");
        assert_eq!(engine.pending_batches(), 1);
        assert!(format!("{engine:?}").contains("pending_batches: 1"));
    }
}
