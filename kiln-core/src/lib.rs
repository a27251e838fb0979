//! Core of the kiln test framework: suite registration and batched execution,
//! assertions, failure formatting and result reporting.
//!
//! ```no_run
//! use kiln_core::{Engine, assert};
//!
//! # async fn demo() -> Result<(), kiln_core::Error> {
//! let engine = Engine::new();
//! engine
//!     .suite("Math")
//!     .test("adds", |_| async {
//!         assert::is(1 + 1, 2)?;
//!         Ok(())
//!     });
//!
//! let report = engine.run().await?;
//! assert!(report.is_ok());
//! # Ok(())
//! # }
//! ```

pub mod assert;
mod config;
mod context;
mod engine;
mod error;
mod format;
mod report;
pub mod reporting;
mod store;
mod suite;
mod testcase;
mod timer;
pub mod trace_categories;
mod util;

pub use config::{Config, DEFAULT_APP_NAME, Reporters};
pub use context::{Context, Payload};
pub use engine::Engine;
pub use error::Error;
pub use format::{find_assertion, format_failure};
pub use report::{
    Annotation, Report, ReportData, Stats, Status, SuiteResults, TestCaseResults,
    TestCaseSummary, TestSuiteSummary,
};
pub use suite::Suite;
pub use testcase::{ExclusionKind, HookKind, TestCase, TestFn, callback};
pub use timer::{Timer, format_duration_ms};
pub use util::dedent;

pub use kiln_compare::{Pattern, Value, ValueKind};
