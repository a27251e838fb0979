//! Hierarchical run results: test case, suite and report summaries.
//!
//! Each level keeps `total == passed + failed + skipped` and
//! `ok == (failed == 0)`, updated as every child result arrives.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::timer::Timer;

/// Outcome of a single test case.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Status {
    /// The test body completed without error.
    #[default]
    Passed,
    /// The test body returned an error or panicked.
    Failed,
    /// The test was excluded by a skip marker.
    Skipped,
    /// The test exceeded its time allowance.
    TimedOut,
}

impl Status {
    /// Returns whether the status counts as a failure.
    pub const fn is_failure(self) -> bool {
        matches!(self, Self::Failed | Self::TimedOut)
    }
}

/// Counters and timing shared by every summary level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    /// Number of results recorded.
    pub total: usize,
    /// Number of passed results.
    pub passed: usize,
    /// Number of failed (or timed out) results.
    pub failed: usize,
    /// Number of skipped results.
    pub skipped: usize,
    /// Whether nothing failed.
    pub ok: bool,
    /// Elapsed milliseconds.
    pub duration: f64,
    /// Start timestamp, in milliseconds since the Unix epoch.
    pub start_ts: f64,
    /// Finish timestamp, in milliseconds since the Unix epoch.
    pub finish_ts: f64,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            total: 0,
            passed: 0,
            failed: 0,
            skipped: 0,
            ok: true,
            duration: 0.0,
            start_ts: 0.0,
            finish_ts: 0.0,
        }
    }
}

impl Stats {
    fn record(&mut self, status: Status) {
        self.total += 1;
        match status {
            Status::Passed => self.passed += 1,
            Status::Failed | Status::TimedOut => self.failed += 1,
            Status::Skipped => self.skipped += 1,
        }
        self.ok = self.failed == 0;
    }

    fn absorb(&mut self, other: &Self) {
        self.total += other.total;
        self.passed += other.passed;
        self.failed += other.failed;
        self.skipped += other.skipped;
        self.ok = self.failed == 0;
    }

    fn stamp(&mut self, timer: &Timer) {
        self.finish_ts = timer.finish_ts().unwrap_or(self.start_ts);
        self.duration = timer.duration().unwrap_or_default();
    }
}

/// Free-form annotation attached to a test result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// Annotation type.
    #[serde(rename = "type")]
    pub kind: String,
    /// Optional annotation text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Serialized result of one test case.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseResults {
    /// Position of the test within its suite's executed list.
    pub order: usize,
    /// Description of the test.
    pub description: String,
    /// Name of the owning suite.
    pub suite_name: String,
    /// Annotations; currently always empty.
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    /// Whether the test did not fail.
    pub ok: bool,
    /// Number of retries; always zero.
    pub retry: u32,
    /// Formatted failure blocks.
    pub errors: Vec<String>,
    /// Outcome.
    pub status: Status,
    /// Start timestamp.
    pub start_ts: f64,
    /// Finish timestamp.
    pub finish_ts: f64,
    /// Elapsed milliseconds.
    pub duration: f64,
}

/// Serialized result of one suite.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiteResults {
    /// Name of the suite.
    pub suite_name: String,
    /// Creation order of the suite registration.
    pub suite_order: usize,
    /// Aggregated stats.
    pub stats: Stats,
    /// Test case results in execution order.
    pub tests: Vec<TestCaseResults>,
}

/// Serialized result of one run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportData {
    /// Project name from the configuration.
    pub project_name: String,
    /// Aggregated stats.
    pub stats: Stats,
    /// Suite results in execution order.
    pub suites: Vec<SuiteResults>,
}

impl ReportData {
    /// Parses a report from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    /// Renders the report as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Accumulates the result of a single test case.
#[derive(Clone, Debug)]
pub struct TestCaseSummary {
    results: TestCaseResults,
    timer: Timer,
}

impl TestCaseSummary {
    /// Starts timing a test case.
    pub fn new(order: usize, description: &str, suite_name: &str) -> Self {
        let timer = Timer::start();
        Self {
            results: TestCaseResults {
                order,
                description: description.to_owned(),
                suite_name: suite_name.to_owned(),
                ok: true,
                start_ts: timer.start_ts(),
                ..TestCaseResults::default()
            },
            timer,
        }
    }

    /// Records the outcome and finalizes timing.
    pub fn record(&mut self, status: Status, error: Option<String>) {
        self.results.errors = error.into_iter().collect();
        self.results.status = status;
        self.results.ok = !status.is_failure();
        self.results.retry = 0;
        self.finalize();
    }

    /// Stops the timer and stamps the finish time and duration.
    pub fn finalize(&mut self) {
        self.timer.stop();
        self.results.finish_ts = self.timer.finish_ts().unwrap_or(self.results.start_ts);
        self.results.duration = self.timer.duration().unwrap_or_default();
    }

    /// Returns the accumulated results.
    pub const fn results(&self) -> &TestCaseResults {
        &self.results
    }
}

/// Accumulates the results of one suite.
#[derive(Clone, Debug)]
pub struct TestSuiteSummary {
    results: SuiteResults,
    timer: Timer,
}

impl TestSuiteSummary {
    /// Starts timing a suite.
    pub fn new(suite_name: &str, suite_order: usize) -> Self {
        let timer = Timer::start();
        Self {
            results: SuiteResults {
                suite_name: suite_name.to_owned(),
                suite_order,
                stats: Stats {
                    start_ts: timer.start_ts(),
                    ..Stats::default()
                },
                tests: vec![],
            },
            timer,
        }
    }

    /// Folds in a finalized test case.
    pub fn add(&mut self, test_case: TestCaseSummary) {
        self.results.stats.record(test_case.results.status);
        self.results.tests.push(test_case.results);
    }

    /// Stops the timer and stamps the finish time and duration.
    pub fn finalize(&mut self) {
        self.timer.stop();
        self.results.stats.stamp(&self.timer);
    }

    /// Returns the accumulated results.
    pub const fn results(&self) -> &SuiteResults {
        &self.results
    }
}

/// Accumulates the results of one run.
#[derive(Clone, Debug)]
pub struct Report {
    data: ReportData,
    timer: Timer,
}

impl Report {
    /// Starts timing a run.
    pub fn new(project_name: &str) -> Self {
        let timer = Timer::start();
        Self {
            data: ReportData {
                project_name: project_name.to_owned(),
                stats: Stats {
                    start_ts: timer.start_ts(),
                    ..Stats::default()
                },
                suites: vec![],
            },
            timer,
        }
    }

    /// Returns an empty report with zero duration.
    pub fn empty(project_name: &str) -> Self {
        let mut report = Self::new(project_name);
        report.data.stats.finish_ts = report.data.stats.start_ts;
        report
    }

    /// Folds in a finalized suite.
    pub fn add_suite(&mut self, suite: TestSuiteSummary) {
        self.data.stats.absorb(&suite.results.stats);
        self.data.suites.push(suite.results);
    }

    /// Stops the timer and stamps the finish time and duration.
    pub fn finalize(&mut self) {
        self.timer.stop();
        self.data.stats.stamp(&self.timer);
    }

    /// Returns the report data.
    pub const fn data(&self) -> &ReportData {
        &self.data
    }

    /// Consumes the report, returning its data.
    pub fn into_data(self) -> ReportData {
        self.data
    }

    /// Returns the aggregated stats.
    pub const fn stats(&self) -> &Stats {
        &self.data.stats
    }

    /// Returns the suite results.
    pub fn suites(&self) -> &[SuiteResults] {
        &self.data.suites
    }

    /// Returns whether nothing failed.
    pub const fn is_ok(&self) -> bool {
        self.data.stats.ok
    }

    /// Renders the report as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String, Error> {
        self.data.to_json_string()
    }
}

#[cfg(test)]
#[allow(clippy::panic_in_result_fn)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn case(order: usize, status: Status) -> TestCaseSummary {
        let mut summary = TestCaseSummary::new(order, "t", "S");
        summary.record(status, status.is_failure().then(|| String::from("boom")));
        summary
    }

    fn assert_invariants(stats: &Stats) {
        assert_eq!(stats.total, stats.passed + stats.failed + stats.skipped);
        assert_eq!(stats.ok, stats.failed == 0);
    }

    #[test]
    fn test_suite_rollup() {
        let mut suite = TestSuiteSummary::new("S", 0);
        suite.add(case(0, Status::Passed));
        suite.add(case(1, Status::Skipped));
        suite.add(case(2, Status::Failed));
        suite.add(case(3, Status::TimedOut));
        suite.finalize();

        let stats = &suite.results().stats;
        assert_eq!((stats.total, stats.passed, stats.failed, stats.skipped), (4, 1, 2, 1));
        assert!(!stats.ok);
        assert_invariants(stats);
        assert!(stats.finish_ts >= stats.start_ts);
    }

    #[test]
    fn test_skipped_case_is_ok() {
        let summary = case(0, Status::Skipped);
        assert!(summary.results().ok);
        assert!(summary.results().errors.is_empty());
        assert!(summary.results().finish_ts >= summary.results().start_ts);
    }

    #[test]
    fn test_report_rollup() {
        let mut report = Report::new("Project");

        let mut first = TestSuiteSummary::new("A", 0);
        first.add(case(0, Status::Passed));
        first.finalize();

        let mut second = TestSuiteSummary::new("B", 1);
        second.add(case(0, Status::Skipped));
        second.finalize();

        report.add_suite(first);
        report.add_suite(second);
        report.finalize();

        assert_eq!(report.stats().total, 2);
        assert_eq!(report.stats().skipped, 1);
        assert!(report.is_ok());
        assert_invariants(report.stats());
        assert_eq!(report.suites().len(), 2);
    }

    #[test]
    fn test_empty_report() {
        let report = Report::empty("Project");
        assert_eq!(report.stats().total, 0);
        assert!(report.is_ok());
        assert_eq!(report.stats().duration, 0.0);
        assert_eq!(report.stats().finish_ts, report.stats().start_ts);
    }

    #[test]
    fn test_json_shape() -> anyhow::Result<()> {
        let mut report = Report::new("Project");
        let mut suite = TestSuiteSummary::new("A", 3);
        suite.add(case(0, Status::TimedOut));
        suite.finalize();
        report.add_suite(suite);
        report.finalize();

        let json: serde_json::Value = serde_json::from_str(&report.to_json_string()?)?;
        assert_eq!(json["projectName"], "Project");
        assert_eq!(json["stats"]["failed"], 1);
        assert_eq!(json["suites"][0]["suiteOrder"], 3);
        assert_eq!(json["suites"][0]["tests"][0]["status"], "timedOut");
        assert_eq!(json["suites"][0]["tests"][0]["suiteName"], "S");
        assert_eq!(json["suites"][0]["tests"][0]["retry"], 0);
        assert!(json["suites"][0]["tests"][0]["startTs"].is_number());

        let parsed = ReportData::from_json(&report.to_json_string()?)?;
        assert_eq!(parsed.project_name, "Project");
        assert_eq!(parsed.stats.total, 1);
        assert_eq!(parsed.suites[0].tests[0].status, Status::TimedOut);
        assert_eq!(parsed.suites[0].tests[0].errors, vec![String::from("boom")]);
        Ok(())
    }
}
