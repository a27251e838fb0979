//! Reporting utilities for run results.

use colored::Colorize;
use std::io::Write;

use crate::config::Config;
use crate::error::Error;
use crate::report::{Report, Status, SuiteResults, TestCaseResults};
use crate::timer::format_duration_ms;

/// Output format of a reporter.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub enum ReportFormat {
    /// Colored, human-readable output.
    #[default]
    Pretty,
    /// The JSON report document.
    Json,
    /// JUnit XML.
    Junit,
    /// No output.
    Terse,
}

/// Returns the formats selected by the configured reporters.
pub fn formats_for(config: &Config) -> Vec<ReportFormat> {
    let reporters = &config.reporters;
    [
        (reporters.console, ReportFormat::Pretty),
        (reporters.json, ReportFormat::Json),
        (reporters.junit, ReportFormat::Junit),
    ]
    .into_iter()
    .filter_map(|(enabled, format)| enabled.then_some(format))
    .collect()
}

/// Writes a report in the given format.
pub fn report_results<W: Write>(
    report: &Report,
    format: ReportFormat,
    writer: W,
) -> Result<(), Error> {
    match format {
        ReportFormat::Pretty => write_pretty(report, writer),
        ReportFormat::Json => write_json(report, writer),
        ReportFormat::Junit => write_junit(report, writer),
        ReportFormat::Terse => Ok(()),
    }
}

/// Writes the report as pretty-printed JSON.
pub fn write_json<W: Write>(report: &Report, mut writer: W) -> Result<(), Error> {
    writeln!(writer, "{}", report.to_json_string()?)?;
    Ok(())
}

/// Writes colored, human-readable results followed by a summary line.
pub fn write_pretty<W: Write>(report: &Report, mut writer: W) -> Result<(), Error> {
    for suite in report.suites() {
        write_suite_details(suite, &mut writer)?;
    }

    let stats = report.stats();
    let verdict = if stats.ok {
        "PASSED".bright_green()
    } else {
        "FAILED".bright_red()
    };

    writeln!(
        writer,
        "{}: {verdict} ({} total, {} passed, {} failed, {} skipped) in {}",
        report.data().project_name.bold(),
        stats.total,
        stats.passed.to_string().green(),
        stats.failed.to_string().red(),
        stats.skipped.to_string().yellow(),
        format_duration_ms(stats.duration),
    )?;

    Ok(())
}

fn write_suite_details<W: Write>(suite: &SuiteResults, writer: &mut W) -> Result<(), Error> {
    writeln!(
        writer,
        "=================== {}: [{}] ===================",
        "Suite".blue(),
        suite.suite_name.italic(),
    )?;

    for test in &suite.tests {
        write_test_details(test, writer)?;
    }

    writeln!(
        writer,
        "    {} of {} passed in {}",
        suite.stats.passed,
        suite.stats.total,
        format_duration_ms(suite.stats.duration),
    )?;

    Ok(())
}

fn write_test_details<W: Write>(test: &TestCaseResults, writer: &mut W) -> Result<(), Error> {
    write!(
        writer,
        "* {}: [{}]... ",
        "Test case".bright_yellow(),
        test.description.italic()
    )?;

    match test.status {
        Status::Passed => writeln!(writer, "{}", "ok.".bright_green())?,
        Status::Skipped => writeln!(writer, "{}", "skipped.".bright_magenta())?,
        Status::Failed | Status::TimedOut => {
            writeln!(writer, "{}", "FAILED.".bright_red())?;
            for error in &test.errors {
                writeln!(writer, "{}", indent::indent_all_by(4, error.as_str()))?;
            }
        }
    }

    Ok(())
}

/// Writes the report as JUnit XML.
pub fn write_junit<W: Write>(report: &Report, mut writer: W) -> Result<(), Error> {
    let mut junit = junit_report::Report::new();

    for result in report.suites() {
        let mut suite = junit_report::TestSuite::new(result.suite_name.as_str());
        for test in &result.tests {
            let mut test_case = match test.status {
                Status::Passed => {
                    junit_report::TestCase::success(&test.description, junit_duration(test.duration)?)
                }
                Status::Skipped => junit_report::TestCase::skipped(&test.description),
                Status::Failed | Status::TimedOut => junit_report::TestCase::failure(
                    &test.description,
                    junit_duration(test.duration)?,
                    "test failure",
                    &test.status.to_string(),
                ),
            };

            let mut output_buf: Vec<u8> = vec![];
            write_test_details(test, &mut output_buf)?;

            let output_as_string = String::from_utf8(output_buf)?;
            test_case.set_system_out(strip_ansi_escapes::strip_str(output_as_string).as_str());

            suite.add_testcase(test_case);
        }

        junit.add_testsuite(suite);
    }

    junit
        .write_xml(&mut writer)
        .map_err(|e| Error::Junit(e.to_string()))?;
    writeln!(writer)?;

    Ok(())
}

fn junit_duration<D: TryFrom<std::time::Duration>>(duration_ms: f64) -> Result<D, Error> {
    std::time::Duration::try_from_secs_f64(duration_ms / 1000.0)
        .ok()
        .and_then(|duration| duration.try_into().ok())
        .ok_or(Error::DurationOutOfRange(duration_ms))
}

#[cfg(test)]
#[allow(clippy::panic_in_result_fn)]
mod tests {
    use super::*;
    use crate::config::Reporters;
    use crate::report::{TestCaseSummary, TestSuiteSummary};
    use pretty_assertions::assert_eq;

    fn sample_report() -> Report {
        let mut suite = TestSuiteSummary::new("Math", 0);

        let mut adds = TestCaseSummary::new(0, "adds", "Math");
        adds.record(Status::Passed, None);
        suite.add(adds);

        let mut subtracts = TestCaseSummary::new(1, "subtracts", "Math");
        subtracts.record(Status::Failed, Some(String::from(" ✘ Math >>> subtracts\n")));
        suite.add(subtracts);

        let mut divides = TestCaseSummary::new(2, "divides", "Math");
        divides.record(Status::Skipped, None);
        suite.add(divides);

        suite.finalize();

        let mut report = Report::new("Calc");
        report.add_suite(suite);
        report.finalize();
        report
    }

    fn render(format: ReportFormat) -> anyhow::Result<String> {
        colored::control::set_override(false);
        let mut buf = vec![];
        report_results(&sample_report(), format, &mut buf)?;
        Ok(String::from_utf8(buf)?)
    }

    #[test]
    fn test_pretty_output() -> anyhow::Result<()> {
        let output = render(ReportFormat::Pretty)?;

        assert!(output.contains("* Test case: [adds]... ok."));
        assert!(output.contains("* Test case: [subtracts]... FAILED."));
        assert!(output.contains("     ✘ Math >>> subtracts"));
        assert!(output.contains("* Test case: [divides]... skipped."));
        assert!(output.contains("Calc: FAILED (3 total, 1 passed, 1 failed, 1 skipped)"));
        Ok(())
    }

    #[test]
    fn test_json_output_parses() -> anyhow::Result<()> {
        let output = render(ReportFormat::Json)?;
        let data = crate::report::ReportData::from_json(&output)?;

        assert_eq!(data.project_name, "Calc");
        assert_eq!(data.stats.total, 3);
        assert_eq!(data.suites[0].tests[1].errors.len(), 1);
        Ok(())
    }

    #[test]
    fn test_junit_output() -> anyhow::Result<()> {
        let output = render(ReportFormat::Junit)?;

        assert!(output.contains("<testsuite"));
        assert!(output.contains("name=\"Math\""));
        assert!(output.contains("name=\"subtracts\""));
        assert!(output.contains("<failure"));
        assert!(output.contains("<skipped"));
        Ok(())
    }

    #[test]
    fn test_terse_output_is_empty() -> anyhow::Result<()> {
        assert_eq!(render(ReportFormat::Terse)?, "");
        Ok(())
    }

    #[test]
    fn test_formats_for_config() {
        let config = Config::default().with_reporters(Reporters {
            console: false,
            json: true,
            junit: true,
        });
        assert_eq!(
            formats_for(&config),
            vec![ReportFormat::Json, ReportFormat::Junit]
        );
        assert_eq!(formats_for(&Config::default()), vec![ReportFormat::Pretty]);
    }

    #[test]
    fn test_junit_duration() {
        assert!(junit_duration::<std::time::Duration>(12.5).is_ok());
        assert!(matches!(
            junit_duration::<std::time::Duration>(f64::NAN),
            Err(Error::DurationOutOfRange(_))
        ));
    }
}
