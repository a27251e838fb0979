//! Failure block formatting.

use std::backtrace::BacktraceStatus;
use std::sync::LazyLock;

use crate::assert::{AssertError, Assertion};

/// Frames from these crates are dropped from rendered stack traces.
static FRAMEWORK_FRAME: LazyLock<Option<regex::Regex>> = LazyLock::new(|| {
    regex::Regex::new(
        r"^\s*\d+:\s+<?(std|core|alloc|tokio|futures_util|futures|anyhow|kiln_core|kiln_compare|kiln|__rust)\b",
    )
    .ok()
});

static FRAME_HEADER: LazyLock<Option<regex::Regex>> =
    LazyLock::new(|| regex::Regex::new(r"^\s*\d+:\s").ok());

/// Finds the assertion carried by an error, looking through custom errors and
/// context layers.
pub fn find_assertion(error: &anyhow::Error) -> Option<&Assertion> {
    for cause in error.chain() {
        if let Some(assertion) = cause.downcast_ref::<Assertion>() {
            return Some(assertion);
        }
        if let Some(assert_error) = cause.downcast_ref::<AssertError>() {
            match assert_error {
                AssertError::Failed(assertion) => return Some(assertion),
                AssertError::Custom(inner) => return find_assertion(inner),
            }
        }
    }
    None
}

/// Renders the failure block recorded for a failed test.
///
/// # Arguments
///
/// * `description` - Description of the failed test.
/// * `error` - The error the test body returned.
/// * `suite` - Name of the owning suite.
pub fn format_failure(description: &str, error: &anyhow::Error, suite: &str) -> String {
    let mut out = format!(" ✘ {suite} >>> {description}\n");

    if let Some(assertion) = find_assertion(error) {
        out.push_str("    ");
        out.push_str(&assertion.message);
        out.push_str("  (");
        out.push_str(assertion.operator.name());
        out.push_str(")\n");

        if let Some(details) = &assertion.details {
            out.push('\n');
            out.push_str(&indent::indent_all_by(8, details.as_str()));
        }
    } else {
        let rendered = format!("{error:#}");
        out.push_str("    ");
        out.push_str(&rendered.replace('\n', "\n    "));
        out.push('\n');
    }

    let backtrace = error.backtrace();
    if backtrace.status() == BacktraceStatus::Captured {
        out.push_str(&clean_stack(&backtrace.to_string()));
    }

    out
}

/// Drops framework frames (and their source locations) from a rendered stack
/// trace and re-indents what remains.
fn clean_stack(stack: &str) -> String {
    let (Some(framework), Some(header)) = (&*FRAMEWORK_FRAME, &*FRAME_HEADER) else {
        return String::new();
    };

    let mut out = String::new();
    let mut keep = false;

    for line in stack.lines() {
        if header.is_match(line) {
            keep = !framework.is_match(line);
        }
        if keep {
            out.push_str("\n    ");
            out.push_str(line.trim());
        }
    }

    if !out.is_empty() {
        out.push('\n');
    }
    out
}
