use crate::testcase::HookKind;

/// Monolithic error type for the engine and its reporters.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A lifecycle hook failed; the rest of the batch was abandoned.
    #[error("{hook} hook failed in suite '{suite}'")]
    HookFailed {
        /// Name of the suite whose hook failed.
        suite: String,
        /// Kind of the failing hook.
        hook: HookKind,
        /// The error returned by the hook.
        #[source]
        source: anyhow::Error,
    },

    /// An I/O error occurred while writing a report.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A report could not be serialized or deserialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Rendered report output was not valid UTF-8.
    #[error("invalid UTF-8 in report output: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// A JUnit report could not be written.
    #[error("failed to write JUnit report: {0}")]
    Junit(String),

    /// A measured duration could not be represented.
    #[error("duration out of range: {0}ms")]
    DurationOutOfRange(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hook_failure_display_and_source() {
        let err = Error::HookFailed {
            suite: String::from("Math"),
            hook: HookKind::BeforeEach,
            source: anyhow::anyhow!("database unavailable"),
        };

        assert_eq!(err.to_string(), "beforeEach hook failed in suite 'Math'");
        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("database unavailable"));
    }
}
