//! Engine configuration.
//!
//! Every field has a default and unknown fields are ignored, so configuration
//! sources can be partial and forward compatible.

use serde::{Deserialize, Serialize};

/// Default project name used in reports.
pub const DEFAULT_APP_NAME: &str = "Test Project";

/// Root configuration for an engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Project name recorded in reports.
    pub app_name: String,

    /// Emit diagnostic warnings and progress messages.
    pub verbose: bool,

    /// Enable debug tracing of the engine internals.
    pub debug: bool,

    /// Which reporters to drive after a run.
    pub reporters: Reporters,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_owned(),
            verbose: false,
            debug: false,
            reporters: Reporters::default(),
        }
    }
}

impl Config {
    /// Returns the configuration with the given project name.
    #[must_use]
    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = app_name.into();
        self
    }

    /// Returns the configuration with verbosity set as given.
    #[must_use]
    pub const fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Returns the configuration with debug tracing set as given.
    #[must_use]
    pub const fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Returns the configuration with the given reporters.
    #[must_use]
    pub const fn with_reporters(mut self, reporters: Reporters) -> Self {
        self.reporters = reporters;
        self
    }
}

/// Reporter selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reporters {
    /// Human-readable console output.
    pub console: bool,
    /// JSON report document.
    pub json: bool,
    /// JUnit XML report.
    pub junit: bool,
}

impl Default for Reporters {
    fn default() -> Self {
        Self {
            console: true,
            json: false,
            junit: false,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic_in_result_fn)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.app_name, "Test Project");
        assert!(!config.verbose);
        assert!(config.reporters.console);
        assert!(!config.reporters.json);
    }

    #[test]
    fn test_partial_json_uses_defaults() -> anyhow::Result<()> {
        let config: Config =
            serde_json::from_str(r#"{"app-name": "Widgets", "reporters": {"json": true}, "extra": 1}"#)?;

        assert_eq!(config.app_name, "Widgets");
        assert!(!config.verbose);
        assert!(config.reporters.console);
        assert!(config.reporters.json);
        Ok(())
    }

    #[test]
    fn test_builders() {
        let config = Config::default().with_app_name("x").with_verbose(true);
        assert_eq!(config.app_name, "x");
        assert!(config.verbose);
    }
}
