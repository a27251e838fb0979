//! Configuration file support.
//!
//! Settings are read from TOML:
//! - Forward-compatible: unknown fields are ignored
//! - Graceful degradation: a broken default file falls back to defaults
//! - Located by explicit path, then `KILN_CONFIG`, then `./kiln.toml`
//!
//! ```toml
//! app-name = "Widgets"
//! verbose = true
//! trace = ["engine", "hooks"]
//!
//! [reporters]
//! console = true
//! junit = true
//! ```

use std::path::{Path, PathBuf};

use kiln_core::Config;

use crate::logging::TraceEvent;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV_VAR: &str = "KILN_CONFIG";

/// Name of the configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "kiln.toml";

/// Root configuration structure.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Engine configuration.
    #[serde(flatten)]
    pub engine: Config,

    /// Trace events to enable.
    pub trace: Vec<TraceEvent>,
}

impl Settings {
    /// Returns the trace events to enable; `debug` enables all of them.
    pub fn trace_events(&self) -> Vec<TraceEvent> {
        if self.engine.debug {
            TraceEvent::all().collect()
        } else {
            self.trace.clone()
        }
    }
}

/// Result of attempting to load a configuration file.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded settings, or defaults if loading failed.
    pub settings: Settings,

    /// The path that was used (or attempted) for loading.
    pub path: Option<PathBuf>,

    /// Any error that occurred during loading.
    pub error: Option<ConfigLoadError>,

    /// Whether the path was requested explicitly (by argument or environment).
    /// An error for an explicit path should be treated as fatal.
    pub explicit_path: bool,
}

impl ConfigLoadResult {
    fn defaults(path: Option<PathBuf>) -> Self {
        Self {
            settings: Settings::default(),
            path,
            error: None,
            explicit_path: false,
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigLoadError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse the TOML content.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Returns the path of the configuration file in the working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_FILE)
}

/// Parses settings from TOML text.
pub fn parse(content: &str) -> Result<Settings, ConfigLoadError> {
    Ok(toml::from_str(content)?)
}

/// Loads settings from the specified path.
pub fn load_from_path(path: &Path) -> ConfigLoadResult {
    let result = std::fs::read_to_string(path)
        .map_err(ConfigLoadError::from)
        .and_then(|content| parse(&content));

    match result {
        Ok(settings) => ConfigLoadResult {
            settings,
            path: Some(path.to_path_buf()),
            error: None,
            explicit_path: false,
        },
        Err(error) => ConfigLoadResult {
            settings: Settings::default(),
            path: Some(path.to_path_buf()),
            error: Some(error),
            explicit_path: false,
        },
    }
}

/// Loads settings from an explicit path, the file named by `KILN_CONFIG`, or
/// `./kiln.toml`, in that order.
///
/// # Arguments
///
/// * `explicit_path` - If provided, use this path instead of searching.
///
/// # Returns
///
/// A `ConfigLoadResult` containing the settings and any error encountered. A
/// missing default file is not an error.
pub fn load_config(explicit_path: Option<&Path>) -> ConfigLoadResult {
    let requested = explicit_path
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from));

    let Some(path) = requested else {
        let path = default_config_path();
        if !path.exists() {
            return ConfigLoadResult::defaults(Some(path));
        }
        return load_from_path(&path);
    };

    let mut result = load_from_path(&path);
    result.explicit_path = true;
    result
}

#[cfg(test)]
#[allow(clippy::panic_in_result_fn)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_config() -> Result<(), ConfigLoadError> {
        let settings = parse("")?;
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.engine.app_name, "Test Project");
        assert!(settings.engine.reporters.console);
        Ok(())
    }

    #[test]
    fn test_full_config() -> Result<(), ConfigLoadError> {
        let settings = parse(
            r#"
            app-name = "Widgets"
            verbose = true
            trace = ["engine", "hooks"]

            [reporters]
            console = false
            json = true
        "#,
        )?;

        assert_eq!(settings.engine.app_name, "Widgets");
        assert!(settings.engine.verbose);
        assert!(!settings.engine.reporters.console);
        assert!(settings.engine.reporters.json);
        assert!(!settings.engine.reporters.junit);
        assert_eq!(settings.trace, vec![TraceEvent::Engine, TraceEvent::Hooks]);
        Ok(())
    }

    #[test]
    fn test_unknown_fields_ignored() -> Result<(), ConfigLoadError> {
        let settings = parse(
            r#"
            verbose = true
            future-feature = 42

            [reporters]
            junit = true
            html = true

            [unknown-section]
            foo = "bar"
        "#,
        )?;

        assert!(settings.engine.verbose);
        assert!(settings.engine.reporters.junit);
        Ok(())
    }

    #[test]
    fn test_debug_enables_all_events() -> Result<(), ConfigLoadError> {
        let settings = parse("debug = true")?;
        assert_eq!(settings.trace_events().len(), 4);
        assert!(parse("").map(|s| s.trace_events().is_empty())?);
        Ok(())
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        assert!(matches!(parse("verbose = ["), Err(ConfigLoadError::Parse(_))));
        assert!(matches!(
            parse("verbose = \"loud\""),
            Err(ConfigLoadError::Parse(_))
        ));
    }

    #[test]
    fn test_load_nonexistent_explicit() {
        let result = load_config(Some(Path::new("/nonexistent/path/to/kiln.toml")));
        assert!(result.explicit_path);
        assert!(matches!(result.error, Some(ConfigLoadError::Io(_))));
        assert_eq!(result.settings, Settings::default());
    }
}
