//! A lightweight async test framework: declare suites, run them in batches and
//! get structural diffs for failed assertions.
//!
//! The free functions in this crate drive a process-wide default [`Engine`],
//! created on first use. Hold an explicit [`Engine`] to keep registries apart.
//!
//! ```no_run
//! use kiln::assert;
//!
//! # async fn demo() -> Result<(), kiln::Error> {
//! kiln::suite("Math")
//!     .test("adds", |_| async {
//!         assert::equal(vec![1 + 1], vec![2])?;
//!         Ok(())
//!     });
//!
//! let report = kiln::run().await?;
//! kiln::report(&report)?;
//! # Ok(())
//! # }
//! ```

pub mod config;
mod error;
pub mod logging;

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub use error::Error;
pub use kiln_compare::{compare, compare_lines, deep_equal, stringify};
pub use kiln_core::{
    Config, Context, Engine, HookKind, Pattern, Report, ReportData, Reporters, Stats, Status,
    Suite, Value, ValueKind, assert, dedent, reporting::ReportFormat,
};

use crate::config::load_config;
use crate::logging::TraceEventConfig;

static ENGINE: OnceLock<Engine> = OnceLock::new();

/// Returns the process-wide default engine.
pub fn engine() -> &'static Engine {
    ENGINE.get_or_init(Engine::new)
}

/// Declares a suite on the default engine.
pub fn suite(name: impl Into<String>) -> Suite {
    engine().suite(name)
}

/// Runs the default engine's oldest pending batch.
pub async fn run() -> Result<Report, Error> {
    Ok(engine().run().await?)
}

/// Replaces the default engine's configuration.
pub fn update_config(config: Config) {
    engine().update_config(config);
}

/// Returns a copy of the default engine's configuration.
pub fn config() -> Config {
    engine().config()
}

/// Writes a report with every reporter enabled in the default engine's
/// configuration: pretty output to stderr, JSON and JUnit to stdout.
pub fn report(report: &Report) -> Result<(), Error> {
    for format in kiln_core::reporting::formats_for(&config()) {
        match format {
            ReportFormat::Pretty => {
                kiln_core::reporting::report_results(report, format, std::io::stderr())?;
            }
            _ => kiln_core::reporting::report_results(report, format, std::io::stdout())?,
        }
    }
    Ok(())
}

/// What [`init`] set up.
#[derive(Debug)]
pub struct Startup {
    /// The configuration file that was loaded, if any.
    pub config_path: Option<PathBuf>,
    /// Handle for changing the enabled trace events.
    pub tracing: TraceEventConfig,
}

/// Loads configuration, applies it to the default engine and installs the
/// tracing subscriber.
///
/// An unreadable or invalid file that was requested explicitly (by argument
/// or `KILN_CONFIG`) is an error; problems with `./kiln.toml` are logged and
/// defaults are used instead.
pub fn init(explicit_path: Option<&Path>) -> Result<Startup, Error> {
    let loaded = load_config(explicit_path);

    if loaded.explicit_path
        && let Some(source) = loaded.error
    {
        return Err(Error::Config {
            path: loaded.path.unwrap_or_default(),
            source,
        });
    }

    let tracing = TraceEventConfig::init(&loaded.settings.trace_events());

    let config_path = match (loaded.path, loaded.error) {
        (path, Some(error)) => {
            tracing::warn!(path = ?path, %error, "ignoring configuration file");
            None
        }
        (Some(path), None) if path.exists() => Some(path),
        _ => None,
    };

    update_config(loaded.settings.engine);

    Ok(Startup {
        config_path,
        tracing,
    })
}
