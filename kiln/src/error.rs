use crate::config::ConfigLoadError;

/// Errors raised by the facade.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The engine failed to run or report.
    #[error(transparent)]
    Core(#[from] kiln_core::Error),

    /// An explicitly requested configuration file could not be loaded.
    #[error("{path}: {source}")]
    Config {
        /// The configuration file.
        path: std::path::PathBuf,
        /// What went wrong.
        #[source]
        source: ConfigLoadError,
    },

    /// Tracing was never initialized, so its filter cannot change.
    #[error("tracing not initialized")]
    TracingNotInitialized,

    /// The tracing filter could not be replaced.
    #[error("failed to reload tracing filter: {0}")]
    TracingReload(String),
}
