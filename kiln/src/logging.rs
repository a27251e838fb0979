//! Tracing subscriber setup.

use std::collections::HashSet;

use kiln_core::trace_categories;
use tracing_subscriber::{
    Layer, Registry, filter::Targets, layer::SubscriberExt, reload::Handle,
    util::SubscriberInitExt,
};

use crate::error::Error;

/// Type of event to trace.
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    Hash,
    PartialEq,
    serde::Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TraceEvent {
    /// Traces batch execution.
    Engine,
    /// Traces suite, test and hook registration.
    Registration,
    /// Traces lifecycle hook invocation.
    Hooks,
    /// Traces value comparison.
    Compare,
}

impl TraceEvent {
    /// Returns the tracing target the event enables.
    pub const fn target(self) -> &'static str {
        match self {
            Self::Engine => trace_categories::ENGINE,
            Self::Registration => trace_categories::REGISTRATION,
            Self::Hooks => trace_categories::HOOKS,
            Self::Compare => trace_categories::COMPARE,
        }
    }

    /// Returns every event.
    pub fn all() -> impl Iterator<Item = Self> {
        <Self as strum::IntoEnumIterator>::iter()
    }
}

/// The set of enabled trace events, and the handle used to apply changes to it.
#[derive(Default)]
pub struct TraceEventConfig {
    enabled_trace_events: HashSet<TraceEvent>,
    handle: Option<Handle<Targets, Registry>>,
}

impl TraceEventConfig {
    /// Installs a stderr subscriber enabling debug output for the given events.
    ///
    /// If a global subscriber is already installed, a warning is printed and
    /// the returned configuration cannot be changed later.
    pub fn init(enabled_trace_events: &[TraceEvent]) -> Self {
        let mut config = Self {
            enabled_trace_events: enabled_trace_events.iter().copied().collect(),
            ..Default::default()
        };

        let (reload_filter, handle) = tracing_subscriber::reload::Layer::new(config.compose_filter());

        let layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .without_time()
            .with_target(true)
            .with_filter(reload_filter);

        if tracing_subscriber::registry().with(layer).try_init().is_ok() {
            config.handle = Some(handle);
        } else {
            eprintln!("warning: failed to initialize tracing.");
        }

        config
    }

    fn compose_filter(&self) -> Targets {
        let filter = Targets::new().with_default(tracing_subscriber::filter::LevelFilter::INFO);

        filter.with_targets(
            self.enabled_trace_events
                .iter()
                .map(|event| (event.target(), tracing::Level::DEBUG)),
        )
    }

    /// Returns the enabled events.
    pub const fn enabled_events(&self) -> &HashSet<TraceEvent> {
        &self.enabled_trace_events
    }

    /// Returns whether the subscriber was installed by this configuration.
    pub const fn is_initialized(&self) -> bool {
        self.handle.is_some()
    }

    /// Enables debug output for an event.
    pub fn enable(&mut self, event: TraceEvent) -> Result<(), Error> {
        if !self.enabled_trace_events.insert(event) {
            return Ok(());
        }

        self.reload_filter()
    }

    /// Disables debug output for an event.
    pub fn disable(&mut self, event: TraceEvent) -> Result<(), Error> {
        if !self.enabled_trace_events.remove(&event) {
            return Ok(());
        }

        self.reload_filter()
    }

    fn reload_filter(&self) -> Result<(), Error> {
        let handle = self.handle.as_ref().ok_or(Error::TracingNotInitialized)?;
        handle
            .reload(self.compose_filter())
            .map_err(|e| Error::TracingReload(e.to_string()))
    }
}

impl std::fmt::Debug for TraceEventConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TraceEventConfig")
            .field("enabled_trace_events", &self.enabled_trace_events)
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::panic_in_result_fn)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    #[test]
    fn test_event_names_and_targets() -> Result<(), strum::ParseError> {
        assert_eq!(TraceEvent::Hooks.to_string(), "hooks");
        assert_eq!(TraceEvent::from_str("compare")?, TraceEvent::Compare);
        assert_eq!(TraceEvent::Compare.target(), "compare");
        assert_eq!(TraceEvent::Registration.target(), "registration");
        assert_eq!(TraceEvent::all().count(), 4);
        Ok(())
    }

    #[test]
    fn test_uninitialized_config_cannot_reload() {
        let mut config = TraceEventConfig::default();
        assert!(matches!(
            config.enable(TraceEvent::Engine),
            Err(Error::TracingNotInitialized)
        ));
        assert!(config.enabled_events().contains(&TraceEvent::Engine));

        // Enabling again is a no-op.
        assert!(config.enable(TraceEvent::Engine).is_ok());
        assert!(config.disable(TraceEvent::Hooks).is_ok());
    }
}
