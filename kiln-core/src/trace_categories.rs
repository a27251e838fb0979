//! Trace utilities

/// Trace category for batch execution.
pub const ENGINE: &str = "engine";
/// Trace category for suite, test and hook registration.
pub const REGISTRATION: &str = "registration";
/// Trace category for lifecycle hook invocation.
pub const HOOKS: &str = "hooks";
/// Trace category for value comparison.
pub const COMPARE: &str = kiln_compare::TRACE_TARGET;
