//! Structural comparison of values and human-readable diff rendering.
//!
//! The entry point is [`compare`], which classifies a pair of values and renders
//! the difference between them as plain text.

mod align;
mod canonical;
mod classify;
mod equality;
mod render;
mod stringify;
mod value;

pub use align::{Run, RunKind};
pub use canonical::mirror_key_order;
pub use classify::{Strategy, classify};
pub use equality::deep_equal;
pub use stringify::{CIRCULAR, stringify};
pub use value::{Pattern, Shared, Value, ValueKind, format_number};

/// Renderers for individual strategies, for callers that want to pick one
/// directly.
pub mod renderers {
    pub use crate::render::{chars, direct, lines, sequence};
}

/// Tracing target used for comparison events.
pub const TRACE_TARGET: &str = "compare";

/// Renders the difference between an actual and an expected value.
///
/// # Arguments
///
/// * `actual` - The value that was produced.
/// * `expected` - The value that was expected.
pub fn compare(actual: &Value, expected: &Value) -> String {
    let strategy = classify(actual, expected);
    tracing::debug!(target: TRACE_TARGET, %strategy, "rendering comparison");

    match strategy {
        Strategy::Sequence => render::sequence(&actual.elements(), &expected.elements()),
        Strategy::Pattern => render::chars(&actual.to_text(), &expected.to_text()),
        Strategy::Structured => {
            let actual_text = stringify(&mirror_key_order(actual, expected));
            let expected_text = stringify(expected);

            if actual_text.contains('\n') || expected_text.contains('\n') {
                render::lines(&actual_text, &expected_text, 0)
            } else {
                render::chars(&actual_text, &expected_text)
            }
        }
        Strategy::MultilineText => render::lines(&actual.to_text(), &expected.to_text(), 0),
        Strategy::Scalar => match (actual.textual(), expected.textual()) {
            (Some(actual_text), Some(expected_text)) => {
                render::chars(&actual_text, &expected_text)
            }
            _ => render::direct(actual, expected),
        },
    }
}

/// Renders a line-by-line diff of two texts, optionally numbering the lines
/// starting from `first_line` (zero disables numbering).
pub fn compare_lines(actual: &str, expected: &str, first_line: usize) -> String {
    render::lines(actual, expected, first_line)
}
