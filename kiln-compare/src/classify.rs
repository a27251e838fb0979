//! Selection of the rendering strategy for a pair of values.

use crate::value::Value;

/// The rendering strategy chosen for a pair of values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Strategy {
    /// Both values are arrays; aligned item by item.
    Sequence,
    /// The expected value is a pattern; rendered character by character.
    Pattern,
    /// Both values are structured; keys are canonicalized before rendering.
    Structured,
    /// At least one textual form spans multiple lines.
    MultilineText,
    /// Everything else.
    Scalar,
}

/// Classifies a pair of values. The first matching rule wins.
pub fn classify(actual: &Value, expected: &Value) -> Strategy {
    if actual.is_sequence() && expected.is_sequence() {
        Strategy::Sequence
    } else if matches!(expected, Value::Pattern(_)) {
        Strategy::Pattern
    } else if actual.is_structured() && expected.is_structured() {
        Strategy::Structured
    } else if spans_lines(actual) || spans_lines(expected) {
        Strategy::MultilineText
    } else {
        Strategy::Scalar
    }
}

fn spans_lines(value: &Value) -> bool {
    value.textual().is_some_and(|text| text.contains('\n'))
}

#[cfg(test)]
#[allow(clippy::panic_in_result_fn)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rules_in_order() -> anyhow::Result<()> {
        let list = Value::from(json!([1]));
        let obj = Value::from(json!({"a": 1}));

        assert_eq!(classify(&list, &list), Strategy::Sequence);
        assert_eq!(classify(&list, &Value::pattern("x")?), Strategy::Pattern);
        assert_eq!(classify(&obj, &list), Strategy::Structured);
        assert_eq!(classify(&Value::from("a\nb"), &Value::from(1)), Strategy::MultilineText);
        assert_eq!(classify(&Value::from(1), &obj), Strategy::MultilineText);
        assert_eq!(classify(&Value::from("a"), &Value::from("b")), Strategy::Scalar);
        assert_eq!(classify(&Value::from(1), &Value::Null), Strategy::Scalar);
        Ok(())
    }

    #[test]
    fn test_display() {
        assert_eq!(Strategy::MultilineText.to_string(), "multiline-text");
    }
}
