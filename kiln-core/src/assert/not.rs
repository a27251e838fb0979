//! Negated assertion predicates.

use kiln_compare::{Value, ValueKind, deep_equal};
use std::any::Any;

use super::{AssertResult, Check, ErrorMatcher, Invocation, Matcher, Operator, invoke};
use crate::util::dedent;

/// Asserts that the value is falsy.
pub fn ok(actual: impl Into<Value>) -> AssertResult {
    let holds = !actual.into().is_truthy();
    Check::new(Operator::Not, true, false, "Expected value to be falsey").verify(holds)
}

/// Asserts that two values are not strictly equal.
pub fn is(actual: impl Into<Value>, expected: impl Into<Value>) -> AssertResult {
    let (actual, expected) = (actual.into(), expected.into());
    let holds = !actual.strict_eq(&expected);
    Check::new(
        Operator::IsNot,
        actual,
        expected,
        "Expected values not to be strictly equal",
    )
    .verify(holds)
}

/// Asserts that two values are not deeply equal.
pub fn equal(actual: impl Into<Value>, expected: impl Into<Value>) -> AssertResult {
    let (actual, expected) = (actual.into(), expected.into());
    let holds = !deep_equal(&actual, &expected);
    Check::new(
        Operator::NotEqual,
        actual,
        expected,
        "Expected values not to be deeply equal",
    )
    .verify(holds)
}

/// Asserts that the value does not have the given kind.
pub fn type_of(actual: impl Into<Value>, expected: ValueKind) -> AssertResult {
    let kind = actual.into().kind();
    Check::new(
        Operator::NotType,
        kind.name(),
        expected.name(),
        format!("Expected \"{kind}\" not to be \"{expected}\""),
    )
    .verify(kind != expected)
}

/// Asserts that the value is not of concrete type `T`.
pub fn instance<T: Any>(actual: &dyn Any) -> AssertResult {
    let name = std::any::type_name::<T>();
    Check::new(
        Operator::NotInstance,
        Value::Undefined,
        name,
        format!("Expected value not to be an instance of `{name}`"),
    )
    .verify(!actual.is::<T>())
}

/// Asserts that the string neither contains the substring nor matches the
/// pattern.
pub fn matches(actual: &str, expected: impl Into<Matcher>) -> AssertResult {
    let matcher = expected.into();
    let message = match &matcher {
        Matcher::Substring(needle) => {
            format!("Expected value not to include \"{needle}\" substring")
        }
        Matcher::Pattern(pattern) => format!("Expected value not to match `{pattern}` pattern"),
    };

    Check::new(Operator::NotMatch, actual, matcher.to_value(), message)
        .verify(!matcher.is_match(actual))
}

/// Asserts that two texts differ after removing common indentation.
pub fn snapshot(actual: &str, expected: &str) -> AssertResult {
    let (actual, expected) = (dedent(actual), dedent(expected));
    let holds = actual != expected;
    Check::new(
        Operator::NotSnapshot,
        actual,
        expected,
        "Expected value not to match snapshot",
    )
    .verify(holds)
}

/// Asserts that two texts differ after removing common indentation.
pub fn fixture(actual: &str, expected: &str) -> AssertResult {
    let (actual, expected) = (dedent(actual), dedent(expected));
    let holds = actual != expected;
    Check::new(
        Operator::NotFixture,
        actual,
        expected,
        "Expected value not to match fixture",
    )
    .verify(holds)
}

/// Asserts that invoking `f` does not raise an error accepted by the matcher.
///
/// With [`ErrorMatcher::Any`], any raised error fails the assertion. Errors
/// the matcher rejects are swallowed.
pub fn throws<T, E, F>(f: F, expected: impl Into<ErrorMatcher>) -> AssertResult
where
    F: FnOnce() -> Result<T, E>,
    E: Into<anyhow::Error>,
{
    let matcher = expected.into();

    let Invocation::Raised(raised) = invoke(f) else {
        return Ok(());
    };

    let message = raised.to_string();
    let (holds, default_message) = match &matcher {
        ErrorMatcher::Any => (false, String::from("Expected function not to throw")),
        ErrorMatcher::Substring(needle) => (
            !message.contains(needle.as_str()),
            format!("Expected function not to throw exception including \"{needle}\" substring"),
        ),
        ErrorMatcher::Pattern(pattern) => (
            !pattern.is_match(&message),
            format!("Expected function not to throw exception matching `{pattern}` pattern"),
        ),
        ErrorMatcher::Predicate(predicate) => (
            !predicate(&raised),
            String::from("Expected function not to throw matching exception"),
        ),
    };

    Check::new(Operator::NotThrows, true, false, default_message).verify(holds)
}
