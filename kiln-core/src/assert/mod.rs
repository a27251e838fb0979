//! Assertion predicates.
//!
//! Every predicate returns `Ok(())` when it holds and otherwise an
//! [`AssertError`] carrying an [`Assertion`]: the message, the operator name,
//! both values and, for the equality-style predicates, a rendered diff. The
//! [`not`] module mirrors every predicate with its negation.
//!
//! Custom messages are attached with [`AssertResultExt::message`]:
//!
//! ```
//! use kiln_core::assert::{self, AssertResultExt};
//!
//! let outcome = assert::equal(1, 2).message("numbers should agree");
//! assert!(outcome.is_err());
//! ```

pub mod not;

use kiln_compare::{Pattern, Value, ValueKind, compare, compare_lines, deep_equal};
use std::any::Any;
use std::panic::AssertUnwindSafe;

use crate::util::{dedent, panic_message};

/// Result type of every assertion predicate.
pub type AssertResult = Result<(), AssertError>;

/// Name of the predicate that produced an [`Assertion`].
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::IntoStaticStr,
)]
pub enum Operator {
    /// [`ok`]
    #[strum(serialize = "ok")]
    Ok,
    /// [`is`]
    #[strum(serialize = "is")]
    Is,
    /// [`equal`]
    #[strum(serialize = "equal")]
    Equal,
    /// [`unreachable`]
    #[strum(serialize = "unreachable")]
    Unreachable,
    /// [`type_of`]
    #[strum(serialize = "type")]
    Type,
    /// [`instance`]
    #[strum(serialize = "instance")]
    Instance,
    /// [`matches`]
    #[strum(serialize = "match")]
    Match,
    /// [`snapshot`]
    #[strum(serialize = "snapshot")]
    Snapshot,
    /// [`fixture`]
    #[strum(serialize = "fixture")]
    Fixture,
    /// [`throws`]
    #[strum(serialize = "throws")]
    Throws,
    /// [`not::ok`]
    #[strum(serialize = "not")]
    Not,
    /// [`not::is`]
    #[strum(serialize = "is.not")]
    IsNot,
    /// [`not::equal`]
    #[strum(serialize = "not.equal")]
    NotEqual,
    /// [`not::type_of`]
    #[strum(serialize = "not.type")]
    NotType,
    /// [`not::instance`]
    #[strum(serialize = "not.instance")]
    NotInstance,
    /// [`not::matches`]
    #[strum(serialize = "not.match")]
    NotMatch,
    /// [`not::snapshot`]
    #[strum(serialize = "not.snapshot")]
    NotSnapshot,
    /// [`not::fixture`]
    #[strum(serialize = "not.fixture")]
    NotFixture,
    /// [`not::throws`]
    #[strum(serialize = "not.throws")]
    NotThrows,
}

impl Operator {
    /// Returns the operator's name.
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Returns whether the operator is a negated predicate.
    pub fn is_negated(self) -> bool {
        self.name().contains("not")
    }
}

/// A failed assertion.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct Assertion {
    /// The failure message.
    pub message: String,
    /// Whether `message` is the predicate's default.
    pub generated: bool,
    /// The predicate that failed.
    pub operator: Operator,
    /// The value under test.
    pub actual: Value,
    /// The value it was checked against.
    pub expected: Value,
    /// Rendered explanation of the difference, if the predicate produces one.
    pub details: Option<String>,
}

/// Error returned by assertion predicates.
#[derive(Debug, thiserror::Error)]
pub enum AssertError {
    /// The predicate did not hold.
    #[error(transparent)]
    Failed(#[from] Assertion),

    /// A caller-supplied error raised in place of the assertion.
    #[error(transparent)]
    Custom(#[from] anyhow::Error),
}

impl AssertError {
    /// Returns the assertion, if this is a predicate failure.
    pub const fn assertion(&self) -> Option<&Assertion> {
        match self {
            Self::Failed(assertion) => Some(assertion),
            Self::Custom(_) => None,
        }
    }
}

/// Message to report when an assertion fails.
#[derive(Debug)]
pub enum Message {
    /// Use the predicate's default message.
    Generated,
    /// Use the given text.
    Text(String),
    /// Raise the given error instead of the assertion.
    Error(anyhow::Error),
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Self::from(text.to_owned())
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        if text.is_empty() {
            Self::Generated
        } else {
            Self::Text(text)
        }
    }
}

impl From<anyhow::Error> for Message {
    fn from(error: anyhow::Error) -> Self {
        Self::Error(error)
    }
}

impl<T: Into<Self>> From<Option<T>> for Message {
    fn from(message: Option<T>) -> Self {
        message.map_or(Self::Generated, Into::into)
    }
}

/// Attaches custom messages to assertion outcomes.
pub trait AssertResultExt {
    /// Replaces the message of a failed assertion. An error message is raised
    /// in place of the assertion. Successful outcomes are returned unchanged.
    #[must_use]
    fn message(self, message: impl Into<Message>) -> Self;
}

impl AssertResultExt for AssertResult {
    fn message(self, message: impl Into<Message>) -> Self {
        match (self, message.into()) {
            (Err(AssertError::Failed(mut assertion)), Message::Text(text)) => {
                assertion.message = text;
                assertion.generated = false;
                Err(AssertError::Failed(assertion))
            }
            (Err(AssertError::Failed(_)), Message::Error(error)) => Err(AssertError::Custom(error)),
            (outcome, _) => outcome,
        }
    }
}

/// Renders the difference between two values.
type Detailer = fn(&Value, &Value) -> String;

pub(crate) struct Check {
    pub operator: Operator,
    pub actual: Value,
    pub expected: Value,
    pub default_message: String,
    pub detailer: Option<Detailer>,
}

impl Check {
    pub fn new(
        operator: Operator,
        actual: impl Into<Value>,
        expected: impl Into<Value>,
        default_message: impl Into<String>,
    ) -> Self {
        Self {
            operator,
            actual: actual.into(),
            expected: expected.into(),
            default_message: default_message.into(),
            detailer: None,
        }
    }

    pub const fn with_detailer(mut self, detailer: Detailer) -> Self {
        self.detailer = Some(detailer);
        self
    }

    pub fn verify(self, holds: bool) -> AssertResult {
        if holds {
            return Ok(());
        }

        let details = self
            .detailer
            .map(|detailer| detailer(&self.actual, &self.expected));

        Err(AssertError::Failed(Assertion {
            message: self.default_message,
            generated: true,
            operator: self.operator,
            actual: self.actual,
            expected: self.expected,
            details,
        }))
    }
}

fn lines_detailer(actual: &Value, expected: &Value) -> String {
    compare_lines(&actual.to_text(), &expected.to_text(), 0)
}

fn numbered_lines_detailer(actual: &Value, expected: &Value) -> String {
    compare_lines(&actual.to_text(), &expected.to_text(), 1)
}

/// What a string is matched against.
#[derive(Clone, Debug)]
pub enum Matcher {
    /// The string must contain this substring.
    Substring(String),
    /// The pattern must match somewhere in the string.
    Pattern(Pattern),
}

impl Matcher {
    pub(crate) fn is_match(&self, haystack: &str) -> bool {
        match self {
            Self::Substring(needle) => haystack.contains(needle.as_str()),
            Self::Pattern(pattern) => pattern.is_match(haystack),
        }
    }

    pub(crate) fn to_value(&self) -> Value {
        match self {
            Self::Substring(needle) => Value::from(needle.as_str()),
            Self::Pattern(pattern) => Value::Pattern(pattern.clone()),
        }
    }
}

impl From<&str> for Matcher {
    fn from(needle: &str) -> Self {
        Self::Substring(needle.to_owned())
    }
}

impl From<String> for Matcher {
    fn from(needle: String) -> Self {
        Self::Substring(needle)
    }
}

impl From<Pattern> for Matcher {
    fn from(pattern: Pattern) -> Self {
        Self::Pattern(pattern)
    }
}

impl From<regex::Regex> for Matcher {
    fn from(regex: regex::Regex) -> Self {
        Self::Pattern(Pattern::from(regex))
    }
}

/// Predicate over a raised error.
pub type ErrorPredicate = Box<dyn Fn(&anyhow::Error) -> bool>;

/// What a raised error is matched against by [`throws`] and [`not::throws`].
pub enum ErrorMatcher {
    /// Any error.
    Any,
    /// The error's message must contain this substring.
    Substring(String),
    /// The pattern must match the error's message.
    Pattern(Pattern),
    /// The predicate must accept the error.
    Predicate(ErrorPredicate),
}

impl ErrorMatcher {
    /// Creates a predicate matcher.
    pub fn predicate(predicate: impl Fn(&anyhow::Error) -> bool + 'static) -> Self {
        Self::Predicate(Box::new(predicate))
    }
}

impl std::fmt::Debug for ErrorMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Any => f.write_str("Any"),
            Self::Substring(needle) => f.debug_tuple("Substring").field(needle).finish(),
            Self::Pattern(pattern) => f.debug_tuple("Pattern").field(pattern).finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

impl From<&str> for ErrorMatcher {
    fn from(needle: &str) -> Self {
        Self::Substring(needle.to_owned())
    }
}

impl From<Pattern> for ErrorMatcher {
    fn from(pattern: Pattern) -> Self {
        Self::Pattern(pattern)
    }
}

impl From<regex::Regex> for ErrorMatcher {
    fn from(regex: regex::Regex) -> Self {
        Self::Pattern(Pattern::from(regex))
    }
}

/// Outcome of invoking a callable under [`throws`] or [`not::throws`].
pub(crate) enum Invocation {
    Returned,
    Raised(anyhow::Error),
}

/// Invokes `f`, treating both returned errors and panics as raised.
pub(crate) fn invoke<T, E, F>(f: F) -> Invocation
where
    F: FnOnce() -> Result<T, E>,
    E: Into<anyhow::Error>,
{
    match std::panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(_)) => Invocation::Returned,
        Ok(Err(error)) => Invocation::Raised(error.into()),
        Err(payload) => Invocation::Raised(anyhow::anyhow!(panic_message(payload.as_ref()))),
    }
}

/// Asserts that the value is truthy.
pub fn ok(actual: impl Into<Value>) -> AssertResult {
    let holds = actual.into().is_truthy();
    Check::new(Operator::Ok, false, true, "Expected value to be truthy").verify(holds)
}

/// Asserts that two values are strictly equal: identical primitives, or the same
/// structured node.
pub fn is(actual: impl Into<Value>, expected: impl Into<Value>) -> AssertResult {
    let (actual, expected) = (actual.into(), expected.into());
    let holds = actual.strict_eq(&expected);
    Check::new(
        Operator::Is,
        actual,
        expected,
        "Expected values to be strictly equal:",
    )
    .with_detailer(compare)
    .verify(holds)
}

/// Asserts that two values are deeply equal.
pub fn equal(actual: impl Into<Value>, expected: impl Into<Value>) -> AssertResult {
    let (actual, expected) = (actual.into(), expected.into());
    let holds = deep_equal(&actual, &expected);
    Check::new(
        Operator::Equal,
        actual,
        expected,
        "Expected values to be deeply equal:",
    )
    .with_detailer(compare)
    .verify(holds)
}

/// Always fails.
pub fn unreachable() -> AssertResult {
    Check::new(
        Operator::Unreachable,
        true,
        false,
        "Expected not to be reached!",
    )
    .verify(false)
}

/// Asserts that the value has the given kind.
pub fn type_of(actual: impl Into<Value>, expected: ValueKind) -> AssertResult {
    let kind = actual.into().kind();
    Check::new(
        Operator::Type,
        kind.name(),
        expected.name(),
        format!("Expected \"{kind}\" to be \"{expected}\""),
    )
    .verify(kind == expected)
}

/// Asserts that the value is of concrete type `T`.
///
/// Pass the value itself (or `boxed.as_ref()` for a boxed `dyn Any`); a
/// reference to the box would test the box's own type.
pub fn instance<T: Any>(actual: &dyn Any) -> AssertResult {
    let name = std::any::type_name::<T>();
    Check::new(
        Operator::Instance,
        Value::Undefined,
        name,
        format!("Expected value to be an instance of `{name}`"),
    )
    .verify(actual.is::<T>())
}

/// Asserts that the string contains the substring, or matches the pattern.
pub fn matches(actual: &str, expected: impl Into<Matcher>) -> AssertResult {
    let matcher = expected.into();
    let message = match &matcher {
        Matcher::Substring(needle) => format!("Expected value to include \"{needle}\" substring"),
        Matcher::Pattern(pattern) => format!("Expected value to match `{pattern}` pattern"),
    };

    Check::new(Operator::Match, actual, matcher.to_value(), message).verify(matcher.is_match(actual))
}

/// Asserts that two texts are equal after removing common indentation.
pub fn snapshot(actual: &str, expected: &str) -> AssertResult {
    let (actual, expected) = (dedent(actual), dedent(expected));
    let holds = actual == expected;
    Check::new(
        Operator::Snapshot,
        actual,
        expected,
        "Expected value to match snapshot:",
    )
    .with_detailer(lines_detailer)
    .verify(holds)
}

/// Like [`snapshot`], with line numbers in the rendered diff.
pub fn fixture(actual: &str, expected: &str) -> AssertResult {
    let (actual, expected) = (dedent(actual), dedent(expected));
    let holds = actual == expected;
    Check::new(
        Operator::Fixture,
        actual,
        expected,
        "Expected value to match fixture:",
    )
    .with_detailer(numbered_lines_detailer)
    .verify(holds)
}

/// Asserts that invoking `f` raises an error (or panics) accepted by the
/// matcher. A failed assertion raised by `f` is propagated unchanged.
pub fn throws<T, E, F>(f: F, expected: impl Into<ErrorMatcher>) -> AssertResult
where
    F: FnOnce() -> Result<T, E>,
    E: Into<anyhow::Error>,
{
    let matcher = expected.into();

    let raised = match invoke(f) {
        Invocation::Returned => {
            return Check::new(Operator::Throws, false, true, "Expected function to throw")
                .verify(false);
        }
        Invocation::Raised(raised) => raised,
    };

    let raised = match raised.downcast::<AssertError>() {
        Ok(error) => return Err(error),
        Err(raised) => raised,
    };
    let raised = match raised.downcast::<Assertion>() {
        Ok(assertion) => return Err(AssertError::Failed(assertion)),
        Err(raised) => raised,
    };

    let message = raised.to_string();
    let (holds, default_message) = match &matcher {
        ErrorMatcher::Any => (true, String::new()),
        ErrorMatcher::Substring(needle) => (
            message.contains(needle.as_str()),
            format!("Expected function to throw exception including \"{needle}\" substring"),
        ),
        ErrorMatcher::Pattern(pattern) => (
            pattern.is_match(&message),
            format!("Expected function to throw exception matching `{pattern}` pattern"),
        ),
        ErrorMatcher::Predicate(predicate) => (
            predicate(&raised),
            String::from("Expected function to throw matching exception"),
        ),
    };

    Check::new(Operator::Throws, false, true, default_message).verify(holds)
}
