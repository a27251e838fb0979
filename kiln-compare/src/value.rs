//! Dynamic values understood by the comparison engine.

use indexmap::IndexMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::stringify::stringify;

/// A reference-counted, interiorly mutable node. Structured values are stored in
/// shared nodes so that they can be aliased (and made self-referential); node
/// identity is what the cycle guard and strict equality observe.
pub struct Shared<T>(Arc<RwLock<T>>);

impl<T> Shared<T> {
    /// Wraps the given value in a new node.
    pub fn new(inner: T) -> Self {
        Self(Arc::new(RwLock::new(inner)))
    }

    /// Acquires read access to the node's contents.
    pub fn read(&self) -> RwLockReadGuard<'_, T> {
        self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Acquires write access to the node's contents.
    pub fn write(&self) -> RwLockWriteGuard<'_, T> {
        self.0.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns an address uniquely identifying this node while it is alive.
    pub fn ptr(&self) -> usize {
        Arc::as_ptr(&self.0).addr()
    }

    /// Returns whether both handles refer to the same node.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<T: Clone> Shared<T> {
    /// Returns a shallow copy of the node's contents. Traversals work on
    /// snapshots so that no lock is held while descending into children.
    pub fn snapshot(&self) -> T {
        self.read().clone()
    }
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

/// A regular expression used as an expected value.
///
/// Clones share the compiled expression, so a clone is the same pattern under
/// strict equality.
#[derive(Clone, Debug)]
pub struct Pattern(Arc<regex::Regex>);

impl Pattern {
    /// Compiles a new pattern.
    ///
    /// # Arguments
    ///
    /// * `source` - The regular expression source.
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        Ok(Self(Arc::new(regex::Regex::new(source)?)))
    }

    /// Returns whether the pattern matches anywhere in the given text.
    pub fn is_match(&self, haystack: &str) -> bool {
        self.0.is_match(haystack)
    }

    /// Returns the source of the pattern.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the underlying compiled expression.
    pub fn regex(&self) -> &regex::Regex {
        &self.0
    }

    /// Returns whether both patterns share the same compiled expression.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/", self.0.as_str())
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl From<regex::Regex> for Pattern {
    fn from(regex: regex::Regex) -> Self {
        Self(Arc::new(regex))
    }
}

/// The primitive kind of a value, used for type tags and type assertions.
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
#[strum(serialize_all = "lowercase")]
pub enum ValueKind {
    /// A missing value.
    Undefined,
    /// The explicit null value.
    Null,
    /// A boolean.
    Boolean,
    /// A number (including `NaN` and infinities).
    Number,
    /// A string.
    String,
    /// A sequence of values.
    Array,
    /// A keyed structure.
    Object,
    /// A regular expression.
    Pattern,
}

impl ValueKind {
    /// Returns the kind's name as rendered in type tags.
    pub fn name(self) -> &'static str {
        self.into()
    }
}

/// An arbitrary value that can be compared, stringified and rendered.
#[derive(Clone, Default)]
pub enum Value {
    /// A missing value.
    #[default]
    Undefined,
    /// The explicit null value.
    Null,
    /// A boolean.
    Bool(bool),
    /// A number.
    Number(f64),
    /// A string.
    String(String),
    /// An ordered sequence of values.
    Array(Shared<Vec<Value>>),
    /// An ordered, keyed structure.
    Object(Shared<IndexMap<String, Value>>),
    /// A regular expression.
    Pattern(Pattern),
}

impl Value {
    /// Creates an array value from the given items.
    pub fn array<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Self>,
    {
        Self::Array(Shared::new(items.into_iter().map(Into::into).collect()))
    }

    /// Creates an object value from the given entries, preserving their order.
    pub fn object<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Self>,
    {
        Self::Object(Shared::new(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        ))
    }

    /// Creates a pattern value.
    ///
    /// # Arguments
    ///
    /// * `source` - The regular expression source.
    pub fn pattern(source: &str) -> Result<Self, regex::Error> {
        Ok(Self::Pattern(Pattern::new(source)?))
    }

    /// Converts any serializable value.
    pub fn from_serialize<T: serde::Serialize + ?Sized>(
        value: &T,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self::from(serde_json::to_value(value)?))
    }

    /// Appends an item to an array value. Returns false if this is not an array.
    pub fn push(&self, item: impl Into<Self>) -> bool {
        if let Self::Array(items) = self {
            items.write().push(item.into());
            true
        } else {
            false
        }
    }

    /// Inserts (or replaces) an entry of an object value. Returns false if this is
    /// not an object.
    pub fn insert(&self, key: impl Into<String>, item: impl Into<Self>) -> bool {
        if let Self::Object(entries) = self {
            entries.write().insert(key.into(), item.into());
            true
        } else {
            false
        }
    }

    /// Looks up an entry of an object value.
    pub fn get(&self, key: &str) -> Option<Self> {
        match self {
            Self::Object(entries) => entries.read().get(key).cloned(),
            _ => None,
        }
    }

    /// Looks up an item of an array value.
    pub fn item(&self, index: usize) -> Option<Self> {
        match self {
            Self::Array(items) => items.read().get(index).cloned(),
            _ => None,
        }
    }

    /// Returns a snapshot of the items of an array value; empty for anything else.
    pub fn elements(&self) -> Vec<Self> {
        match self {
            Self::Array(items) => items.snapshot(),
            _ => vec![],
        }
    }

    /// Returns the primitive kind of this value.
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Undefined => ValueKind::Undefined,
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Boolean,
            Self::Number(_) => ValueKind::Number,
            Self::String(_) => ValueKind::String,
            Self::Array(_) => ValueKind::Array,
            Self::Object(_) => ValueKind::Object,
            Self::Pattern(_) => ValueKind::Pattern,
        }
    }

    /// Returns whether this is an array or an object.
    pub const fn is_structured(&self) -> bool {
        matches!(self, Self::Array(_) | Self::Object(_))
    }

    /// Returns whether this is an array.
    pub const fn is_sequence(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    /// Returns the string contents of a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Returns the node identity of a structured value.
    pub fn identity(&self) -> Option<usize> {
        match self {
            Self::Array(items) => Some(items.ptr()),
            Self::Object(entries) => Some(entries.ptr()),
            _ => None,
        }
    }

    /// Returns whether the value is truthy: everything except `false`, `0`, `NaN`,
    /// the empty string, `null` and `undefined`.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Undefined | Self::Null => false,
            Self::Bool(b) => *b,
            Self::Number(n) => !n.is_nan() && *n != 0.0,
            Self::String(s) => !s.is_empty(),
            Self::Array(_) | Self::Object(_) | Self::Pattern(_) => true,
        }
    }

    /// Strict equality: primitives compare by value (`NaN` never equals itself),
    /// structured values and patterns compare by identity.
    #[allow(clippy::float_cmp)]
    pub fn strict_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a.ptr_eq(b),
            (Self::Object(a), Self::Object(b)) => a.ptr_eq(b),
            (Self::Pattern(a), Self::Pattern(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// Returns the textual form used when the value is displayed on its own:
    /// strings are raw, structured values are canonically stringified.
    pub fn to_text(&self) -> String {
        match self {
            Self::Undefined => String::from("undefined"),
            Self::Null => String::from("null"),
            Self::Bool(b) => b.to_string(),
            Self::Number(n) => format_number(*n),
            Self::String(s) => s.clone(),
            Self::Array(_) | Self::Object(_) => stringify(self),
            Self::Pattern(p) => p.to_string(),
        }
    }

    /// Returns the text of string and structured values, the only values that
    /// take part in character and line alignment.
    pub fn textual(&self) -> Option<String> {
        match self {
            Self::String(s) => Some(s.clone()),
            Self::Array(_) | Self::Object(_) => Some(stringify(self)),
            _ => None,
        }
    }
}

/// Formats a number the way it is displayed in rendered diffs.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        String::from("NaN")
    } else if n.is_infinite() {
        if n > 0.0 {
            String::from("Infinity")
        } else {
            String::from("-Infinity")
        }
    } else {
        n.to_string()
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        crate::equality::deep_equal(self, other)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&stringify(self))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

macro_rules! value_from_lossless_number {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Self::Number(f64::from(n))
                }
            }
        )*
    };
}

macro_rules! value_from_wide_number {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                #[allow(clippy::cast_precision_loss)]
                fn from(n: $t) -> Self {
                    Self::Number(n as f64)
                }
            }
        )*
    };
}

value_from_lossless_number!(i8, i16, i32, u8, u16, u32, f32, f64);
value_from_wide_number!(i64, u64, isize, usize);

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Self::String(s.clone())
    }
}

impl From<()> for Value {
    fn from((): ()) -> Self {
        Self::Undefined
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Undefined, Into::into)
    }
}

impl<T: Into<Self>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::array(items)
    }
}

impl From<Pattern> for Value {
    fn from(pattern: Pattern) -> Self {
        Self::Pattern(pattern)
    }
}

impl From<regex::Regex> for Value {
    fn from(regex: regex::Regex) -> Self {
        Self::Pattern(Pattern::from(regex))
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => Self::array(items),
            serde_json::Value::Object(entries) => Self::object(entries),
        }
    }
}
