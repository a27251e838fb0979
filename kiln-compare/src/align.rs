//! Grouping of sequence alignments into runs.

use crate::value::Value;

/// How a run of aligned items relates the actual side to the expected side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunKind {
    /// Present on both sides.
    Kept,
    /// Present only in the expected side.
    Added,
    /// Present only in the actual side.
    Removed,
}

impl RunKind {
    /// Returns whether the run represents a difference.
    pub const fn is_change(self) -> bool {
        !matches!(self, Self::Kept)
    }

    /// Returns the two-character gutter symbol for lines of this kind.
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Kept => "··",
            Self::Added => "++",
            Self::Removed => "--",
        }
    }

    /// Returns the header line printed before a run of this kind, if any.
    pub const fn label(self) -> Option<&'static str> {
        match self {
            Self::Kept => None,
            Self::Added => Some("Expected:"),
            Self::Removed => Some("Actual:"),
        }
    }
}

/// A maximal group of consecutive items sharing a [`RunKind`].
#[derive(Clone, Debug, PartialEq)]
pub struct Run<T> {
    /// The relation of the items to both sides.
    pub kind: RunKind,
    /// The items, in order.
    pub items: Vec<T>,
}

impl<T> Run<T> {
    /// Returns the number of items in the run.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns whether the run has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Aligns two texts line by line.
pub fn lines<'a>(actual: &'a str, expected: &'a str) -> Vec<Run<&'a str>> {
    group(diff::lines(actual, expected))
}

/// Aligns two texts character by character.
pub fn chars(actual: &str, expected: &str) -> Vec<Run<char>> {
    group(diff::chars(actual, expected))
}

/// Aligns two sequences of values, using deep equality for matching.
pub fn items<'a>(actual: &'a [Value], expected: &'a [Value]) -> Vec<Run<&'a Value>> {
    group(diff::slice(actual, expected))
}

/// Folds raw diff results into runs. Within each contiguous block of changes the
/// removed run is emitted before the added run.
fn group<T>(results: Vec<diff::Result<T>>) -> Vec<Run<T>> {
    let mut runs = vec![];
    let mut kept = vec![];
    let mut removed = vec![];
    let mut added = vec![];

    for result in results {
        match result {
            diff::Result::Both(item, _) => {
                flush(&mut runs, RunKind::Removed, &mut removed);
                flush(&mut runs, RunKind::Added, &mut added);
                kept.push(item);
            }
            diff::Result::Left(item) => {
                flush(&mut runs, RunKind::Kept, &mut kept);
                removed.push(item);
            }
            diff::Result::Right(item) => {
                flush(&mut runs, RunKind::Kept, &mut kept);
                added.push(item);
            }
        }
    }

    flush(&mut runs, RunKind::Kept, &mut kept);
    flush(&mut runs, RunKind::Removed, &mut removed);
    flush(&mut runs, RunKind::Added, &mut added);

    runs
}

fn flush<T>(runs: &mut Vec<Run<T>>, kind: RunKind, items: &mut Vec<T>) {
    if !items.is_empty() {
        runs.push(Run {
            kind,
            items: std::mem::take(items),
        });
    }
}
