//! Textual renderers for the comparison strategies.
//!
//! Every rendered line starts with a two-character gutter symbol: `··` for
//! content present on both sides, `++` for content only in the expected value
//! and `--` for content only in the actual value.

use std::cmp::Ordering;
use std::fmt::Write as _;

use crate::align::{self, Run, RunKind};
use crate::stringify::stringify;
use crate::value::{Value, ValueKind};

/// Renders a sequence-against-sequence diff, one element per group of lines.
///
/// The output is bracketed by `··[` and `··]`. Every changed run is preceded by
/// a header (`Expected:` or `Actual:`). Scalar elements get a trailing comma;
/// multi-line elements get one after their last line when another element of
/// the same run follows.
pub fn sequence(actual: &[Value], expected: &[Value]) -> String {
    let mut out = String::new();
    push_line(&mut out, RunKind::Kept, "[");

    for run in align::items(actual, expected) {
        push_label(&mut out, run.kind);

        for (index, item) in run.items.iter().enumerate() {
            let structured = item.is_structured();
            let text = stringify(item);
            let item_lines: Vec<&str> = text.split('\n').collect();

            for (line_index, line) in item_lines.iter().enumerate() {
                let mut entry = format!("  {line}");
                let last_line = line_index + 1 == item_lines.len();
                if !structured || (last_line && index + 1 < run.len()) {
                    entry.push(',');
                }
                push_line(&mut out, run.kind, &entry);
            }
        }
    }

    push_line(&mut out, RunKind::Kept, "]");
    out
}

/// Renders a line-by-line diff of two texts.
///
/// # Arguments
///
/// * `actual` - The actual text.
/// * `expected` - The expected text.
/// * `first_line` - When nonzero, every line is prefixed with its zero-padded
///   line number (`L01 `), counting from this value.
pub fn lines(actual: &str, expected: &str, first_line: usize) -> String {
    let total = expected.split('\n').count();
    let width = total.saturating_sub(first_line).to_string().len();

    let mut line_number = first_line;
    let mut out = String::new();

    for run in align::lines(actual, expected) {
        push_label(&mut out, run.kind);

        for (offset, text) in run.items.iter().enumerate() {
            if line_number > 0 {
                let _ = write!(out, "L{:0width$} ", line_number + offset);
            }
            push_line(&mut out, run.kind, text);
        }

        if line_number > 0 && run.kind != RunKind::Removed {
            line_number += run.len();
        }
    }

    out
}

/// Renders a character-level diff of two single-line texts: the two texts
/// stacked and aligned, followed by a caret line marking differing positions.
pub fn chars(actual: &str, expected: &str) -> String {
    let runs = align::chars(actual, expected);

    let mut actual_text = actual.to_owned();
    let mut expected_text = expected.to_owned();
    let mut actual_len = actual.chars().count();
    let mut expected_len = expected.chars().count();

    if actual_len != expected_len {
        if let [first, second, ..] = runs.as_slice()
            && first.kind == RunKind::Removed
            && second.kind == RunKind::Added
        {
            match first.len().cmp(&second.len()) {
                Ordering::Greater => {
                    let shift = first.len() - second.len();
                    expected_text.insert_str(0, &" ".repeat(shift));
                    expected_len += shift;
                }
                Ordering::Less => {
                    let shift = second.len() - first.len();
                    actual_text.insert_str(0, &" ".repeat(shift));
                    actual_len += shift;
                }
                Ordering::Equal => {}
            }
        } else if runs.first().is_some_and(|run| run.kind == RunKind::Removed) {
            let shift = actual_len.abs_diff(expected_len);
            if actual_len < expected_len {
                actual_text.insert_str(0, &" ".repeat(shift));
                actual_len += shift;
            } else {
                expected_text.insert_str(0, &" ".repeat(shift));
                expected_len += shift;
            }
        }
    }

    let mut out = stacked(
        Side::new(&actual_text, actual_len),
        Side::new(&expected_text, expected_len),
        None,
    );

    let mut carets = String::from("  ");
    if actual_len == expected_len {
        carets.extend(
            actual_text
                .chars()
                .zip(expected_text.chars())
                .map(|(a, e)| if a == e { ' ' } else { '^' }),
        );
    } else {
        push_run_carets(&mut carets, &runs);
    }

    out.push_str(&carets);
    out
}

/// Renders two values stacked on top of each other, tagging them with their
/// kinds when those differ.
pub fn direct(actual: &Value, expected: &Value) -> String {
    let actual_text = actual.to_text();
    let expected_text = expected.to_text();

    let kinds = (actual.kind() != expected.kind()).then(|| (actual.kind(), expected.kind()));

    stacked(
        Side::new(&actual_text, actual_text.chars().count()),
        Side::new(&expected_text, expected_text.chars().count()),
        kinds,
    )
}

struct Side {
    text: String,
    len: usize,
}

impl Side {
    fn new(text: &str, len: usize) -> Self {
        Self {
            text: text.to_owned(),
            len,
        }
    }

    fn tag(&mut self, kind: ValueKind, gutter: usize, width: usize) {
        let pad = gutter + width - self.len;
        let name = kind.name();
        self.text.push_str(&" ".repeat(pad));
        self.text.push('[');
        self.text.push_str(name);
        self.text.push(']');
        self.len += pad + name.len() + 2;
    }
}

fn stacked(mut actual: Side, mut expected: Side, kinds: Option<(ValueKind, ValueKind)>) -> String {
    let mut gutter = 4;
    let mut width = actual.len.max(expected.len);

    if let Some((actual_kind, expected_kind)) = kinds {
        gutter = 2;
        actual.tag(actual_kind, gutter, width);
        expected.tag(expected_kind, gutter, width);
        width = actual.len.max(expected.len);
    }

    format!(
        "++{}{}(Expected)\n--{}{}(Actual)\n",
        expected.text,
        " ".repeat(gutter + width - expected.len),
        actual.text,
        " ".repeat(gutter + width - actual.len),
    )
}

/// Appends one caret per changed character, walking the runs. When a changed
/// run is directly followed by a change of the opposite kind, the follower's
/// width shrinks by the leader's so that substitutions are marked once.
fn push_run_carets(carets: &mut String, runs: &[Run<char>]) {
    let mut widths: Vec<usize> = runs.iter().map(Run::len).collect();

    for (index, run) in runs.iter().enumerate() {
        let mark = if run.kind.is_change() { '^' } else { ' ' };
        carets.extend(std::iter::repeat_n(mark, widths[index]));

        if let Some(next) = runs.get(index + 1)
            && run.kind.is_change()
            && next.kind.is_change()
            && next.kind != run.kind
        {
            widths[index + 1] = widths[index + 1].saturating_sub(widths[index]);
        }
    }
}

fn push_label(out: &mut String, kind: RunKind) {
    if let Some(label) = kind.label() {
        out.push_str(label);
        out.push('\n');
    }
}

fn push_line(out: &mut String, kind: RunKind, text: &str) {
    out.push_str(kind.symbol());
    out.push_str(text);
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_sequence_single_substitution() {
        let rendered = sequence(
            &[Value::from(1), Value::from(2), Value::from(3)],
            &[Value::from(1), Value::from(2), Value::from(4)],
        );

        insta::assert_snapshot!(rendered.trim_end(), @r"
        ··[
        ··  1,
        ··  2,
        Actual:
        --  3,
        Expected:
        ++  4,
        ··]
        ");
    }

    #[test]
    fn test_sequence_empty() {
        assert_eq!(sequence(&[], &[]), "··[\n··]\n");
    }

    #[test]
    fn test_sequence_objects_get_trailing_commas_between_items() {
        let a = Value::from(json!({"a": 1}));
        let b = Value::from(json!({"b": 2}));
        let rendered = sequence(&[], &[a, b]);

        assert_eq!(
            rendered,
            concat!(
                "··[\n",
                "Expected:\n",
                "++  {\n",
                "++    \"a\": 1\n",
                "++  },\n",
                "++  {\n",
                "++    \"b\": 2\n",
                "++  }\n",
                "··]\n",
            )
        );
    }

    #[test]
    fn test_lines_without_numbers() {
        let rendered = lines("a\nb\nc", "a\nB\nc", 0);
        assert_eq!(rendered, "··a\nActual:\n--b\nExpected:\n++B\n··c\n");
    }

    #[test]
    fn test_lines_with_numbers() {
        let rendered = lines("x\ny", "x\nz", 1);
        assert_eq!(
            rendered,
            "L1 ··x\nActual:\nL2 --y\nExpected:\nL2 ++z\n"
        );
    }

    #[test]
    fn test_chars_equal_length() {
        let rendered = chars("abc", "abd");
        assert_eq!(rendered, "++abd    (Expected)\n--abc    (Actual)\n    ^");
    }

    #[test]
    fn test_chars_identical() {
        let rendered = chars("same", "same");
        assert_eq!(rendered, "++same    (Expected)\n--same    (Actual)\n      ");
    }

    #[test]
    fn test_chars_substitution_pads_actual() {
        let rendered = chars("abc", "/^x/");
        assert_eq!(rendered, "++/^x/    (Expected)\n-- abc    (Actual)\n  ^^^^");
    }

    #[test]
    fn test_chars_prefix_deletion_pads_shorter_side() {
        let rendered = chars("xabc", "abc");
        assert_eq!(rendered, "++ abc    (Expected)\n--xabc    (Actual)\n  ^   ");
    }

    #[test]
    fn test_direct_with_kind_tags() {
        let rendered = direct(&Value::from(1), &Value::from("1"));
        assert_eq!(
            rendered,
            "++1  [string]  (Expected)\n--1  [number]  (Actual)\n"
        );
    }

    #[test]
    fn test_direct_same_kind() {
        let rendered = direct(&Value::Null, &Value::Null);
        assert_eq!(rendered, "++null    (Expected)\n--null    (Actual)\n");
    }
}
