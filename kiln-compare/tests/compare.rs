//! End-to-end tests for comparison rendering.

#![allow(clippy::panic_in_result_fn)]

use kiln_compare::{Value, compare, compare_lines};
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn equal_arrays_have_no_change_markers() {
    let value = Value::from(json!([1, "two", {"three": 3}]));
    let rendered = compare(&value, &Value::from(json!([1, "two", {"three": 3}])));

    assert!(!rendered.contains("++"));
    assert!(!rendered.contains("--"));
    assert!(!rendered.contains("Expected:"));
}

#[test]
fn array_substitution() {
    let rendered = compare(&Value::from(json!([1, 2, 3])), &Value::from(json!([1, 2, 4])));

    assert_eq!(
        rendered,
        "··[\n··  1,\n··  2,\nActual:\n--  3,\nExpected:\n++  4,\n··]\n"
    );
}

#[test]
fn object_key_order_does_not_matter() {
    let actual = Value::from(json!({"b": 2, "a": 1}));
    let expected = Value::from(json!({"a": 1, "b": 2}));
    let rendered = compare(&actual, &expected);

    assert!(!rendered.contains("Expected:"));
    assert!(rendered.starts_with("··{\n"));
}

#[test]
fn object_value_change_is_line_diffed() {
    let actual = Value::from(json!({"a": 1, "b": 2}));
    let expected = Value::from(json!({"b": 3, "a": 1}));
    let rendered = compare(&actual, &expected);

    assert_eq!(
        rendered,
        concat!(
            "··{\n",
            "Actual:\n",
            "--  \"b\": 2,\n",
            "Expected:\n",
            "++  \"b\": 3,\n",
            "··  \"a\": 1\n",
            "··}\n",
        )
    );
}

#[test]
fn string_difference_gets_carets() {
    let rendered = compare(&Value::from("foo"), &Value::from("for"));
    assert_eq!(rendered, "++for    (Expected)\n--foo    (Actual)\n    ^");
}

#[test]
fn mismatched_kinds_are_tagged() {
    let rendered = compare(&Value::from(true), &Value::Null);
    assert_eq!(
        rendered,
        "++null  [null]     (Expected)\n--true  [boolean]  (Actual)\n"
    );
}

#[test]
fn multiline_text_is_line_diffed() {
    let rendered = compare(&Value::from("one\ntwo"), &Value::from("one\nthree"));
    assert_eq!(rendered, "··one\nActual:\n--two\nExpected:\n++three\n");
}

#[test]
fn pattern_expectation_renders_source() -> anyhow::Result<()> {
    let rendered = compare(&Value::from("abc"), &Value::pattern("^x")?);
    assert_eq!(
        rendered,
        "++/^x/    (Expected)\n-- abc    (Actual)\n  ^^^^"
    );
    Ok(())
}

#[test]
fn circular_values_render() {
    let actual = Value::from(json!({"a": 1}));
    actual.insert("me", actual.clone());
    let expected = Value::from(json!({"a": 2}));

    let rendered = compare(&actual, &expected);
    assert!(rendered.contains("\"[Circular]\""));
}

#[test]
fn numbered_lines() {
    let rendered = compare_lines("a\nb", "a\nc", 1);
    assert_eq!(rendered, "L1 ··a\nActual:\nL2 --b\nExpected:\nL2 ++c\n");
}
