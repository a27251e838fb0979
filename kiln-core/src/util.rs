//! Text utilities.

use std::any::Any;

/// Removes the common leading indentation from every line of the given text.
///
/// Line endings are normalized to `\n`. The indentation width is the smallest
/// run of leading spaces and tabs among lines that contain non-whitespace
/// content; lines shorter than that width are left untouched.
pub fn dedent(text: &str) -> String {
    let text = text.replace("\r\n", "\n");

    let width = text
        .split('\n')
        .filter_map(|line| {
            let rest = line.trim_start_matches([' ', '\t']);
            rest.chars()
                .next()
                .filter(|c| !c.is_whitespace())
                .map(|_| line.len() - rest.len())
        })
        .min();

    match width {
        Some(width) if width > 0 => text
            .split('\n')
            .map(|line| {
                let leading = line.len() - line.trim_start_matches([' ', '\t']).len();
                if leading >= width {
                    line.get(width..).unwrap_or(line)
                } else {
                    line
                }
            })
            .collect::<Vec<_>>()
            .join("\n"),
        _ => text,
    }
}

/// Extracts a readable message from a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        String::from("unknown panic payload")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_dedent() {
        assert_eq!(dedent("    a\n      b\n    c"), "a\n  b\nc");
        assert_eq!(dedent("\n\tx\n\ty\n"), "\nx\ny\n");
        assert_eq!(dedent("a\n  b"), "a\n  b");
        assert_eq!(dedent("  a\r\n  b"), "a\nb");
        assert_eq!(dedent(""), "");
    }

    #[test]
    fn test_dedent_ignores_blank_lines_for_width() {
        assert_eq!(dedent("    a\n\n    b"), "a\n\nb");
        assert_eq!(dedent("    a\n  \n    b"), "a\n  \nb");
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");

        let payload: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "bang");

        let payload: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(payload.as_ref()), "unknown panic payload");
    }
}
