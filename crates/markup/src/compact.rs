//! Size reduction for the combined manual.
//!
//! The combined file is consumed by people on GitHub and by language-model
//! tooling. Presentation-only attributes and redundant whitespace carry no
//! meaning for either and are removed.

/// Replace no-break and narrow no-break spaces with plain spaces.
pub fn replace_non_breaking_spaces(text: &str) -> String {
    text.replace(['\u{a0}', '\u{202f}'], " ")
}

/// Strip `class` attributes and empty `alt` attributes, then normalise
/// whitespace: at most one blank line in a row, single spaces, no spaces at
/// line starts or ends.
pub fn compact(text: &str) -> String {
    let text = strip_attribute(text, "class", false);
    let text = strip_attribute(&text, "alt", true);
    let text = collapse_blank_lines(&text);
    let text = collapse_spaces(&text);
    let text = drop_spaces_before_newlines(&text);
    drop_spaces_after_newlines(&text)
}

/// Remove `name="…"` along with the whitespace before it. The attribute
/// must be preceded by whitespace. With `only_empty`, only `name=""` is
/// removed.
fn strip_attribute(text: &str, name: &str, only_empty: bool) -> String {
    let needle = format!("{name}=\"");
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    let mut search = 0;

    while let Some(rel) = text[search..].find(&needle) {
        let at = search + rel;
        search = at + needle.len();

        let lead = text[..at].trim_end_matches(char::is_whitespace).len().max(cursor);
        if lead == at {
            continue;
        }
        let value_start = at + needle.len();
        let Some(close) = text[value_start..].find('"') else {
            break;
        };
        if only_empty && close != 0 {
            continue;
        }
        out.push_str(&text[cursor..lead]);
        cursor = value_start + close + 1;
        search = cursor;
    }

    out.push_str(&text[cursor..]);
    out
}

fn collapse_blank_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut newlines = 0usize;
    for c in text.chars() {
        if c == '\n' {
            newlines += 1;
            continue;
        }
        push_newlines(&mut out, newlines);
        newlines = 0;
        out.push(c);
    }
    push_newlines(&mut out, newlines);
    out
}

fn push_newlines(out: &mut String, count: usize) {
    let count = if count >= 3 { 2 } else { count };
    out.extend(std::iter::repeat('\n').take(count));
}

fn collapse_spaces(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_run = false;
    for c in text.chars() {
        if c == ' ' || c == '\t' {
            if !in_run {
                out.push(' ');
            }
            in_run = true;
        } else {
            in_run = false;
            out.push(c);
        }
    }
    out
}

fn drop_spaces_before_newlines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending = 0usize;
    for c in text.chars() {
        match c {
            ' ' => pending += 1,
            '\n' => {
                pending = 0;
                out.push('\n');
            }
            _ => {
                out.extend(std::iter::repeat(' ').take(pending));
                pending = 0;
                out.push(c);
            }
        }
    }
    out.extend(std::iter::repeat(' ').take(pending));
    out
}

fn drop_spaces_after_newlines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut after_newline = false;
    for c in text.chars() {
        if c == ' ' && after_newline {
            continue;
        }
        after_newline = c == '\n';
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_non_breaking_spaces() {
        assert_eq!(replace_non_breaking_spaces("a\u{a0}b\u{202f}c"), "a b c");
    }

    #[test]
    fn test_strips_class_and_empty_alt() {
        let text = r#"<img class="retina shadow" src="a.png" alt=""/> <img src="b.png" alt="B"/>"#;
        assert_eq!(
            compact(text),
            r#"<img src="a.png"/> <img src="b.png" alt="B"/>"#
        );
    }

    #[test]
    fn test_attribute_needs_leading_whitespace() {
        let text = r#"<div data-class="x">"#;
        assert_eq!(compact(text), text);
    }

    #[test]
    fn test_whitespace_normalised() {
        let text = "# Title  \n\n\n\n  Body\twith   gaps \n   next";
        assert_eq!(compact(text), "# Title\n\nBody with gaps\nnext");
    }

    #[test]
    fn test_leading_and_trailing_text_spaces_kept() {
        assert_eq!(compact("  a  "), " a ");
    }

    #[test]
    fn test_unterminated_class_kept() {
        let text = "<p class=\"open";
        assert_eq!(compact(text), text);
    }

    proptest! {
        #[test]
        fn prop_compact_leaves_no_redundant_spaces(text in "[a-c \t\n]{0,80}") {
            let out = compact(&text);
            prop_assert!(!out.contains('\t'));
            prop_assert!(!out.contains("  "));
            prop_assert!(!out.contains(" \n"));
            prop_assert!(!out.contains("\n "));
        }

        #[test]
        fn prop_compact_preserves_words(text in "[a-c \n]{0,80}") {
            let before: Vec<&str> = text.split_whitespace().collect();
            let out = compact(&text);
            let after: Vec<&str> = out.split_whitespace().collect();
            prop_assert_eq!(before, after);
        }
    }
}
