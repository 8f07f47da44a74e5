//! Rewriting of repository-relative links onto hosted URLs.
//!
//! Chapters reference downloadable sample documents under `documents/` and
//! screenshots under `images/`. The combined manual is read on GitHub and by
//! tools that fetch it standalone, so those references must be absolute.

const DOCUMENTS_DIR: &str = "documents/";
const IMAGES_DIR: &str = "images/";

/// `href="documents/…"` and `src="documents/…"` onto `base`.
pub fn absolutize_document_links(text: &str, base: &str) -> String {
    rewrite_attribute_prefixes(text, &["href", "src"], DOCUMENTS_DIR, base)
}

/// `src`, `href` and `data-src-2x` values under `images/` onto `base`.
pub fn absolutize_image_paths(text: &str, base: &str) -> String {
    rewrite_attribute_prefixes(text, &["src", "href", "data-src-2x"], IMAGES_DIR, base)
}

/// `[text](documents/…)` onto `base`. The link text must be non-empty.
pub fn absolutize_markdown_document_links(text: &str, base: &str) -> String {
    let marker = format!("]({DOCUMENTS_DIR}");
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    let mut search = 0;

    while let Some(rel) = text[search..].find(&marker) {
        let at = search + rel;
        if has_link_text_before(&text[cursor..at]) {
            out.push_str(&text[cursor..at]);
            out.push_str("](");
            out.push_str(base);
            cursor = at + marker.len();
        }
        search = at + marker.len();
    }

    out.push_str(&text[cursor..]);
    out
}

fn rewrite_attribute_prefixes(text: &str, attrs: &[&str], dir: &str, base: &str) -> String {
    attrs.iter().fold(text.to_string(), |acc, attr| {
        acc.replace(
            &format!(r#"{attr}="{dir}"#),
            &format!(r#"{attr}="{base}"#),
        )
    })
}

/// Whether `prefix` ends in `[` followed by at least one character that is
/// not `]`, i.e. the opening half of a Markdown link.
fn has_link_text_before(prefix: &str) -> bool {
    let mut text_len = 0usize;
    for b in prefix.bytes().rev() {
        match b {
            b']' => return false,
            b'[' if text_len > 0 => return true,
            _ => text_len += 1,
        }
    }
    false
}
