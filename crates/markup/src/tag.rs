//! Minimal HTML start-tag lexer.
//!
//! The chapter sources are Markdown with inline HTML fragments pasted from
//! the documentation website. Only start tags, end tags and attributes are
//! recognised; everything else is opaque text. All offsets are byte offsets
//! into the scanned string and always fall on ASCII boundaries.

/// A parsed start tag such as `<img src="a.png" alt="">`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Offset of the opening `<`.
    pub start: usize,
    /// Offset one past the closing `>`.
    pub end: usize,
    /// Lowercased tag name.
    pub name: String,
    pub attrs: Vec<Attr>,
    /// Whether the tag ends in `/>`.
    pub self_closing: bool,
}

/// A single attribute of a start tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    /// Lowercased attribute name.
    pub name: String,
    /// Raw value without quotes; `None` for bare attributes.
    pub value: Option<String>,
    /// Offset of the whitespace preceding the attribute name.
    pub lead: usize,
    /// Offset one past the attribute (including a closing quote).
    pub end: usize,
}

impl Tag {
    /// Value of the first attribute called `name`. Bare attributes yield `""`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_deref().unwrap_or(""))
    }

    pub fn has(&self, name: &str) -> bool {
        self.attrs.iter().any(|a| a.name == name)
    }
}

/// Parse a start tag beginning at `start`, which must point at `<`.
pub fn parse_start_tag(text: &str, start: usize) -> Option<Tag> {
    let bytes = text.as_bytes();
    if bytes.get(start) != Some(&b'<') {
        return None;
    }
    let mut pos = start + 1;
    if !bytes.get(pos)?.is_ascii_alphabetic() {
        return None;
    }
    while pos < bytes.len() && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'-') {
        pos += 1;
    }
    let name = text[start + 1..pos].to_ascii_lowercase();

    match bytes.get(pos) {
        Some(b) if b.is_ascii_whitespace() || *b == b'/' || *b == b'>' => {}
        _ => return None,
    }

    let mut attrs = Vec::new();
    loop {
        let lead = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        match bytes.get(pos)? {
            b'>' => {
                return Some(Tag {
                    start,
                    end: pos + 1,
                    name,
                    attrs,
                    self_closing: false,
                });
            }
            b'/' if bytes.get(pos + 1) == Some(&b'>') => {
                return Some(Tag {
                    start,
                    end: pos + 2,
                    name,
                    attrs,
                    self_closing: true,
                });
            }
            b'/' => {
                pos += 1;
                continue;
            }
            _ => {}
        }

        let name_start = pos;
        while pos < bytes.len()
            && !bytes[pos].is_ascii_whitespace()
            && !matches!(bytes[pos], b'=' | b'>' | b'/')
        {
            pos += 1;
        }
        if pos == name_start {
            pos += 1;
            continue;
        }
        let attr_name = text[name_start..pos].to_ascii_lowercase();

        let mut look = pos;
        while look < bytes.len() && bytes[look].is_ascii_whitespace() {
            look += 1;
        }
        if bytes.get(look) != Some(&b'=') {
            attrs.push(Attr {
                name: attr_name,
                value: None,
                lead,
                end: pos,
            });
            continue;
        }
        pos = look + 1;
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }

        let value = match bytes.get(pos)? {
            quote @ (b'"' | b'\'') => {
                let close = text[pos + 1..].find(*quote as char)? + pos + 1;
                let value = text[pos + 1..close].to_string();
                pos = close + 1;
                value
            }
            _ => {
                let value_start = pos;
                while pos < bytes.len() && !bytes[pos].is_ascii_whitespace() && bytes[pos] != b'>'
                {
                    pos += 1;
                }
                text[value_start..pos].to_string()
            }
        };
        attrs.push(Attr {
            name: attr_name,
            value: Some(value),
            lead,
            end: pos,
        });
    }
}

/// All start tags named `name` (ASCII case-insensitive), in source order.
pub fn find_tags(text: &str, name: &str) -> Vec<Tag> {
    let mut tags = Vec::new();
    let mut search = 0;
    while let Some(rel) = text[search..].find('<') {
        let at = search + rel;
        match parse_start_tag(text, at) {
            Some(tag) if tag.name.eq_ignore_ascii_case(name) => {
                search = tag.end;
                tags.push(tag);
            }
            _ => search = at + 1,
        }
    }
    tags
}

/// Offsets `(start, end)` of the first `</name>` at or after `from`.
pub fn find_end_tag(text: &str, from: usize, name: &str) -> Option<(usize, usize)> {
    let bytes = text.as_bytes();
    let mut search = from;
    while let Some(rel) = text.get(search..)?.find("</") {
        let at = search + rel;
        let name_start = at + 2;
        let name_end = name_start + name.len();
        if bytes.len() >= name_end && bytes[name_start..name_end].eq_ignore_ascii_case(name.as_bytes())
        {
            let mut pos = name_end;
            while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
                pos += 1;
            }
            if bytes.get(pos) == Some(&b'>') {
                return Some((at, pos + 1));
            }
        }
        search = at + 2;
    }
    None
}

/// Replace every `name` start tag for which `rewrite` returns a new string.
pub fn rewrite_tags<F>(text: &str, name: &str, mut rewrite: F) -> String
where
    F: FnMut(&Tag, &str) -> Option<String>,
{
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for tag in find_tags(text, name) {
        if let Some(replacement) = rewrite(&tag, text) {
            out.push_str(&text[cursor..tag.start]);
            out.push_str(&replacement);
            cursor = tag.end;
        }
    }
    out.push_str(&text[cursor..]);
    out
}

/// Decode the character references that appear in the manual's HTML.
/// Unknown references are kept verbatim.
pub fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let decoded = tail
            .find(';')
            .filter(|&semi| semi > 1 && semi <= 10)
            .and_then(|semi| decode_reference(&tail[1..semi]).map(|c| (c, semi)));
        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &tail[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_reference(reference: &str) -> Option<char> {
    if let Some(numeric) = reference.strip_prefix('#') {
        let hex = numeric
            .strip_prefix('x')
            .or_else(|| numeric.strip_prefix('X'));
        let code = match hex {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => numeric.parse().ok()?,
        };
        return char::from_u32(code);
    }
    match reference {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        "hellip" => Some('…'),
        "mdash" => Some('—'),
        "ndash" => Some('–'),
        "rsquo" => Some('’'),
        "lsquo" => Some('‘'),
        "rdquo" => Some('”'),
        "ldquo" => Some('“'),
        "times" => Some('×'),
        "copy" => Some('©'),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quoted_and_bare_attributes() {
        let text = r#"<img class="shot" src='a b.png' data-x=raw hidden alt="">"#;
        let tag = parse_start_tag(text, 0).unwrap();
        assert_eq!(tag.name, "img");
        assert_eq!(tag.end, text.len());
        assert_eq!(tag.get("class"), Some("shot"));
        assert_eq!(tag.get("src"), Some("a b.png"));
        assert_eq!(tag.get("data-x"), Some("raw"));
        assert_eq!(tag.get("hidden"), Some(""));
        assert_eq!(tag.get("alt"), Some(""));
        assert!(!tag.has("width"));
        assert!(!tag.self_closing);
    }

    #[test]
    fn test_self_closing_and_case() {
        let text = r#"x <IMG SRC="a.png"/> y"#;
        let tags = find_tags(text, "img");
        assert_eq!(tags.len(), 1);
        assert!(tags[0].self_closing);
        assert_eq!(tags[0].get("src"), Some("a.png"));
        assert_eq!(&text[tags[0].start..tags[0].end], r#"<IMG SRC="a.png"/>"#);
    }

    #[test]
    fn test_prefix_names_do_not_match() {
        let text = "<image src=a> <imgx> <img>";
        let tags = find_tags(text, "img");
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].start, 21);
    }

    #[test]
    fn test_unterminated_tag_is_text() {
        assert!(parse_start_tag(r#"<img src="a.png"#, 0).is_none());
        assert!(parse_start_tag("< img>", 0).is_none());
        assert!(find_tags("a < b and c > d", "b").is_empty());
    }

    #[test]
    fn test_attribute_spans_cover_leading_whitespace() {
        let text = r#"<img src="a"  height="10">"#;
        let tag = parse_start_tag(text, 0).unwrap();
        let height = &tag.attrs[1];
        assert_eq!(&text[height.lead..height.end], r#"  height="10""#);
    }

    #[test]
    fn test_find_end_tag() {
        let text = "<table><tr></tr></TABLE ><table>";
        assert_eq!(find_end_tag(text, 0, "table"), Some((16, 25)));
        assert_eq!(find_end_tag(text, 25, "table"), None);
        assert_eq!(find_end_tag(text, 0, "tr"), Some((11, 16)));
    }

    #[test]
    fn test_rewrite_tags_only_touches_selected() {
        let text = r#"<b>x</b><img src="1"><img src="2">"#;
        let out = rewrite_tags(text, "img", |tag, _| {
            (tag.get("src") == Some("2")).then(|| "[two]".to_string())
        });
        assert_eq!(out, r#"<b>x</b><img src="1">[two]"#);
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("a &amp; b &lt;c&gt;"), "a & b <c>");
        assert_eq!(decode_entities("&#8984;&#x2325;"), "⌘⌥");
        assert_eq!(decode_entities("&nbsp;"), "\u{a0}");
        assert_eq!(decode_entities("AT&T &bogus; &"), "AT&T &bogus; &");
    }
}
