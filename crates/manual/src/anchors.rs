//! Internal anchor checks for the combined manual.
//!
//! Every `#fragment` link must name a heading (using GitHub's slug rules) or
//! an explicit `id` / `<a name>` anchor in the same document.

use std::collections::{BTreeSet, HashMap, HashSet};

use hypedocs_markup::tag::parse_start_tag;
use serde::Serialize;

/// A fragment link that resolves to no anchor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrokenAnchor {
    /// 1-based line number of the link.
    pub line: usize,
    pub fragment: String,
}

/// A `#fragment` link found in the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternalLink {
    pub line: usize,
    pub fragment: String,
}

/// GitHub-style slug for a heading's text.
pub fn slugify(heading: &str) -> String {
    let text = strip_inline_markup(heading);
    text.trim()
        .to_lowercase()
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('-'),
            '-' | '_' => Some(c),
            c if c.is_alphanumeric() => Some(c),
            _ => None,
        })
        .collect()
}

/// Slugs of every ATX heading outside fenced code, with duplicate headings
/// numbered `-1`, `-2`, … in document order. A numbered slug skips any slug
/// already issued, so `# A`, `# A-1`, `# A` yield `a`, `a-1`, `a-2`.
pub fn heading_slugs(markdown: &str) -> Vec<String> {
    let mut occurrences: HashMap<String, usize> = HashMap::new();
    let mut issued: HashSet<String> = HashSet::new();
    let mut slugs = Vec::new();
    for (_, line) in prose_lines(markdown) {
        let Some(text) = heading_text(line) else {
            continue;
        };
        let base = slugify(text);
        let mut slug = base.clone();
        if issued.contains(&slug) {
            let count = occurrences.entry(base.clone()).or_insert(0);
            loop {
                *count += 1;
                slug = format!("{base}-{count}");
                if !issued.contains(&slug) {
                    break;
                }
            }
        }
        issued.insert(slug.clone());
        slugs.push(slug);
    }
    slugs
}

/// `id="…"` and `<a name="…">` anchors outside fenced code.
pub fn explicit_anchors(markdown: &str) -> BTreeSet<String> {
    let mut anchors = BTreeSet::new();
    for (_, line) in prose_lines(markdown) {
        let mut search = 0;
        while let Some(rel) = line[search..].find('<') {
            let at = search + rel;
            let Some(tag) = parse_start_tag(line, at) else {
                search = at + 1;
                continue;
            };
            if let Some(id) = tag.get("id").filter(|id| !id.is_empty()) {
                anchors.insert(id.to_string());
            }
            if tag.name == "a" {
                if let Some(name) = tag.get("name").filter(|n| !n.is_empty()) {
                    anchors.insert(name.to_string());
                }
            }
            search = tag.end;
        }
    }
    anchors
}

/// Markdown `](#frag)` and HTML `href="#frag"` links outside fenced code.
pub fn internal_links(markdown: &str) -> Vec<InternalLink> {
    let mut links = Vec::new();
    for (line_no, line) in prose_lines(markdown) {
        collect_fragments(line, "](#", ')', line_no, &mut links);
        collect_fragments(line, "href=\"#", '"', line_no, &mut links);
    }
    links.sort_by_key(|link| link.line);
    links
}

/// Fragment links that match neither a heading nor an explicit anchor.
pub fn check_anchors(markdown: &str) -> Vec<BrokenAnchor> {
    let mut targets: BTreeSet<String> = heading_slugs(markdown).into_iter().collect();
    targets.extend(explicit_anchors(markdown));

    internal_links(markdown)
        .into_iter()
        .filter(|link| {
            !targets.contains(&link.fragment) && !targets.contains(&link.fragment.to_lowercase())
        })
        .map(|link| BrokenAnchor {
            line: link.line,
            fragment: link.fragment,
        })
        .collect()
}

fn collect_fragments(
    line: &str,
    opener: &str,
    closer: char,
    line_no: usize,
    out: &mut Vec<InternalLink>,
) {
    let mut search = 0;
    while let Some(rel) = line[search..].find(opener) {
        let start = search + rel + opener.len();
        let Some(len) = line[start..].find(closer) else {
            break;
        };
        let fragment = &line[start..start + len];
        if !fragment.is_empty() {
            out.push(InternalLink {
                line: line_no,
                fragment: fragment.to_string(),
            });
        }
        search = start + len;
    }
}

/// Lines outside ``` / ~~~ fenced blocks, numbered from 1.
fn prose_lines<'a>(markdown: &'a str) -> impl Iterator<Item = (usize, &'a str)> + 'a {
    let mut fence: Option<&'static str> = None;
    markdown.lines().enumerate().filter_map(move |(i, line)| {
        let trimmed = line.trim_start();
        for marker in ["```", "~~~"] {
            if trimmed.starts_with(marker) {
                match fence {
                    Some(open) if open == marker => fence = None,
                    None => fence = Some(marker),
                    Some(_) => {}
                }
                return None;
            }
        }
        if fence.is_some() {
            None
        } else {
            Some((i + 1, line))
        }
    })
}

/// Text of an ATX heading line, without the markers.
fn heading_text(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    let level = trimmed.bytes().take_while(|b| *b == b'#').count();
    if level == 0 || level > 6 {
        return None;
    }
    let rest = &trimmed[level..];
    if !rest.is_empty() && !rest.starts_with([' ', '\t']) {
        return None;
    }
    let text = rest.trim();
    let text = text.trim_end_matches('#').trim_end();
    Some(text)
}

/// Drop HTML tags and Markdown link targets, keeping the visible text.
fn strip_inline_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(i) = rest.find(['<', ']']) {
        out.push_str(&rest[..i]);
        let tail = &rest[i..];
        if tail.starts_with('<') {
            match parse_start_tag(tail, 0) {
                Some(tag) => rest = &tail[tag.end..],
                None if tail.starts_with("</") => {
                    rest = tail.find('>').map_or("", |end| &tail[end + 1..]);
                }
                None => {
                    out.push('<');
                    rest = &tail[1..];
                }
            }
        } else if tail.starts_with("](") {
            rest = tail.find(')').map_or("", |end| &tail[end + 1..]);
        } else {
            out.push(']');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Scenes & Transitions"), "scenes--transitions");
        assert_eq!(slugify("Using HYPE.documents"), "using-hypedocuments");
        assert_eq!(slugify("Physics (Beta) <span>New</span>"), "physics-beta-new");
        assert_eq!(slugify("[Export Scripts](https://tumult.com) guide"), "export-scripts-guide");
        assert_eq!(slugify("snake_case-heading"), "snake_case-heading");
    }

    #[test]
    fn test_duplicate_headings_numbered() {
        let md = "# Overview\n## Overview\n### Overview ###\nnot # heading\n#NoSpace";
        assert_eq!(
            heading_slugs(md),
            vec!["overview", "overview-1", "overview-2"]
        );
    }

    #[test]
    fn test_numbered_slug_skips_existing_heading() {
        let md = "# A\n# A-1\n# A\n[third](#a-2)";
        assert_eq!(heading_slugs(md), vec!["a", "a-1", "a-2"]);
        assert!(check_anchors(md).is_empty());
    }

    #[test]
    fn test_fenced_code_ignored() {
        let md = "# Real\n```js\n# Fake\n[x](#nowhere)\n```\n~~~\n```\n## Hidden\n~~~\n[ok](#real)";
        assert_eq!(heading_slugs(md), vec!["real"]);
        let links = internal_links(md);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].line, 10);
        assert!(check_anchors(md).is_empty());
    }

    #[test]
    fn test_explicit_anchors() {
        let md = r##"<a name="shortcuts"></a>
<div id="physics-api">x</div>
See [shortcuts](#shortcuts) and <a href="#physics-api">API</a>."##;
        assert!(check_anchors(md).is_empty());
    }

    #[test]
    fn test_broken_anchors_reported_with_lines() {
        let md = "# Timelines\n\nSee [keyframes](#keyframes).\nAlso [timelines](#Timelines) and <a href=\"#gone\">x</a>\n[top](#)";
        assert_eq!(
            check_anchors(md),
            vec![
                BrokenAnchor {
                    line: 3,
                    fragment: "keyframes".to_string()
                },
                BrokenAnchor {
                    line: 4,
                    fragment: "gone".to_string()
                },
            ]
        );
    }
}
