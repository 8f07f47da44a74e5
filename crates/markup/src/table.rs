//! HTML tables to Markdown pipe tables.
//!
//! The keyboard-shortcut and inspector reference chapters are written as HTML
//! tables. Pipe tables are smaller and render everywhere Markdown does.

use crate::tag::{decode_entities, find_end_tag, find_tags, parse_start_tag, Tag};

/// Replace every `<table>…</table>` with an equivalent pipe table.
///
/// Each table ends at the first following `</table>`. Tables that produce no
/// header row are left as they were.
pub fn convert_tables(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;

    for open in find_tags(text, "table") {
        if open.start < cursor {
            continue;
        }
        let Some((_, close_end)) = find_end_tag(text, open.end, "table") else {
            break;
        };
        let html = &text[open.start..close_end];
        out.push_str(&text[cursor..open.start]);
        match table_to_markdown(html) {
            Some(markdown) => {
                out.push('\n');
                out.push_str(&markdown);
                out.push('\n');
            }
            None => {
                tracing::debug!(offset = open.start, "table has no header row, kept as HTML");
                out.push_str(html);
            }
        }
        cursor = close_end;
    }

    out.push_str(&text[cursor..]);
    out
}

/// Convert one table fragment. `None` when no header row can be formed.
pub fn table_to_markdown(html: &str) -> Option<String> {
    let mut builder = TableBuilder::default();
    for token in tokenize(html) {
        builder.feed(token);
    }
    builder.finish()
}

#[derive(Debug)]
enum Token<'a> {
    Start(Tag),
    End(String),
    Text(&'a str),
}

fn tokenize(html: &str) -> Vec<Token<'_>> {
    let bytes = html.as_bytes();
    let mut tokens = Vec::new();
    let mut text_start = 0;
    let mut pos = 0;

    while let Some(rel) = html[pos..].find('<') {
        let at = pos + rel;
        let (token, next) = if html[at..].starts_with("<!--") {
            let close = html[at..].find("-->").map_or(html.len(), |i| at + i + 3);
            (None, close)
        } else if bytes.get(at + 1) == Some(&b'/') {
            match html[at..].find('>') {
                Some(i) => {
                    let name = html[at + 2..at + i].trim().to_ascii_lowercase();
                    (Some(Token::End(name)), at + i + 1)
                }
                None => break,
            }
        } else if let Some(tag) = parse_start_tag(html, at) {
            let end = tag.end;
            (Some(Token::Start(tag)), end)
        } else {
            pos = at + 1;
            continue;
        };

        if text_start < at {
            tokens.push(Token::Text(&html[text_start..at]));
        }
        tokens.extend(token);
        text_start = next;
        pos = next;
    }

    if text_start < html.len() {
        tokens.push(Token::Text(&html[text_start..]));
    }
    tokens
}

#[derive(Debug, Default)]
struct TableBuilder {
    in_thead: bool,
    in_tbody: bool,
    in_cell: bool,
    cell: String,
    row: Vec<String>,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TableBuilder {
    fn feed(&mut self, token: Token<'_>) {
        match token {
            Token::Start(tag) => match tag.name.as_str() {
                "thead" => self.in_thead = true,
                "tbody" => self.in_tbody = true,
                "tr" => self.row.clear(),
                "td" | "th" => {
                    self.in_cell = true;
                    self.cell.clear();
                }
                "br" if self.in_cell => self.cell.push_str("<br>"),
                "img" if self.in_cell => self.push_image(&tag),
                _ => {}
            },
            Token::End(name) => match name.as_str() {
                "thead" => self.in_thead = false,
                "tbody" => self.in_tbody = false,
                "tr" => {
                    let row = std::mem::take(&mut self.row);
                    if self.in_thead || (!self.in_tbody && self.headers.is_empty()) {
                        self.headers = row;
                    } else {
                        self.rows.push(row);
                    }
                }
                "td" | "th" if self.in_cell => {
                    self.row.push(clean_cell(&self.cell));
                    self.in_cell = false;
                }
                _ => {}
            },
            Token::Text(text) if self.in_cell => self.cell.push_str(&decode_entities(text)),
            Token::Text(_) => {}
        }
    }

    fn push_image(&mut self, tag: &Tag) {
        let src = tag
            .get("data-src-retina")
            .or_else(|| tag.get("src"))
            .or_else(|| tag.get("data-src"))
            .unwrap_or("");
        if src.is_empty() {
            return;
        }
        let alt = tag.get("alt").unwrap_or("");
        // Surrounding whitespace keeps the image apart from adjacent text.
        self.cell.push_str(&format!(" ![{alt}]({src}) "));
    }

    fn finish(mut self) -> Option<String> {
        if self.headers.is_empty() && !self.rows.is_empty() {
            self.headers = self.rows.remove(0);
        }
        if self.headers.is_empty() {
            return None;
        }

        let width = self.headers.len();
        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        lines.push(format_row(&self.headers));
        lines.push(format_row(&vec!["---".to_string(); width]));
        for mut row in self.rows {
            row.resize(width, String::new());
            lines.push(format_row(&row));
        }
        Some(lines.join("\n"))
    }
}

fn format_row(cells: &[String]) -> String {
    format!("| {} |", cells.join(" | "))
}

/// Collapse whitespace, trim, tighten `<br>` and escape pipes.
fn clean_cell(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .replace(" <br>", "<br>")
        .replace("<br> ", "<br>")
        .replace('|', "\\|")
}
