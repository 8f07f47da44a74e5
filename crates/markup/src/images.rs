//! `<img>` normalisation.
//!
//! The website lazy-loads screenshots through `data-src` / `data-src-retina`
//! and leaves `src` as a placeholder. Markdown renderers need the real
//! source in `src`, and a fixed `height` distorts images on narrow layouts.

use crate::tag::{rewrite_tags, Tag};

/// Rebuild every `<img>` carrying `data-src-retina` with that value as `src`.
pub fn promote_retina_sources(text: &str) -> String {
    rewrite_tags(text, "img", |tag, _| {
        tag.get("data-src-retina")
            .filter(|src| !src.is_empty())
            .map(|src| rebuild_image(tag, src))
    })
}

/// Rebuild every `<img>` carrying `data-src` (and no `data-src-retina`)
/// with that value as `src`.
pub fn promote_lazy_sources(text: &str) -> String {
    rewrite_tags(text, "img", |tag, _| {
        if tag.has("data-src-retina") {
            return None;
        }
        tag.get("data-src")
            .filter(|src| !src.is_empty())
            .map(|src| rebuild_image(tag, src))
    })
}

/// Remove every `height` attribute from `<img>` tags.
pub fn strip_image_heights(text: &str) -> String {
    rewrite_tags(text, "img", |tag, text| {
        if !tag.has("height") {
            return None;
        }
        let mut rebuilt = String::with_capacity(tag.end - tag.start);
        let mut cursor = tag.start;
        for attr in tag.attrs.iter().filter(|a| a.name == "height") {
            rebuilt.push_str(&text[cursor..attr.lead]);
            cursor = attr.end;
        }
        rebuilt.push_str(&text[cursor..tag.end]);
        Some(rebuilt)
    })
}

/// `<img class=.. src=.. width=.. height=.. alt=../>`, keeping only those
/// attributes. Non-numeric dimensions are dropped; `alt` is always present.
fn rebuild_image(tag: &Tag, src: &str) -> String {
    let mut attrs = Vec::with_capacity(5);
    if let Some(class) = tag.get("class") {
        attrs.push(format!(r#"class="{}""#, quote_safe(class)));
    }
    attrs.push(format!(r#"src="{}""#, quote_safe(src)));
    for dimension in ["width", "height"] {
        if let Some(value) = tag.get(dimension).filter(|v| is_pixel_count(v)) {
            attrs.push(format!(r#"{dimension}="{value}""#));
        }
    }
    attrs.push(format!(r#"alt="{}""#, quote_safe(tag.get("alt").unwrap_or(""))));
    format!("<img {}/>", attrs.join(" "))
}

fn is_pixel_count(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

// Values lifted from single-quoted attributes may contain `"`.
fn quote_safe(value: &str) -> String {
    value.replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retina_source_promoted() {
        let text = r#"<img class="shadow" src="images/blank.gif" data-src="images/a.png" data-src-retina="images/a@2x.png" width="400" height="300" alt="Scene editor">"#;
        assert_eq!(
            promote_retina_sources(text),
            r#"<img class="shadow" src="images/a@2x.png" width="400" height="300" alt="Scene editor"/>"#
        );
    }

    #[test]
    fn test_retina_rebuild_drops_bad_dimensions_and_adds_alt() {
        let text = r#"<img data-src-retina="x@2x.png" width="50%" style="float:left">"#;
        assert_eq!(
            promote_retina_sources(text),
            r#"<img src="x@2x.png" alt=""/>"#
        );
    }

    #[test]
    fn test_lazy_source_promoted_only_without_retina() {
        let lazy = r#"<img data-src="images/b.png" height="20">"#;
        assert_eq!(
            promote_lazy_sources(lazy),
            r#"<img src="images/b.png" height="20" alt=""/>"#
        );

        let both = r#"<img data-src="b.png" data-src-retina="b@2x.png">"#;
        assert_eq!(promote_lazy_sources(both), both);
    }

    #[test]
    fn test_plain_images_untouched() {
        let text = r#"<img src="c.png" alt="C">"#;
        assert_eq!(promote_retina_sources(text), text);
        assert_eq!(promote_lazy_sources(text), text);
    }

    #[test]
    fn test_strip_heights() {
        let text = r#"<img src="a.png" width="10" height="20" alt="A"/> <div height="5"></div>"#;
        assert_eq!(
            strip_image_heights(text),
            r#"<img src="a.png" width="10" alt="A"/> <div height="5"></div>"#
        );
    }

    #[test]
    fn test_strip_heights_keeps_data_height() {
        let text = r#"<img data-height="4" src="a.png">"#;
        assert_eq!(strip_image_heights(text), text);
    }
}
