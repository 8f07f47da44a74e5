//! Lazy YouTube embeds.
//!
//! The website renders `<div class="js-lazyYT" data-youtube-id="…">Loading...</div>`
//! placeholders through a script. Markdown viewers have no such script, so the
//! placeholder becomes a thumbnail image linking to the video.

use crate::tag::find_tags;

const EMBED_CLASS: &str = "js-lazyYT";
const PLACEHOLDER_BODY: &str = "Loading...</div>";

/// Markdown thumbnail link for a video id.
pub fn thumbnail_link(video_id: &str) -> String {
    format!(
        "[![YouTube Video Thumbnail](https://img.youtube.com/vi/{video_id}/0.jpg)](https://www.youtube.com/watch?v={video_id})"
    )
}

/// Replace every lazy YouTube placeholder with a thumbnail link.
pub fn expand_youtube_embeds(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    let mut expanded = 0usize;

    for tag in find_tags(text, "div") {
        if tag.start < cursor || tag.get("class") != Some(EMBED_CLASS) {
            continue;
        }
        let Some(video_id) = tag.get("data-youtube-id").filter(|id| !id.is_empty()) else {
            continue;
        };
        if !text[tag.end..].starts_with(PLACEHOLDER_BODY) {
            continue;
        }
        out.push_str(&text[cursor..tag.start]);
        out.push_str(&thumbnail_link(video_id));
        cursor = tag.end + PLACEHOLDER_BODY.len();
        expanded += 1;
    }

    if expanded > 0 {
        tracing::trace!(expanded, "expanded YouTube embeds");
    }
    out.push_str(&text[cursor..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_becomes_thumbnail() {
        let text = r#"Watch:
<div class="js-lazyYT" data-youtube-id="dQw4w9WgXcQ" data-ratio="16:9">Loading...</div>
Done."#;
        let out = expand_youtube_embeds(text);
        assert_eq!(
            out,
            "Watch:\n[![YouTube Video Thumbnail](https://img.youtube.com/vi/dQw4w9WgXcQ/0.jpg)](https://www.youtube.com/watch?v=dQw4w9WgXcQ)\nDone."
        );
    }

    #[test]
    fn test_other_divs_untouched() {
        let text = concat!(
            r#"<div class="note" data-youtube-id="x">Loading...</div>"#,
            r#"<div class="js-lazyYT">Loading...</div>"#,
            r#"<div class="js-lazyYT" data-youtube-id="abc">Ready</div>"#,
        );
        assert_eq!(expand_youtube_embeds(text), text);
    }

    #[test]
    fn test_multiple_embeds() {
        let text = r#"<div class="js-lazyYT" data-youtube-id="a">Loading...</div> and <div class="js-lazyYT" data-youtube-id="b">Loading...</div>"#;
        let out = expand_youtube_embeds(text);
        assert!(out.contains("vi/a/0.jpg"));
        assert!(out.contains("watch?v=b"));
        assert!(!out.contains("<div"));
    }
}
