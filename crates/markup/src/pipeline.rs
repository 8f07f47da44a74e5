//! The ordered chain of chapter transforms.

use hypedocs_common::DocsConfig;

use crate::{compact, images, links, table, youtube};

/// Per-chapter processing settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterPipeline {
    pub documents_base_url: String,
    pub images_base_url: String,
    pub compact: bool,
}

impl ChapterPipeline {
    pub fn from_config(config: &DocsConfig) -> Self {
        Self {
            documents_base_url: config.documents_base_url.clone(),
            images_base_url: config.images_base_url.clone(),
            compact: config.compact,
        }
    }

    /// Run one chapter through every transform.
    ///
    /// Image sources are promoted before paths are rewritten, so that lazy
    /// `data-src` values end up absolute too. Tables are converted after the
    /// image pass so cells see final image URLs.
    pub fn process(&self, chapter: &str) -> String {
        let text = compact::replace_non_breaking_spaces(chapter);
        let text = youtube::expand_youtube_embeds(&text);
        let text = images::promote_retina_sources(&text);
        let text = images::promote_lazy_sources(&text);
        let text = links::absolutize_document_links(&text, &self.documents_base_url);
        let text = links::absolutize_markdown_document_links(&text, &self.documents_base_url);
        let text = links::absolutize_image_paths(&text, &self.images_base_url);
        let text = images::strip_image_heights(&text);
        let text = table::convert_tables(&text);
        if self.compact {
            compact::compact(&text)
        } else {
            text
        }
    }
}

impl Default for ChapterPipeline {
    fn default() -> Self {
        Self::from_config(&DocsConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lazy_image_ends_absolute_without_height() {
        let pipeline = ChapterPipeline::default();
        let out = pipeline.process(
            r#"<img class="shot" src="images/blank.gif" data-src="images/scene.png" width="320" height="200">"#,
        );
        assert_eq!(
            out,
            format!(
                r#"<img src="{}scene.png" width="320"/>"#,
                pipeline.images_base_url
            )
        );
    }

    #[test]
    fn test_table_cells_see_promoted_images() {
        let pipeline = ChapterPipeline::default();
        let out = pipeline.process(
            r#"<table><tr><th>Tool</th></tr><tr><td><img data-src-retina="images/pen@2x.png" alt="Pen"></td></tr></table>"#,
        );
        assert_eq!(
            out,
            format!(
                "\n| Tool |\n| --- |\n| ![Pen]({}pen@2x.png) |\n",
                pipeline.images_base_url
            )
        );
    }

    #[test]
    fn test_compaction_can_be_disabled() {
        let pipeline = ChapterPipeline {
            compact: false,
            ..ChapterPipeline::default()
        };
        let text = "Keep   this\n\n\n\n<p class=\"note\">x</p>";
        assert_eq!(pipeline.process(text), text);
    }

    #[test]
    fn test_non_breaking_spaces_compacted() {
        let pipeline = ChapterPipeline::default();
        assert_eq!(pipeline.process("Option\u{a0}\u{a0}Click"), "Option Click");
    }

    #[test]
    fn test_markdown_document_link() {
        let pipeline = ChapterPipeline::default();
        assert_eq!(
            pipeline.process("[Download](documents/physics.hype.zip)"),
            format!("[Download]({}physics.hype.zip)", pipeline.documents_base_url)
        );
    }
}
