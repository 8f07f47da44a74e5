//! Combined manual generation.
//!
//! Every chapter is run through the markup pipeline and concatenated under a
//! single title, separated by horizontal rules. A chapter that cannot be read
//! is replaced by an inline error note; the rest of the manual is still
//! produced.

use std::path::{Path, PathBuf};

use hypedocs_common::{DocsConfig, DocsError, DocsResult};
use hypedocs_markup::ChapterPipeline;
use serde::Serialize;

use crate::chapters::{discover_chapters, Chapter};

/// Text placed between chapters.
pub const CHAPTER_SEPARATOR: &str = "\n\n---\n\n";

/// A chapter that could not be included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedChapter {
    pub name: String,
    pub error: String,
}

/// Rendered manual text plus per-chapter outcome.
#[derive(Debug, Clone, Default)]
pub struct RenderedManual {
    pub text: String,
    pub processed: Vec<String>,
    pub failed: Vec<FailedChapter>,
}

/// Outcome of [`Combiner::combine`].
#[derive(Debug, Clone, Serialize)]
pub struct CombineReport {
    /// Output file path.
    pub output: PathBuf,
    /// Number of chapters discovered.
    pub chapters: usize,
    /// Chapters included, in order.
    pub processed: Vec<String>,
    /// Chapters replaced by an error note.
    pub failed: Vec<FailedChapter>,
    /// Size of the written output.
    pub bytes: usize,
    /// Whether the output file was written.
    pub written: bool,
}

/// Builds the combined manual for a documentation root.
#[derive(Debug, Clone)]
pub struct Combiner {
    root: PathBuf,
    config: DocsConfig,
    pipeline: ChapterPipeline,
}

impl Combiner {
    pub fn new(config: DocsConfig, root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            pipeline: ChapterPipeline::from_config(&config),
            config,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &DocsConfig {
        &self.config
    }

    pub fn output_path(&self) -> PathBuf {
        self.config.output_path(&self.root)
    }

    /// Chapters in reading order, excluding the output file.
    pub fn chapters(&self) -> DocsResult<Vec<Chapter>> {
        discover_chapters(
            self.config.chapters_path(&self.root),
            &self.config.output_file_name(),
        )
    }

    /// Render `chapters` into manual text without touching the output file.
    pub fn render(&self, chapters: &[Chapter]) -> RenderedManual {
        let mut manual = RenderedManual {
            text: format!("# {}\n\n", self.config.title),
            ..RenderedManual::default()
        };

        for (i, chapter) in chapters.iter().enumerate() {
            match chapter.read(self.config.version_history.as_ref()) {
                Ok(source) => {
                    tracing::debug!(chapter = %chapter.name, "processing chapter");
                    manual.text.push_str(&self.pipeline.process(&source));
                    manual.processed.push(chapter.name.clone());
                }
                Err(e) => {
                    tracing::warn!(chapter = %chapter.name, error = %e, "chapter unreadable");
                    manual
                        .text
                        .push_str(&format!("*Error reading file {}: {e}*\n\n", chapter.name));
                    manual.failed.push(FailedChapter {
                        name: chapter.name.clone(),
                        error: e.to_string(),
                    });
                }
            }
            if i + 1 < chapters.len() {
                manual.text.push_str(CHAPTER_SEPARATOR);
            }
        }

        manual
    }

    /// Discover, render and write the combined manual.
    ///
    /// With no chapters, nothing is written and `written` is false.
    pub fn combine(&self) -> DocsResult<CombineReport> {
        let chapters = self.chapters()?;
        self.combine_chapters(&chapters)
    }

    /// Render and write already discovered `chapters`.
    pub fn combine_chapters(&self, chapters: &[Chapter]) -> DocsResult<CombineReport> {
        let output = self.output_path();

        if chapters.is_empty() {
            tracing::warn!(dir = %self.config.chapters_path(&self.root).display(), "no chapters found");
            return Ok(CombineReport {
                output,
                chapters: 0,
                processed: Vec::new(),
                failed: Vec::new(),
                bytes: 0,
                written: false,
            });
        }

        let manual = self.render(chapters);
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| DocsError::io_at(parent, e))?;
        }
        std::fs::write(&output, &manual.text).map_err(|e| DocsError::io_at(&output, e))?;

        tracing::info!(
            output = %output.display(),
            chapters = chapters.len(),
            failed = manual.failed.len(),
            bytes = manual.text.len(),
            "combined manual written"
        );

        Ok(CombineReport {
            output,
            chapters: chapters.len(),
            processed: manual.processed,
            failed: manual.failed,
            bytes: manual.text.len(),
            written: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_root(name: &str) -> PathBuf {
        let root = std::env::temp_dir().join(name);
        let _ = std::fs::remove_dir_all(&root);
        std::fs::create_dir_all(root.join("md")).unwrap();
        root
    }

    #[test]
    fn test_render_joins_chapters_with_separator() {
        let root = scratch_root("hypedocs_test_render");
        std::fs::write(root.join("md/01intro.md"), "# Intro\n\nHello").unwrap();
        std::fs::write(root.join("md/02scenes.md"), "# Scenes").unwrap();

        let combiner = Combiner::new(DocsConfig::default(), &root);
        let chapters = combiner.chapters().unwrap();
        let manual = combiner.render(&chapters);

        assert_eq!(
            manual.text,
            "# Tumult Hype Documentation\n\n# Intro\n\nHello\n\n---\n\n# Scenes"
        );
        assert_eq!(manual.processed, vec!["01intro.md", "02scenes.md"]);
        assert!(manual.failed.is_empty());

        std::fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_unreadable_chapter_becomes_note() {
        let root = scratch_root("hypedocs_test_render_failed");
        std::fs::write(root.join("md/01intro.md"), "# Intro").unwrap();

        let combiner = Combiner::new(DocsConfig::default(), &root);
        let chapters = vec![
            Chapter::new(root.join("md/00gone.md")),
            Chapter::new(root.join("md/01intro.md")),
        ];
        let manual = combiner.render(&chapters);

        assert_eq!(manual.failed.len(), 1);
        assert_eq!(manual.failed[0].name, "00gone.md");
        assert!(manual.text.contains("*Error reading file 00gone.md: File not found:"));
        assert!(manual.text.ends_with("\n\n---\n\n# Intro"));

        std::fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_combine_given_chapters_only() {
        let root = scratch_root("hypedocs_test_combine_given");
        std::fs::write(root.join("md/01intro.md"), "# Intro").unwrap();
        std::fs::write(root.join("md/02scenes.md"), "# Scenes").unwrap();

        let combiner = Combiner::new(DocsConfig::default(), &root);
        let mut chapters = combiner.chapters().unwrap();
        chapters.truncate(1);
        let report = combiner.combine_chapters(&chapters).unwrap();

        assert!(report.written);
        assert_eq!(report.chapters, 1);
        let written = std::fs::read_to_string(root.join("README.md")).unwrap();
        assert_eq!(written, "# Tumult Hype Documentation\n\n# Intro");

        std::fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_empty_chapter_dir_writes_nothing() {
        let root = scratch_root("hypedocs_test_combine_empty");

        let report = Combiner::new(DocsConfig::default(), &root).combine().unwrap();
        assert!(!report.written);
        assert_eq!(report.chapters, 0);
        assert!(!root.join("README.md").exists());

        std::fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_previous_output_is_not_a_chapter() {
        let root = scratch_root("hypedocs_test_combine_output");
        std::fs::write(root.join("md/01intro.md"), "# Intro").unwrap();
        std::fs::write(root.join("md/README.md"), "# Stale").unwrap();

        let mut config = DocsConfig::default();
        config.output = PathBuf::from("md/README.md");
        let report = Combiner::new(config, &root).combine().unwrap();

        assert!(report.written);
        assert_eq!(report.processed, vec!["01intro.md"]);
        let written = std::fs::read_to_string(root.join("md/README.md")).unwrap();
        assert!(!written.contains("Stale"));

        std::fs::remove_dir_all(&root).ok();
    }
}
