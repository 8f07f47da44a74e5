//! Print one processed chapter.

use std::path::PathBuf;

use hypedocs_common::DocsConfig;
use hypedocs_manual::Chapter;
use hypedocs_markup::ChapterPipeline;

pub fn run(file: PathBuf, config: &DocsConfig) -> anyhow::Result<()> {
    let chapter = Chapter::new(file);
    let source = chapter
        .read(config.version_history.as_ref())
        .map_err(|e| anyhow::anyhow!("Failed to read chapter: {e}"))?;

    let pipeline = ChapterPipeline::from_config(config);
    println!("{}", pipeline.process(&source));
    Ok(())
}
