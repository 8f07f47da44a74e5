//! Combine chapter sources into the manual.

use std::path::Path;

use hypedocs_common::DocsConfig;
use hypedocs_manual::{CombineReport, Combiner};

pub fn run(root: &Path, config: &DocsConfig) -> anyhow::Result<()> {
    combine_with_progress(root, config)?;
    Ok(())
}

/// Combine and print progress. Shared with `build`.
pub fn combine_with_progress(root: &Path, config: &DocsConfig) -> anyhow::Result<CombineReport> {
    let combiner = Combiner::new(config.clone(), root);
    let chapters = combiner
        .chapters()
        .map_err(|e| anyhow::anyhow!("Failed to list chapters: {e}"))?;

    if chapters.is_empty() {
        println!(
            "No markdown files found in {}.",
            config.chapters_path(root).display()
        );
    } else {
        println!("Combining {} markdown files...", chapters.len());
        println!("Files to be combined (in order):");
        for chapter in &chapters {
            println!("  - {}", chapter.name);
        }
    }

    let report = combiner
        .combine_chapters(&chapters)
        .map_err(|e| anyhow::anyhow!("Failed to combine chapters: {e}"))?;

    if report.written {
        for failed in &report.failed {
            println!("  Error reading {}: {}", failed.name, failed.error);
        }
        println!();
        println!("Successfully combined files into: {}", report.output.display());
        println!("Total files processed: {}", report.chapters);
    }

    Ok(report)
}
