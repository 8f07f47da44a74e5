//! Check internal anchor links.

use std::path::{Path, PathBuf};

use hypedocs_common::DocsConfig;
use hypedocs_manual::check_anchors;

pub fn run(root: &Path, config: &DocsConfig, file: Option<PathBuf>) -> anyhow::Result<()> {
    let path = file.unwrap_or_else(|| config.output_path(root));
    println!("Checking anchors in: {}", path.display());

    let text = std::fs::read_to_string(&path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?;

    let broken = check_anchors(&text);
    if broken.is_empty() {
        println!("All internal links resolve.");
        return Ok(());
    }

    println!();
    println!("Broken anchors:");
    for anchor in &broken {
        println!("  line {}: #{}", anchor.line, anchor.fragment);
    }
    anyhow::bail!("{} broken anchor(s) found", broken.len())
}
