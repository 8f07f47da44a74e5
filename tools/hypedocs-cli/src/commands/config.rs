//! Write the effective configuration.

use std::path::Path;

use hypedocs_common::DocsConfig;

pub fn run(root: &Path, config: &DocsConfig) -> anyhow::Result<()> {
    let path = config
        .save(root)
        .map_err(|e| anyhow::anyhow!("Failed to save configuration: {e}"))?;

    println!("Configuration written to {}", path.display());
    println!("  Chapters: {}", config.chapters_path(root).display());
    println!("  Output: {}", config.output_path(root).display());
    println!("  Images: {}", config.images_path(root).display());
    println!("  Compact: {}", config.compact);

    Ok(())
}
