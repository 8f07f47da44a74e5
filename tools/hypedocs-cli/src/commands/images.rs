//! Audit the image folder against the combined manual.

use std::path::{Path, PathBuf};

use hypedocs_common::DocsConfig;
use hypedocs_manual::{CleanupOutcome, ImageAudit};

use super::{confirm, format_bytes, group_thousands};

pub fn run(
    root: &Path,
    config: &DocsConfig,
    auto_cleanup: bool,
    dry_run: bool,
) -> anyhow::Result<()> {
    let audit = scan(root, config)?;
    print_audit(&audit);
    if !dry_run {
        cleanup(root, config, &audit, auto_cleanup)?;
    }
    print_summary(&audit);
    Ok(())
}

pub fn scan(root: &Path, config: &DocsConfig) -> anyhow::Result<ImageAudit> {
    let manual = config.output_path(root);
    println!("Analyzing image usage in {}...", manual.display());
    ImageAudit::scan(
        &manual,
        config.images_path(root),
        &config.image_host_prefix,
    )
    .map_err(|e| anyhow::anyhow!("Failed to audit images: {e}"))
}

pub fn print_audit(audit: &ImageAudit) {
    println!(
        "  Found {} unique image files referenced in the manual",
        audit.referenced.len()
    );
    println!(
        "  Found {} total files in {}",
        audit.present.len(),
        audit.images_dir.display()
    );

    let missing = audit.missing();
    if !missing.is_empty() {
        println!();
        println!("Referenced images missing from the folder:");
        for name in missing {
            println!("  - {name}");
        }
    }

    let unused = audit.unused();
    if unused.is_empty() {
        println!();
        println!("All files in the images folder are used by the manual.");
        return;
    }

    println!();
    println!("Found {} unused files:", unused.len());
    println!("{}", "=".repeat(50));
    for name in &unused {
        let size = audit.present.get(*name).copied().unwrap_or(0);
        println!("  {name} ({} bytes)", group_thousands(size));
    }
    println!("{}", "=".repeat(50));
    println!(
        "Total size of unused files: {}",
        format_bytes(audit.unused_bytes())
    );
}

/// What happened to the unused images.
#[derive(Debug)]
pub enum Disposition {
    /// Nothing was unused.
    Clean,
    Deleted(CleanupOutcome),
    /// Deletion was declined; the unused list was written here.
    Listed(PathBuf),
}

/// Delete the unused images, or write their list when `delete` is false.
pub fn dispose_unused(
    root: &Path,
    config: &DocsConfig,
    audit: &ImageAudit,
    delete: bool,
) -> anyhow::Result<Disposition> {
    if audit.unused().is_empty() {
        return Ok(Disposition::Clean);
    }
    if delete {
        return Ok(Disposition::Deleted(audit.delete_unused()));
    }

    let list = root.join(&config.unused_list);
    audit
        .write_unused_list(&list)
        .map_err(|e| anyhow::anyhow!("Failed to write unused file list: {e}"))?;
    Ok(Disposition::Listed(list))
}

/// Delete unused images after confirmation (or unconditionally with
/// `auto_cleanup`). Declining writes the unused list instead.
pub fn cleanup(
    root: &Path,
    config: &DocsConfig,
    audit: &ImageAudit,
    auto_cleanup: bool,
) -> anyhow::Result<Disposition> {
    let unused = audit.unused().len();
    let proceed = unused > 0
        && (auto_cleanup
            || confirm(&format!(
                "\nDo you want to delete these {unused} unused files?"
            ))?);

    let disposition = dispose_unused(root, config, audit, proceed)?;
    match &disposition {
        Disposition::Clean => {}
        Disposition::Deleted(outcome) => print_cleanup(outcome),
        Disposition::Listed(list) => {
            println!("Deletion cancelled.");
            println!("List of unused files saved to: {}", list.display());
        }
    }
    Ok(disposition)
}

fn print_cleanup(outcome: &CleanupOutcome) {
    for name in &outcome.deleted {
        println!("  Deleted: {name}");
    }
    for name in &outcome.missing {
        println!("  File not found: {name}");
    }
    for (name, error) in &outcome.failed {
        println!("  Error deleting {name}: {error}");
    }
    println!();
    println!(
        "Successfully deleted {} files ({})",
        outcome.deleted.len(),
        format_bytes(outcome.deleted_bytes)
    );
}

pub fn print_summary(audit: &ImageAudit) {
    println!();
    println!("Image usage summary:");
    println!("  Files referenced in the manual: {}", audit.referenced.len());
    println!("  Files in images folder: {}", audit.present.len());
    println!("  Unused files: {}", audit.unused().len());
    match audit.usage_rate() {
        Some(rate) => println!("  Usage rate: {rate:.1}%"),
        None => println!("  Usage rate: N/A"),
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::scratch_docs;
    use super::*;

    fn audit_of(root: &Path, config: &DocsConfig) -> ImageAudit {
        hypedocs_manual::Combiner::new(config.clone(), root)
            .combine()
            .unwrap();
        ImageAudit::scan(
            config.output_path(root),
            config.images_path(root),
            &config.image_host_prefix,
        )
        .unwrap()
    }

    #[test]
    fn test_declined_cleanup_writes_list() {
        let root = scratch_docs("hypedocs_cli_images_declined");
        let config = DocsConfig::default();
        let audit = audit_of(&root, &config);

        let list = match dispose_unused(&root, &config, &audit, false).unwrap() {
            Disposition::Listed(list) => list,
            other => panic!("expected the unused list, got {other:?}"),
        };
        assert_eq!(list, root.join("unused_files.txt"));
        let content = std::fs::read_to_string(&list).unwrap();
        assert!(content.ends_with("\nold-toolbar.png\n"));
        assert!(root.join("images").join("old-toolbar.png").exists());

        std::fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_accepted_cleanup_deletes() {
        let root = scratch_docs("hypedocs_cli_images_accepted");
        let config = DocsConfig::default();
        let audit = audit_of(&root, &config);

        let outcome = match dispose_unused(&root, &config, &audit, true).unwrap() {
            Disposition::Deleted(outcome) => outcome,
            other => panic!("expected deletion, got {other:?}"),
        };
        assert_eq!(outcome.deleted, vec!["old-toolbar.png"]);
        assert!(!root.join("images").join("old-toolbar.png").exists());
        assert!(!root.join("unused_files.txt").exists());

        std::fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_nothing_unused_is_clean() {
        let root = scratch_docs("hypedocs_cli_images_clean");
        std::fs::remove_file(root.join("images").join("old-toolbar.png")).unwrap();
        let config = DocsConfig::default();
        let audit = audit_of(&root, &config);

        assert!(matches!(
            dispose_unused(&root, &config, &audit, false).unwrap(),
            Disposition::Clean
        ));
        assert!(!root.join("unused_files.txt").exists());

        std::fs::remove_dir_all(&root).ok();
    }
}
