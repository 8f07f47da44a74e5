//! Full manual build: combine chapters, then audit and clean up images.

use std::path::Path;

use hypedocs_common::DocsConfig;
use hypedocs_manual::images::AuditSummary;
use hypedocs_manual::{CleanupOutcome, CombineReport, Combiner, ImageAudit};
use serde::Serialize;

use super::images::Disposition;

/// Machine-readable build result printed by `build --json`.
#[derive(Debug, Serialize)]
pub struct BuildSummary {
    /// RFC 3339 timestamp of the build.
    pub generated_at: String,
    pub combine: CombineReport,
    pub images: Option<AuditSummary>,
    pub cleanup: Option<CleanupOutcome>,
    /// Where the unused list was written when nothing was deleted.
    pub unused_list: Option<String>,
}

pub fn run(root: &Path, config: &DocsConfig, auto_cleanup: bool, json: bool) -> anyhow::Result<()> {
    if json {
        let summary = build_summary(root, config, auto_cleanup)?;
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Step 1: Combining markdown files...");
    let report = super::combine::combine_with_progress(root, config)?;
    if !report.written {
        return Ok(());
    }

    println!();
    println!("Step 2: Cleaning up unused images...");
    let audit = super::images::scan(root, config)?;
    super::images::print_audit(&audit);
    super::images::cleanup(root, config, &audit, auto_cleanup)?;
    super::images::print_summary(&audit);

    Ok(())
}

/// Non-interactive build. Unused images are deleted only with
/// `auto_cleanup`; otherwise their list is written for review.
fn build_summary(
    root: &Path,
    config: &DocsConfig,
    auto_cleanup: bool,
) -> anyhow::Result<BuildSummary> {
    let report = Combiner::new(config.clone(), root)
        .combine()
        .map_err(|e| anyhow::anyhow!("Failed to combine chapters: {e}"))?;

    let mut summary = BuildSummary {
        generated_at: chrono::Utc::now().to_rfc3339(),
        combine: report,
        images: None,
        cleanup: None,
        unused_list: None,
    };
    if !summary.combine.written {
        return Ok(summary);
    }

    let audit = ImageAudit::scan(
        &summary.combine.output,
        config.images_path(root),
        &config.image_host_prefix,
    )
    .map_err(|e| anyhow::anyhow!("Failed to audit images: {e}"))?;
    summary.images = Some(audit.summary());

    match super::images::dispose_unused(root, config, &audit, auto_cleanup)? {
        Disposition::Clean => {}
        Disposition::Deleted(outcome) => summary.cleanup = Some(outcome),
        Disposition::Listed(list) => summary.unused_list = Some(list.display().to_string()),
    }

    tracing::debug!(generated_at = %summary.generated_at, "build summary ready");
    Ok(summary)
}
