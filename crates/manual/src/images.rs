//! Image folder audit.
//!
//! Compares the files in the image folder with the hosted image URLs the
//! combined manual references, so that screenshots dropped from the chapters
//! can be deleted from the repository.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use hypedocs_common::{DocsError, DocsResult};
use serde::Serialize;

const IMAGES_SEGMENT: &str = "images/";

/// File names of hosted images referenced in `text`.
///
/// A reference is a URL starting with `host_prefix`, ending at `"`, `)` or
/// whitespace, with an `images/` segment. The name is the last path segment
/// after the final `images/`.
pub fn referenced_images(text: &str, host_prefix: &str) -> BTreeSet<String> {
    let mut used = BTreeSet::new();
    if host_prefix.is_empty() {
        return used;
    }

    let mut search = 0;
    while let Some(rel) = text[search..].find(host_prefix) {
        let start = search + rel;
        let end = text[start..]
            .find(|c: char| c == '"' || c == ')' || c.is_whitespace())
            .map_or(text.len(), |i| start + i);
        let url = &text[start..end];

        if let Some(idx) = url.rfind(IMAGES_SEGMENT) {
            let tail = &url[idx + IMAGES_SEGMENT.len()..];
            let name = tail.rsplit('/').next().unwrap_or(tail);
            if !name.is_empty() {
                used.insert(name.to_string());
            }
        }
        search = start + host_prefix.len();
    }
    used
}

/// Referenced versus present image files.
#[derive(Debug, Clone)]
pub struct ImageAudit {
    pub images_dir: PathBuf,
    /// Image names referenced by the manual.
    pub referenced: BTreeSet<String>,
    /// Regular files in the image folder, with their sizes.
    pub present: BTreeMap<String, u64>,
}

/// Serializable digest of an audit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditSummary {
    pub referenced: usize,
    pub present: usize,
    pub unused: Vec<String>,
    pub unused_bytes: u64,
    pub missing: Vec<String>,
    pub usage_rate: Option<f64>,
}

/// Result of deleting unused images.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanupOutcome {
    pub deleted: Vec<String>,
    pub deleted_bytes: u64,
    /// Files that had already disappeared.
    pub missing: Vec<String>,
    /// Files that could not be removed, with the error.
    pub failed: Vec<(String, String)>,
}

impl ImageAudit {
    /// Audit `images_dir` against the manual at `manual_path`.
    pub fn scan(
        manual_path: impl AsRef<Path>,
        images_dir: impl Into<PathBuf>,
        host_prefix: &str,
    ) -> DocsResult<Self> {
        let manual_path = manual_path.as_ref();
        let text = std::fs::read_to_string(manual_path)
            .map_err(|e| DocsError::io_at(manual_path, e))?;
        Self::from_text(&text, images_dir, host_prefix)
    }

    /// Audit `images_dir` against manual text already in memory.
    pub fn from_text(
        text: &str,
        images_dir: impl Into<PathBuf>,
        host_prefix: &str,
    ) -> DocsResult<Self> {
        let images_dir = images_dir.into();
        let referenced = referenced_images(text, host_prefix);
        let present = list_image_files(&images_dir)?;
        tracing::debug!(
            referenced = referenced.len(),
            present = present.len(),
            "image audit scanned"
        );
        Ok(Self {
            images_dir,
            referenced,
            present,
        })
    }

    /// Present files that the manual never references, sorted.
    pub fn unused(&self) -> Vec<&str> {
        self.present
            .keys()
            .filter(|name| !self.referenced.contains(*name))
            .map(String::as_str)
            .collect()
    }

    /// Referenced images with no file in the folder, sorted.
    pub fn missing(&self) -> Vec<&str> {
        self.referenced
            .iter()
            .filter(|name| !self.present.contains_key(*name))
            .map(String::as_str)
            .collect()
    }

    pub fn unused_bytes(&self) -> u64 {
        self.unused()
            .iter()
            .filter_map(|name| self.present.get(*name))
            .sum()
    }

    /// Percentage of present files that are referenced; `None` for an empty
    /// folder.
    pub fn usage_rate(&self) -> Option<f64> {
        if self.present.is_empty() {
            return None;
        }
        let used = self.present.len() - self.unused().len();
        Some(used as f64 / self.present.len() as f64 * 100.0)
    }

    pub fn summary(&self) -> AuditSummary {
        AuditSummary {
            referenced: self.referenced.len(),
            present: self.present.len(),
            unused: self.unused().into_iter().map(str::to_string).collect(),
            unused_bytes: self.unused_bytes(),
            missing: self.missing().into_iter().map(str::to_string).collect(),
            usage_rate: self.usage_rate(),
        }
    }

    /// Delete every unused file. Per-file failures are collected, not fatal.
    pub fn delete_unused(&self) -> CleanupOutcome {
        let mut outcome = CleanupOutcome::default();
        for name in self.unused() {
            let path = self.images_dir.join(name);
            let size = match std::fs::metadata(&path) {
                Ok(meta) => meta.len(),
                Err(_) => {
                    tracing::warn!(file = name, "unused image vanished before deletion");
                    outcome.missing.push(name.to_string());
                    continue;
                }
            };
            match std::fs::remove_file(&path) {
                Ok(()) => {
                    tracing::debug!(file = name, size, "deleted unused image");
                    outcome.deleted.push(name.to_string());
                    outcome.deleted_bytes += size;
                }
                Err(e) => {
                    tracing::warn!(file = name, error = %e, "failed to delete unused image");
                    outcome.failed.push((name.to_string(), e.to_string()));
                }
            }
        }
        outcome
    }

    /// Write the unused file list to `path` for later review.
    pub fn write_unused_list(&self, path: impl AsRef<Path>) -> DocsResult<()> {
        let path = path.as_ref();
        let unused = self.unused();
        let mut content = format!(
            "# Unused image files (not referenced in README.md)\n# Total: {} files, {} bytes\n\n",
            unused.len(),
            self.unused_bytes()
        );
        for name in &unused {
            content.push_str(name);
            content.push('\n');
        }
        std::fs::write(path, content).map_err(|e| DocsError::io_at(path, e))
    }
}

/// Regular files directly inside `dir`. A missing folder is treated as empty.
fn list_image_files(dir: &Path) -> DocsResult<BTreeMap<String, u64>> {
    let mut files = BTreeMap::new();
    if !dir.exists() {
        tracing::warn!(dir = %dir.display(), "image folder does not exist");
        return Ok(files);
    }
    if !dir.is_dir() {
        return Err(DocsError::images(format!(
            "{} is not a directory",
            dir.display()
        )));
    }
    for entry in std::fs::read_dir(dir).map_err(|e| DocsError::io_at(dir, e))? {
        let entry = entry.map_err(|e| DocsError::io_at(dir, e))?;
        let meta = entry
            .metadata()
            .map_err(|e| DocsError::io_at(entry.path(), e))?;
        if meta.is_file() {
            files.insert(entry.file_name().to_string_lossy().into_owned(), meta.len());
        }
    }
    Ok(files)
}
