//! Chapter source discovery.
//!
//! Chapters are the `*.md` files directly inside the chapter directory. Their
//! file names carry a numeric prefix (`01introduction.md`,
//! `15versionhistory.md`), so name order is reading order.

use std::path::{Path, PathBuf};

use hypedocs_common::{DocsError, DocsResult, VersionHistoryStub};

/// One chapter source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    /// File name, e.g. `03scenes.md`.
    pub name: String,
    pub path: PathBuf,
}

impl Chapter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { name, path }
    }

    /// Chapter text, or the version-history pointer when this chapter is the
    /// stubbed one. The stubbed file is not read at all.
    pub fn read(&self, stub: Option<&VersionHistoryStub>) -> DocsResult<String> {
        if let Some(stub) = stub.filter(|s| s.file == self.name) {
            tracing::debug!(chapter = %self.name, "using version history stub");
            return Ok(version_history_stub(&stub.url));
        }
        std::fs::read_to_string(&self.path).map_err(|e| DocsError::io_at(&self.path, e))
    }
}

/// Replacement text for the version history chapter.
pub fn version_history_stub(url: &str) -> String {
    format!("# Version History\n\nView the full version history [here]({url}).")
}

/// List the chapters in `dir`, sorted by file name, skipping `exclude`.
pub fn discover_chapters(dir: impl AsRef<Path>, exclude: &str) -> DocsResult<Vec<Chapter>> {
    let dir = dir.as_ref();
    if !dir.exists() {
        return Err(DocsError::not_found(dir));
    }
    if !dir.is_dir() {
        return Err(DocsError::chapter(format!(
            "{} is not a directory",
            dir.display()
        )));
    }

    let mut chapters = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| DocsError::io_at(dir, e))? {
        let entry = entry.map_err(|e| DocsError::io_at(dir, e))?;
        let path = entry.path();
        if !path.is_file() || path.extension().map_or(true, |ext| ext != "md") {
            continue;
        }
        let chapter = Chapter::new(path);
        if chapter.name == exclude {
            continue;
        }
        chapters.push(chapter);
    }

    chapters.sort_by(|a, b| a.name.cmp(&b.name));
    tracing::debug!(dir = %dir.display(), count = chapters.len(), "discovered chapters");
    Ok(chapters)
}
