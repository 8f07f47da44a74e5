//! Hype manual assembly
//!
//! Operations over a documentation root (chapter sources in `md/`, assets in
//! `images/`):
//! - **chapters:** ordered discovery of chapter sources
//! - **combine:** the single combined `README.md`
//! - **images:** unused-image audit and cleanup
//! - **anchors:** internal `#fragment` link checking

pub mod anchors;
pub mod chapters;
pub mod combine;
pub mod images;

pub use anchors::{check_anchors, BrokenAnchor};
pub use chapters::{discover_chapters, Chapter};
pub use combine::{CombineReport, Combiner};
pub use images::{CleanupOutcome, ImageAudit};
