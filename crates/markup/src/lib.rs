//! Hype manual markup transforms
//!
//! Converts one chapter of the Hype user guide, written as Markdown with
//! website HTML mixed in, into portable Markdown:
//! - **youtube:** lazy video placeholders to thumbnail links
//! - **images:** lazy/retina sources promoted to `src`, heights removed
//! - **links:** `documents/` and `images/` references made absolute
//! - **table:** HTML tables to pipe tables
//! - **compact:** attribute and whitespace reduction
//!
//! All transforms are pure string functions; [`ChapterPipeline`] applies
//! them in order.

pub mod compact;
pub mod images;
pub mod links;
pub mod pipeline;
pub mod table;
pub mod tag;
pub mod youtube;

pub use pipeline::ChapterPipeline;
