//! Domain logic for hublink
//!
//! Pure text processing over note contents, without any I/O concerns.

mod tags;
mod links;
mod section;
mod mapping;

pub use tags::{extract_tags, extract_tags_with, InlineTagScope};
pub use links::extract_links;
pub use section::{heading_pattern, merge};
pub use mapping::{normalize_hub_path, resolve, strip_hash, TagMapping, NOTE_EXTENSION};
