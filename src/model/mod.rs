//! Output model for extracted document structure.
//!
//! These types are the sole artifact of an extraction call. They serialize to
//! the JSON shape
//! `{"pages": [{"page_number", "elements": [{"type", "order", "content",
//! "metadata": {"bbox"}}]}], "summary": {...}}`.

mod bbox;
mod document;
mod element;
mod page;

pub use bbox::BoundingBox;
pub(crate) use bbox::cmp_coord;
pub use document::{DocumentStructure, Summary};
pub use element::{Element, ElementContent, ElementKind, ElementMetadata};
pub use page::Page;
