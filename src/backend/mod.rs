//! Document engine abstraction layer.
//!
//! The layout engine never touches a concrete PDF library. It consumes a
//! [`DocumentSource`] (page count plus per-page access) and, per page, a
//! [`PageSource`] that yields raw text geometry and, optionally, natively
//! detected tables. [`LopdfDocument`] backs these traits with `lopdf`;
//! [`MemoryDocument`] backs them with caller-supplied geometry.

mod guard;
mod memory;
mod pdf;

pub use self::guard::DocumentGuard;
pub use self::memory::{MemoryDocument, MemoryPage, NativeTables};
pub use self::pdf::{LopdfDocument, LopdfPage};

use crate::error::Result;
use crate::model::BoundingBox;

/// A block-granularity text region as reported by the document engine.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTextBlock {
    /// Block bounding box
    pub bbox: BoundingBox,
    /// Untrimmed block text
    pub text: String,
}

impl RawTextBlock {
    /// Create a raw block.
    pub fn new(bbox: BoundingBox, text: impl Into<String>) -> Self {
        Self {
            bbox,
            text: text.into(),
        }
    }
}

/// A run of text sharing one font and position.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSpan {
    /// Span bounding box
    pub bbox: BoundingBox,
    /// Span text
    pub text: String,
}

impl RawSpan {
    /// Create a raw span.
    pub fn new(bbox: BoundingBox, text: impl Into<String>) -> Self {
        Self {
            bbox,
            text: text.into(),
        }
    }
}

/// A line of spans, as laid out by the document engine.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawLine {
    /// Spans in reading order
    pub spans: Vec<RawSpan>,
}

impl RawLine {
    /// Create a line from spans.
    pub fn new(spans: Vec<RawSpan>) -> Self {
        Self { spans }
    }

    /// Box enclosing every span of the line.
    pub fn bbox(&self) -> BoundingBox {
        BoundingBox::merge(self.spans.iter().map(|s| &s.bbox))
    }

    /// Span texts joined by a single space.
    pub fn text(&self) -> String {
        self.spans
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A table found by the engine's native table finder.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    /// Table bounding box
    pub bbox: BoundingBox,
    /// Row-major cell texts
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Create a raw table.
    pub fn new(bbox: BoundingBox, rows: Vec<Vec<String>>) -> Self {
        Self { bbox, rows }
    }
}

/// Abstract interface for an open document.
pub trait DocumentSource {
    /// Number of pages.
    fn page_count(&self) -> usize;

    /// Access the page at a 0-based index.
    fn page(&self, index: usize) -> Result<Box<dyn PageSource + '_>>;

    /// Release the engine's resources. Called exactly once by
    /// [`DocumentGuard`]; pages must not be requested afterwards.
    fn close(&mut self) {}
}

/// Abstract interface for one page of an open document.
pub trait PageSource {
    /// Block-granularity text with positions.
    fn text_blocks(&self) -> Result<Vec<RawTextBlock>>;

    /// Line/span-granularity text with positions.
    fn text_lines(&self) -> Result<Vec<RawLine>>;

    /// Natively detected tables.
    ///
    /// `None` means the engine has no table finder, which is a normal
    /// condition rather than an error.
    fn find_tables(&self) -> Option<Result<Vec<RawTable>>> {
        None
    }
}

impl<P: PageSource + ?Sized> PageSource for Box<P> {
    fn text_blocks(&self) -> Result<Vec<RawTextBlock>> {
        (**self).text_blocks()
    }

    fn text_lines(&self) -> Result<Vec<RawLine>> {
        (**self).text_lines()
    }

    fn find_tables(&self) -> Option<Result<Vec<RawTable>>> {
        (**self).find_tables()
    }
}

/// Simple text decoding fallback when no encoding is available.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    // Latin-1
    bytes.iter().map(|&b| b as char).collect()
}
