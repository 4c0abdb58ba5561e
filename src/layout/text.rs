//! Text block extraction.

use crate::backend::PageSource;
use crate::model::BoundingBox;

/// A trimmed, non-empty text block.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    /// Trimmed block text
    pub content: String,
    /// Block bounding box
    pub bbox: BoundingBox,
}

/// Pull text blocks from one page.
///
/// Surrounding whitespace is trimmed and blocks left empty are dropped.
/// Extraction failures are logged and yield no blocks.
pub fn extract_text_blocks(page: &dyn PageSource, page_number: u32) -> Vec<TextBlock> {
    let raw = match page.text_blocks() {
        Ok(raw) => raw,
        Err(e) => {
            log::warn!("page {}: text extraction failed: {}", page_number, e);
            return Vec::new();
        }
    };

    raw.into_iter()
        .filter_map(|block| {
            let content = block.text.trim();
            if content.is_empty() {
                None
            } else {
                Some(TextBlock {
                    content: content.to_string(),
                    bbox: block.bbox,
                })
            }
        })
        .collect()
}
