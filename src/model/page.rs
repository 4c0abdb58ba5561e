//! Page-level types.

use super::Element;
use serde::{Deserialize, Serialize};

/// A single page of the extracted structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Page number (1-indexed)
    pub page_number: u32,

    /// Elements in top-to-bottom reading order
    pub elements: Vec<Element>,
}

impl Page {
    /// Create a page from already ordered elements.
    pub fn new(page_number: u32, elements: Vec<Element>) -> Self {
        Self {
            page_number,
            elements,
        }
    }

    /// Create a page with no elements.
    pub fn empty(page_number: u32) -> Self {
        Self::new(page_number, Vec::new())
    }

    /// Check if the page has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Number of text elements.
    pub fn text_block_count(&self) -> usize {
        self.elements.iter().filter(|e| e.is_text()).count()
    }

    /// Number of table elements.
    pub fn table_count(&self) -> usize {
        self.elements.iter().filter(|e| e.is_table()).count()
    }

    /// Iterate over table elements.
    pub fn tables(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter().filter(|e| e.is_table())
    }

    /// Iterate over text elements.
    pub fn text_blocks(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter().filter(|e| e.is_text())
    }
}
