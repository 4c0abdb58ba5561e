//! Document-level output types.

use serde::{Deserialize, Serialize};

use super::Page;

/// The structured result of one extraction call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentStructure {
    /// Pages in document order
    pub pages: Vec<Page>,

    /// Aggregate counts
    pub summary: Summary,
}

impl DocumentStructure {
    /// Build a structure from pages, deriving the summary from them.
    pub fn from_pages(pages: Vec<Page>) -> Self {
        let summary = Summary::tally(&pages);
        Self { pages, summary }
    }

    /// Get a page by its 1-indexed number.
    pub fn page(&self, page_number: u32) -> Option<&Page> {
        self.pages.iter().find(|p| p.page_number == page_number)
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Concatenated text of every text element, pages separated by a blank line.
    pub fn plain_text(&self) -> String {
        self.pages
            .iter()
            .map(|p| {
                p.text_blocks()
                    .filter_map(|e| e.as_text())
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Aggregate element counts for a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Number of pages
    pub total_pages: usize,
    /// Number of text elements across all pages
    pub total_text_blocks: usize,
    /// Number of table elements across all pages
    pub total_tables: usize,
}

impl Summary {
    /// Count the elements of a page list.
    pub fn tally(pages: &[Page]) -> Self {
        pages.iter().fold(
            Summary {
                total_pages: pages.len(),
                ..Summary::default()
            },
            |mut acc, page| {
                acc.record(page);
                acc
            },
        )
    }

    /// Add one page's element counts (the page count is not touched).
    pub fn record(&mut self, page: &Page) {
        self.total_text_blocks += page.text_block_count();
        self.total_tables += page.table_count();
    }
}
