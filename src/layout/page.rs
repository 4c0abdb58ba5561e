//! Per-page processing.
//!
//! A page runs once through
//! `Idle -> TextExtracted -> TablesExtracted -> Merged -> Ordered -> Done`.
//! Text and tables are concatenated (text first), stably sorted by the top
//! edge of their boxes, and renumbered by position.

use std::fmt;

use crate::backend::PageSource;
use crate::model::{cmp_coord, Element, Page};

use super::detector::DetectorChain;
use super::table_detector::DetectedTable;
use super::text::{extract_text_blocks, TextBlock};

/// Stage of a page run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PageStage {
    /// Nothing extracted yet
    Idle,
    /// Text blocks extracted
    TextExtracted,
    /// Tables extracted
    TablesExtracted,
    /// Text and tables combined
    Merged,
    /// Elements sorted top to bottom
    Ordered,
    /// Page emitted
    Done,
}

impl fmt::Display for PageStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PageStage::Idle => "idle",
            PageStage::TextExtracted => "text-extracted",
            PageStage::TablesExtracted => "tables-extracted",
            PageStage::Merged => "merged",
            PageStage::Ordered => "ordered",
            PageStage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Turns one page into an ordered [`Page`].
#[derive(Debug, Clone, Default)]
pub struct PageProcessor {
    detectors: DetectorChain,
}

impl PageProcessor {
    /// Create a processor using the given detector chain.
    pub fn new(detectors: DetectorChain) -> Self {
        Self { detectors }
    }

    /// Process one page. `page_number` is 1-indexed.
    pub fn process(&self, page: &dyn PageSource, page_number: u32) -> Page {
        let mut run = PageRun::new(page_number);

        let text = extract_text_blocks(page, page_number);
        run.advance(PageStage::TextExtracted);

        let tables = self.detectors.run(page, page_number);
        run.advance(PageStage::TablesExtracted);

        let mut elements = merge_elements(text, tables);
        run.advance(PageStage::Merged);

        order_elements(&mut elements);
        run.advance(PageStage::Ordered);

        let page = Page::new(page_number, elements);
        run.advance(PageStage::Done);
        page
    }
}

/// Tracks the forward-only stage of one page run.
struct PageRun {
    page_number: u32,
    stage: PageStage,
}

impl PageRun {
    fn new(page_number: u32) -> Self {
        Self {
            page_number,
            stage: PageStage::Idle,
        }
    }

    fn advance(&mut self, next: PageStage) {
        debug_assert!(next > self.stage, "page stages only move forward");
        log::trace!("page {}: {} -> {}", self.page_number, self.stage, next);
        self.stage = next;
    }
}

/// Text elements first, then tables, numbered provisionally.
fn merge_elements(text: Vec<TextBlock>, tables: Vec<DetectedTable>) -> Vec<Element> {
    text.into_iter()
        .map(|block| Element::text(block.content, block.bbox))
        .chain(
            tables
                .into_iter()
                .map(|table| Element::table(table.rows, table.bbox)),
        )
        .enumerate()
        .map(|(i, element)| element.with_order(i))
        .collect()
}

/// Stable sort by top edge, then renumber by position.
pub fn order_elements(elements: &mut [Element]) {
    elements.sort_by(|a, b| cmp_coord(a.vertical_position(), b.vertical_position()));
    for (i, element) in elements.iter_mut().enumerate() {
        element.order = i;
    }
}
