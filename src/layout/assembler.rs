//! Whole-document assembly.

use crate::backend::{DocumentGuard, DocumentSource};
use crate::model::{DocumentStructure, Page, Summary};

use super::detector::DetectorChain;
use super::options::LayoutOptions;
use super::page::PageProcessor;

/// Runs the page processor over every page of a document.
#[derive(Debug, Clone, Default)]
pub struct DocumentAssembler {
    processor: PageProcessor,
}

impl DocumentAssembler {
    /// Create an assembler around a page processor.
    pub fn new(processor: PageProcessor) -> Self {
        Self { processor }
    }

    /// Create an assembler configured from layout options.
    pub fn from_options(options: &LayoutOptions) -> Self {
        Self::new(PageProcessor::new(DetectorChain::from_options(options)))
    }

    /// Extract the structure of an owned document, closing it afterwards.
    ///
    /// The document is closed whether or not assembly completes.
    pub fn extract<D: DocumentSource>(&self, source: D) -> DocumentStructure {
        let guard = DocumentGuard::new(source);
        let structure = self.assemble(&*guard);
        guard.close();
        structure
    }

    /// Process pages in order. Pages that cannot be opened come out empty.
    pub fn assemble<D: DocumentSource + ?Sized>(&self, doc: &D) -> DocumentStructure {
        let page_count = doc.page_count();
        let mut pages = Vec::with_capacity(page_count);
        let mut summary = Summary {
            total_pages: page_count,
            ..Summary::default()
        };

        for index in 0..page_count {
            let page_number = index as u32 + 1;
            let page = match doc.page(index) {
                Ok(handle) => self.processor.process(&*handle, page_number),
                Err(e) => {
                    log::warn!("page {}: cannot access page: {}", page_number, e);
                    Page::empty(page_number)
                }
            };
            log::debug!(
                "page {}: {} text blocks, {} tables",
                page_number,
                page.text_block_count(),
                page.table_count()
            );
            summary.record(&page);
            pages.push(page);
        }

        DocumentStructure { pages, summary }
    }
}
