//! In-memory document engine.
//!
//! Lets callers feed geometry produced by some other engine (OCR, a
//! different PDF library, a cached extraction) through the layout engine,
//! including native tables and scripted failures.

use crate::error::{Error, Result};

use super::{DocumentSource, PageSource, RawLine, RawTable, RawTextBlock};

/// Behaviour of the native table finder for a [`MemoryPage`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum NativeTables {
    /// The engine has no table finder.
    #[default]
    Unsupported,
    /// The finder returns these tables.
    Found(Vec<RawTable>),
    /// The finder raises with this message.
    Fails(String),
}

/// Geometry for one page.
#[derive(Debug, Clone, Default)]
pub struct MemoryPage {
    blocks: Vec<RawTextBlock>,
    lines: Vec<RawLine>,
    native: NativeTables,
    text_failure: Option<String>,
    lines_failure: Option<String>,
}

impl MemoryPage {
    /// Create an empty page.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text block.
    pub fn with_block(mut self, block: RawTextBlock) -> Self {
        self.blocks.push(block);
        self
    }

    /// Add text blocks.
    pub fn with_blocks(mut self, blocks: impl IntoIterator<Item = RawTextBlock>) -> Self {
        self.blocks.extend(blocks);
        self
    }

    /// Add a span line.
    pub fn with_line(mut self, line: RawLine) -> Self {
        self.lines.push(line);
        self
    }

    /// Add span lines.
    pub fn with_lines(mut self, lines: impl IntoIterator<Item = RawLine>) -> Self {
        self.lines.extend(lines);
        self
    }

    /// Report these tables from the native finder.
    pub fn with_native_tables(mut self, tables: Vec<RawTable>) -> Self {
        self.native = NativeTables::Found(tables);
        self
    }

    /// Make the native finder raise.
    pub fn with_native_failure(mut self, reason: impl Into<String>) -> Self {
        self.native = NativeTables::Fails(reason.into());
        self
    }

    /// Make block extraction raise.
    pub fn with_text_failure(mut self, reason: impl Into<String>) -> Self {
        self.text_failure = Some(reason.into());
        self
    }

    /// Make line extraction raise.
    pub fn with_lines_failure(mut self, reason: impl Into<String>) -> Self {
        self.lines_failure = Some(reason.into());
        self
    }
}

/// A document made of [`MemoryPage`]s.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    pages: Vec<MemoryPage>,
    closed: bool,
}

impl MemoryDocument {
    /// Create a document from pages.
    pub fn new(pages: Vec<MemoryPage>) -> Self {
        Self {
            pages,
            closed: false,
        }
    }

    /// Append a page.
    pub fn with_page(mut self, page: MemoryPage) -> Self {
        self.pages.push(page);
        self
    }

    /// Whether [`DocumentSource::close`] has run.
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl DocumentSource for MemoryDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page(&self, index: usize) -> Result<Box<dyn PageSource + '_>> {
        if self.closed {
            return Err(Error::InvalidDocument("document is closed".to_string()));
        }
        let page = self
            .pages
            .get(index)
            .ok_or(Error::PageOutOfRange(index, self.pages.len()))?;
        Ok(Box::new(MemoryPageView {
            page,
            number: index as u32 + 1,
        }))
    }

    fn close(&mut self) {
        self.closed = true;
    }
}

struct MemoryPageView<'a> {
    page: &'a MemoryPage,
    number: u32,
}

impl PageSource for MemoryPageView<'_> {
    fn text_blocks(&self) -> Result<Vec<RawTextBlock>> {
        match &self.page.text_failure {
            Some(reason) => Err(Error::page(self.number, reason.clone())),
            None => Ok(self.page.blocks.clone()),
        }
    }

    fn text_lines(&self) -> Result<Vec<RawLine>> {
        match &self.page.lines_failure {
            Some(reason) => Err(Error::page(self.number, reason.clone())),
            None => Ok(self.page.lines.clone()),
        }
    }

    fn find_tables(&self) -> Option<Result<Vec<RawTable>>> {
        match &self.page.native {
            NativeTables::Unsupported => None,
            NativeTables::Found(tables) => Some(Ok(tables.clone())),
            NativeTables::Fails(reason) => Some(Err(Error::TableDetection(reason.clone()))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::RawSpan;
    use crate::model::BoundingBox;

    #[test]
    fn test_page_access() {
        let doc = MemoryDocument::new(vec![MemoryPage::new().with_block(RawTextBlock::new(
            BoundingBox::new(0.0, 0.0, 10.0, 10.0),
            "hi",
        ))]);
        assert_eq!(doc.page_count(), 1);
        let page = doc.page(0).unwrap();
        assert_eq!(page.text_blocks().unwrap().len(), 1);
        assert!(page.find_tables().is_none());
        assert!(matches!(doc.page(1), Err(Error::PageOutOfRange(1, 1))));
    }

    #[test]
    fn test_lines_keep_insertion_order() {
        let span = |text: &str, y: f32| {
            RawLine::new(vec![RawSpan::new(
                BoundingBox::new(10.0, y, 50.0, y + 10.0),
                text,
            )])
        };
        let doc = MemoryDocument::new(vec![MemoryPage::new()
            .with_line(span("one", 30.0))
            .with_lines([span("two", 10.0), span("three", 20.0)])]);
        let lines = doc.page(0).unwrap().text_lines().unwrap();
        let texts: Vec<String> = lines.iter().map(|l| l.text()).collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_scripted_failures() {
        let doc = MemoryDocument::default().with_page(
            MemoryPage::new()
                .with_text_failure("no text layer")
                .with_native_failure("finder crashed"),
        );
        let page = doc.page(0).unwrap();
        assert!(matches!(
            page.text_blocks(),
            Err(Error::PageExtraction { page: 1, .. })
        ));
        assert!(matches!(
            page.find_tables(),
            Some(Err(Error::TableDetection(_)))
        ));
    }

    #[test]
    fn test_closed_document_refuses_pages() {
        let mut doc = MemoryDocument::new(vec![MemoryPage::new()]);
        doc.close();
        assert!(doc.is_closed());
        assert!(doc.page(0).is_err());
    }
}
