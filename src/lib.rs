//! # pdfstruct
//!
//! Layout inference for PDF documents.
//!
//! This library reconstructs the structure of each page as an ordered list of
//! text blocks and tables with bounding boxes, plus document-level counts.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfstruct::{extract_structure, render, JsonFormat};
//!
//! fn main() -> pdfstruct::Result<()> {
//!     let structure = extract_structure("document.pdf")?;
//!     println!("{} tables", structure.summary.total_tables);
//!
//!     let json = render::to_json(&structure, JsonFormat::Pretty)?;
//!     println!("{}", json);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Native and heuristic table detection**: engines with a table finder
//!   are asked first; otherwise rows of aligned text are clustered into tables
//! - **Deterministic ordering**: elements are stably sorted top to bottom
//! - **Graceful degradation**: a broken page yields an empty element list,
//!   never a failed document
//! - **Pluggable engines**: anything implementing [`DocumentSource`] can be
//!   analysed; [`LopdfDocument`] and [`MemoryDocument`] ship with the crate
//! - **Batch processing**: many documents in parallel via Rayon

pub mod backend;
pub mod batch;
pub mod detect;
pub mod error;
pub mod layout;
pub mod model;
pub mod render;

// Re-export commonly used types
pub use backend::{
    DocumentGuard, DocumentSource, LopdfDocument, MemoryDocument, MemoryPage, PageSource,
    RawLine, RawSpan, RawTable, RawTextBlock,
};
pub use batch::{extract_batch, BatchOutcome, BatchReport, BatchStatus};
pub use detect::{detect_format_from_bytes, detect_format_from_path, is_pdf, PdfFormat};
pub use error::{Error, Result};
pub use layout::{DocumentAssembler, LayoutOptions};
pub use model::{
    BoundingBox, DocumentStructure, Element, ElementContent, ElementKind, Page, Summary,
};
pub use render::JsonFormat;

use std::path::Path;

/// Extract the layout structure of a PDF file.
///
/// # Errors
///
/// Fails with [`Error::NotFound`] if the path does not exist and with
/// [`Error::InvalidDocument`] if the file cannot be opened as a PDF. Failures
/// inside individual pages are logged and leave those pages empty.
///
/// # Example
///
/// ```no_run
/// use pdfstruct::extract_structure;
///
/// let structure = extract_structure("document.pdf").unwrap();
/// for page in &structure.pages {
///     println!("page {}: {} elements", page.page_number, page.elements.len());
/// }
/// ```
pub fn extract_structure<P: AsRef<Path>>(path: P) -> Result<DocumentStructure> {
    extract_structure_with_options(path, &LayoutOptions::default())
}

/// Extract the layout structure of a PDF file with custom options.
///
/// # Example
///
/// ```no_run
/// use pdfstruct::{extract_structure_with_options, LayoutOptions};
///
/// let options = LayoutOptions::new().with_max_row_gap(30.0);
/// let structure = extract_structure_with_options("document.pdf", &options).unwrap();
/// ```
pub fn extract_structure_with_options<P: AsRef<Path>>(
    path: P,
    options: &LayoutOptions,
) -> Result<DocumentStructure> {
    options.validate()?;
    let document = LopdfDocument::open(path)?;
    Ok(DocumentAssembler::from_options(options).extract(document))
}

/// Extract the layout structure of a PDF held in memory.
///
/// # Example
///
/// ```no_run
/// use pdfstruct::extract_structure_from_bytes;
///
/// let data = std::fs::read("document.pdf").unwrap();
/// let structure = extract_structure_from_bytes(&data).unwrap();
/// ```
pub fn extract_structure_from_bytes(data: &[u8]) -> Result<DocumentStructure> {
    extract_structure_from_bytes_with_options(data, &LayoutOptions::default())
}

/// Extract the layout structure of an in-memory PDF with custom options.
pub fn extract_structure_from_bytes_with_options(
    data: &[u8],
    options: &LayoutOptions,
) -> Result<DocumentStructure> {
    options.validate()?;
    let document = LopdfDocument::from_bytes(data)?;
    Ok(DocumentAssembler::from_options(options).extract(document))
}

/// Extract the layout structure from any document engine.
///
/// The source is closed before this returns.
///
/// # Example
///
/// ```
/// use pdfstruct::{extract_from_source, BoundingBox, LayoutOptions, MemoryDocument, MemoryPage, RawTextBlock};
///
/// let doc = MemoryDocument::new(vec![MemoryPage::new()
///     .with_block(RawTextBlock::new(BoundingBox::new(72.0, 90.0, 300.0, 104.0), "Speeds and feeds"))]);
/// let structure = extract_from_source(doc, &LayoutOptions::default()).unwrap();
/// assert_eq!(structure.summary.total_text_blocks, 1);
/// ```
pub fn extract_from_source<D: DocumentSource>(
    source: D,
    options: &LayoutOptions,
) -> Result<DocumentStructure> {
    options.validate()?;
    Ok(DocumentAssembler::from_options(options).extract(source))
}

/// Extract the layout structure of a PDF file on a blocking worker thread.
///
/// The path is checked before any work is scheduled.
#[cfg(feature = "async")]
pub async fn extract_structure_async<P: AsRef<Path>>(path: P) -> Result<DocumentStructure> {
    extract_structure_async_with_options(path, LayoutOptions::default()).await
}

/// Async variant of [`extract_structure_with_options`].
#[cfg(feature = "async")]
pub async fn extract_structure_async_with_options<P: AsRef<Path>>(
    path: P,
    options: LayoutOptions,
) -> Result<DocumentStructure> {
    let path = path.as_ref().to_path_buf();
    if !path.exists() {
        return Err(Error::NotFound(path));
    }
    if !path.is_file() {
        return Err(Error::InvalidDocument(format!(
            "path is not a file: {}",
            path.display()
        )));
    }

    tokio::task::spawn_blocking(move || extract_structure_with_options(&path, &options))
        .await
        .map_err(|e| Error::Other(format!("extraction worker failed: {}", e)))?
}

/// Builder for extracting and rendering document structure.
///
/// # Example
///
/// ```no_run
/// use pdfstruct::StructureExtractor;
///
/// let json = StructureExtractor::new()
///     .with_row_tolerance(4.0)
///     .heuristic_only()
///     .extract("document.pdf")?
///     .to_json_compact()?;
/// # Ok::<(), pdfstruct::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct StructureExtractor {
    options: LayoutOptions,
}

impl StructureExtractor {
    /// Create a new extractor with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an extractor from existing options.
    pub fn with_options(options: LayoutOptions) -> Self {
        Self { options }
    }

    /// Set the row clustering tolerance.
    pub fn with_row_tolerance(mut self, tolerance: f32) -> Self {
        self.options = self.options.with_row_tolerance(tolerance);
        self
    }

    /// Set the maximum gap between table rows.
    pub fn with_max_row_gap(mut self, gap: f32) -> Self {
        self.options = self.options.with_max_row_gap(gap);
        self
    }

    /// Skip the native table finder.
    pub fn heuristic_only(mut self) -> Self {
        self.options = self.options.heuristic_only();
        self
    }

    /// Options in use.
    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Extract a PDF file.
    pub fn extract<P: AsRef<Path>>(&self, path: P) -> Result<ExtractionResult> {
        let structure = extract_structure_with_options(path, &self.options)?;
        Ok(ExtractionResult { structure })
    }

    /// Extract a PDF from bytes.
    pub fn extract_bytes(&self, data: &[u8]) -> Result<ExtractionResult> {
        let structure = extract_structure_from_bytes_with_options(data, &self.options)?;
        Ok(ExtractionResult { structure })
    }
}

/// Result of a [`StructureExtractor`] run.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    structure: DocumentStructure,
}

impl ExtractionResult {
    /// The extracted structure.
    pub fn structure(&self) -> &DocumentStructure {
        &self.structure
    }

    /// Take the extracted structure.
    pub fn into_structure(self) -> DocumentStructure {
        self.structure
    }

    /// Render as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        render::to_json(&self.structure, JsonFormat::Pretty)
    }

    /// Render as compact JSON.
    pub fn to_json_compact(&self) -> Result<String> {
        render::to_json(&self.structure, JsonFormat::Compact)
    }

    /// Concatenated text of all text elements.
    pub fn plain_text(&self) -> String {
        self.structure.plain_text()
    }
}
