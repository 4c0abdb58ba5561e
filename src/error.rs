//! Error types for pdfstruct.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pdfstruct operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during layout extraction.
///
/// Only [`Error::NotFound`], [`Error::InvalidDocument`], [`Error::Config`] and
/// [`Error::Render`] ever reach a caller of the extraction API. Page-scoped
/// failures are recovered inside the engine.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input path does not exist.
    #[error("PDF file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The input could not be opened or parsed as a PDF document.
    #[error("Cannot open PDF file: {0}")]
    InvalidDocument(String),

    /// The bytes do not start with a PDF header.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF header carries a malformed version.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Page index is out of range.
    #[error("Page index {0} is out of range (document has {1} pages)")]
    PageOutOfRange(usize, usize),

    /// Text or geometry extraction failed for a single page.
    #[error("Extraction failed on page {page}: {reason}")]
    PageExtraction {
        /// 1-indexed page number
        page: u32,
        /// Failure description
        reason: String,
    },

    /// A native table finder raised.
    #[error("Table detection error: {0}")]
    TableDetection(String),

    /// Error during rendering (JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Invalid layout configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a page extraction error.
    pub fn page(page: u32, reason: impl Into<String>) -> Self {
        Error::PageExtraction {
            page,
            reason: reason.into(),
        }
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        Error::InvalidDocument(err.to_string())
    }
}
