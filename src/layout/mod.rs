//! Layout inference.
//!
//! Turns the raw geometry of a [`DocumentSource`](crate::backend::DocumentSource)
//! into ordered text and table elements:
//!
//! - [`extract_text_blocks`]: trimmed, non-empty text blocks
//! - [`RowClusterer`]: lines grouped into rows by vertical position
//! - [`HeuristicTableDetector`]: multi-cell rows grouped into tables
//! - [`DetectorChain`]: native detection with heuristic fallback
//! - [`PageProcessor`]: one page, merged and ordered top to bottom
//! - [`DocumentAssembler`]: every page plus summary counts

mod assembler;
mod detector;
mod options;
mod page;
mod rows;
mod table_detector;
mod text;

pub use assembler::DocumentAssembler;
pub use detector::{Detector, DetectorChain, DetectorKind};
pub use options::LayoutOptions;
pub use page::{order_elements, PageProcessor, PageStage};
pub use rows::{RowCell, RowCluster, RowClusterer};
pub use table_detector::{DetectedTable, HeuristicTableDetector, TableDetectorConfig, TableRowData};
pub use text::{extract_text_blocks, TextBlock};
