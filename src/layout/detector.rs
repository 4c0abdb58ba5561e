//! Table detector chain.
//!
//! Detectors are tried in order. The first one that produces at least one
//! table wins. A detector that is unavailable, finds nothing or fails hands
//! over to the next; when the chain runs out the page has no tables.

use std::fmt;

use crate::backend::{PageSource, RawTable};
use crate::error::Result;

use super::options::LayoutOptions;
use super::table_detector::{DetectedTable, HeuristicTableDetector, TableDetectorConfig};

/// Which strategy a [`Detector`] uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorKind {
    /// The document engine's own table finder
    Native,
    /// Row clustering over span lines
    Heuristic,
}

impl fmt::Display for DetectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectorKind::Native => write!(f, "native"),
            DetectorKind::Heuristic => write!(f, "heuristic"),
        }
    }
}

/// A table detection strategy.
#[derive(Debug, Clone)]
pub enum Detector {
    /// Ask the page for natively detected tables.
    Native,
    /// Cluster the page's span lines.
    Heuristic(HeuristicTableDetector),
}

impl Detector {
    /// Strategy of this detector.
    pub fn kind(&self) -> DetectorKind {
        match self {
            Detector::Native => DetectorKind::Native,
            Detector::Heuristic(_) => DetectorKind::Heuristic,
        }
    }

    /// Run the detector on one page.
    ///
    /// `Ok(None)` means the capability is absent for this page.
    pub fn detect(&self, page: &dyn PageSource) -> Result<Option<Vec<DetectedTable>>> {
        match self {
            Detector::Native => match page.find_tables() {
                None => Ok(None),
                Some(found) => Ok(Some(found?.into_iter().filter_map(from_native).collect())),
            },
            Detector::Heuristic(detector) => {
                let lines = page.text_lines()?;
                Ok(Some(detector.detect(&lines)))
            }
        }
    }
}

/// Native tables without any row are dropped.
fn from_native(table: RawTable) -> Option<DetectedTable> {
    if table.rows.is_empty() {
        return None;
    }
    Some(DetectedTable {
        rows: table.rows,
        bbox: table.bbox,
    })
}

/// Ordered list of detectors tried per page.
#[derive(Debug, Clone)]
pub struct DetectorChain {
    detectors: Vec<Detector>,
}

impl DetectorChain {
    /// Create a chain from explicit detectors.
    pub fn new(detectors: Vec<Detector>) -> Self {
        Self { detectors }
    }

    /// Native detection (if enabled) followed by the heuristic fallback.
    pub fn from_options(options: &LayoutOptions) -> Self {
        let mut detectors = Vec::with_capacity(2);
        if options.native_detection {
            detectors.push(Detector::Native);
        }
        detectors.push(Detector::Heuristic(HeuristicTableDetector::with_config(
            TableDetectorConfig::from(options),
        )));
        Self::new(detectors)
    }

    /// Detectors in the order they are tried.
    pub fn detectors(&self) -> &[Detector] {
        &self.detectors
    }

    /// Find tables on one page. Never fails.
    pub fn run(&self, page: &dyn PageSource, page_number: u32) -> Vec<DetectedTable> {
        for detector in &self.detectors {
            let kind = detector.kind();
            match detector.detect(page) {
                Ok(Some(tables)) if !tables.is_empty() => {
                    log::debug!(
                        "page {}: {} detector found {} tables",
                        page_number,
                        kind,
                        tables.len()
                    );
                    return tables;
                }
                Ok(Some(_)) => {
                    log::debug!("page {}: {} detector found no tables", page_number, kind);
                }
                Ok(None) => {
                    log::debug!("page {}: {} detector unavailable", page_number, kind);
                }
                Err(e) if kind == DetectorKind::Native => {
                    log::debug!("page {}: native detector failed: {}", page_number, e);
                }
                Err(e) => {
                    log::warn!("page {}: {} table detection failed: {}", page_number, kind, e);
                }
            }
        }
        Vec::new()
    }
}

impl Default for DetectorChain {
    fn default() -> Self {
        Self::from_options(&LayoutOptions::default())
    }
}
