//! Multi-document extraction.
//!
//! Each document is extracted on its own rayon worker with its own engine
//! handle. Failures are recorded per file and never abort the batch.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::layout::LayoutOptions;
use crate::model::DocumentStructure;

/// Outcome status of one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchStatus {
    /// Structure extracted
    Success,
    /// Extraction failed before any page was processed
    Failed,
}

/// Result of extracting one file of a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchOutcome {
    /// File name (final path component)
    pub file: String,
    /// Outcome status
    pub status: BatchStatus,
    /// Extracted structure on success
    pub data: Option<DocumentStructure>,
    /// Error message on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Full input path
    #[serde(skip)]
    pub path: PathBuf,
}

impl BatchOutcome {
    fn new(path: &Path, result: crate::Result<DocumentStructure>) -> Self {
        let file = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        match result {
            Ok(data) => Self {
                file,
                status: BatchStatus::Success,
                data: Some(data),
                error: None,
                path: path.to_path_buf(),
            },
            Err(e) => Self {
                file,
                status: BatchStatus::Failed,
                data: None,
                error: Some(e.to_string()),
                path: path.to_path_buf(),
            },
        }
    }

    /// Check if the file was extracted.
    pub fn is_success(&self) -> bool {
        self.status == BatchStatus::Success
    }
}

/// Outcomes of a batch, in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Number of files attempted
    pub total: usize,
    /// Number of files extracted
    pub succeeded: usize,
    /// Number of files that failed
    pub failed: usize,
    /// Per-file outcomes
    pub results: Vec<BatchOutcome>,
}

impl BatchReport {
    fn from_outcomes(results: Vec<BatchOutcome>) -> Self {
        let succeeded = results.iter().filter(|r| r.is_success()).count();
        Self {
            total: results.len(),
            succeeded,
            failed: results.len() - succeeded,
            results,
        }
    }

    /// Outcomes that failed.
    pub fn failures(&self) -> impl Iterator<Item = &BatchOutcome> {
        self.results.iter().filter(|r| !r.is_success())
    }
}

/// Extract every file in parallel.
pub fn extract_batch<P>(paths: &[P], options: &LayoutOptions) -> BatchReport
where
    P: AsRef<Path> + Sync,
{
    extract_batch_with_progress(paths, options, |_| {})
}

/// Extract every file in parallel, calling `on_done` as each file finishes.
pub fn extract_batch_with_progress<P, F>(
    paths: &[P],
    options: &LayoutOptions,
    on_done: F,
) -> BatchReport
where
    P: AsRef<Path> + Sync,
    F: Fn(&BatchOutcome) + Sync,
{
    log::info!("Extracting {} documents", paths.len());

    let results: Vec<BatchOutcome> = paths
        .par_iter()
        .map(|path| {
            let path = path.as_ref();
            let outcome =
                BatchOutcome::new(path, crate::extract_structure_with_options(path, options));
            if let Some(err) = &outcome.error {
                log::warn!("{}: {}", path.display(), err);
            }
            on_done(&outcome);
            outcome
        })
        .collect();

    let report = BatchReport::from_outcomes(results);
    log::info!(
        "Batch finished: {} succeeded, {} failed",
        report.succeeded,
        report.failed
    );
    report
}
