//! Layout inference options and configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Options controlling table detection and element ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    /// Vertical distance within which a line joins an existing row cluster
    pub row_tolerance: f32,

    /// Largest vertical distance between consecutive rows of one table
    pub max_row_gap: f32,

    /// Rows a candidate needs before it becomes a table
    pub min_table_rows: usize,

    /// Cells a row cluster needs before it counts as table evidence
    pub min_row_cells: usize,

    /// Whether to try the engine's own table finder first
    pub native_detection: bool,
}

impl LayoutOptions {
    /// Create layout options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the row clustering tolerance.
    pub fn with_row_tolerance(mut self, tolerance: f32) -> Self {
        self.row_tolerance = tolerance;
        self
    }

    /// Set the maximum gap between consecutive table rows.
    pub fn with_max_row_gap(mut self, gap: f32) -> Self {
        self.max_row_gap = gap;
        self
    }

    /// Set the minimum number of rows per table.
    pub fn with_min_table_rows(mut self, rows: usize) -> Self {
        self.min_table_rows = rows;
        self
    }

    /// Set the minimum number of cells per table row.
    pub fn with_min_row_cells(mut self, cells: usize) -> Self {
        self.min_row_cells = cells;
        self
    }

    /// Enable or disable the native table finder.
    pub fn with_native_detection(mut self, enabled: bool) -> Self {
        self.native_detection = enabled;
        self
    }

    /// Skip the native table finder and always use the heuristic detector.
    pub fn heuristic_only(mut self) -> Self {
        self.native_detection = false;
        self
    }

    /// Load options from a JSON file. Missing fields take their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let options: Self = serde_json::from_str(&data)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        options.validate()?;
        Ok(options)
    }

    /// Check that thresholds are usable.
    pub fn validate(&self) -> Result<()> {
        check_threshold("row_tolerance", self.row_tolerance)?;
        check_threshold("max_row_gap", self.max_row_gap)?;

        if self.min_table_rows == 0 {
            return Err(Error::Config("min_table_rows must be at least 1".into()));
        }
        if self.min_row_cells == 0 {
            return Err(Error::Config("min_row_cells must be at least 1".into()));
        }
        Ok(())
    }
}

fn check_threshold(name: &str, value: f32) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::Config(format!(
            "{} must be a finite, non-negative number (got {})",
            name, value
        )));
    }
    Ok(())
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            row_tolerance: 5.0,
            max_row_gap: 50.0,
            min_table_rows: 2,
            min_row_cells: 2,
            native_detection: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = LayoutOptions::default();
        assert_eq!(opts.row_tolerance, 5.0);
        assert_eq!(opts.max_row_gap, 50.0);
        assert_eq!(opts.min_table_rows, 2);
        assert_eq!(opts.min_row_cells, 2);
        assert!(opts.native_detection);
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let opts = LayoutOptions::new()
            .with_row_tolerance(3.0)
            .with_max_row_gap(80.0)
            .with_min_table_rows(3)
            .with_min_row_cells(4)
            .heuristic_only();
        assert_eq!(opts.row_tolerance, 3.0);
        assert_eq!(opts.max_row_gap, 80.0);
        assert_eq!(opts.min_table_rows, 3);
        assert_eq!(opts.min_row_cells, 4);
        assert!(!opts.native_detection);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(LayoutOptions::new().with_row_tolerance(-1.0).validate().is_err());
        assert!(LayoutOptions::new().with_max_row_gap(f32::NAN).validate().is_err());
        assert!(LayoutOptions::new().with_min_table_rows(0).validate().is_err());
        assert!(matches!(
            LayoutOptions::new().with_min_row_cells(0).validate(),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let opts: LayoutOptions = serde_json::from_str(r#"{"max_row_gap": 25.0}"#).unwrap();
        assert_eq!(opts.max_row_gap, 25.0);
        assert_eq!(opts.row_tolerance, 5.0);
        assert!(opts.native_detection);
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.json");
        std::fs::write(&path, r#"{"row_tolerance": 2.5, "native_detection": false}"#).unwrap();

        let opts = LayoutOptions::from_file(&path).unwrap();
        assert_eq!(opts.row_tolerance, 2.5);
        assert!(!opts.native_detection);

        std::fs::write(&path, r#"{"min_table_rows": 0}"#).unwrap();
        assert!(matches!(LayoutOptions::from_file(&path), Err(Error::Config(_))));
        assert!(matches!(
            LayoutOptions::from_file(dir.path().join("missing.json")),
            Err(Error::Config(_))
        ));
    }
}
