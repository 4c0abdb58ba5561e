//! Heuristic table detection from text positions.
//!
//! A row cluster holding several horizontally separated lines is read as a
//! table row. Consecutive table rows that stay within a vertical gap of one
//! another form one table; a run with too few rows is discarded.

use crate::backend::RawLine;
use crate::model::{cmp_coord, BoundingBox};

use super::options::LayoutOptions;
use super::rows::{RowCluster, RowClusterer};

/// A table found by the heuristic detector.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedTable {
    /// Cell texts, one vector per row, left to right. Rows are not padded.
    pub rows: Vec<Vec<String>>,
    /// Box enclosing every row
    pub bbox: BoundingBox,
}

/// A row cluster admitted as table evidence.
#[derive(Debug, Clone)]
pub struct TableRowData {
    /// Row key
    pub y: f32,
    /// Cell texts, left to right
    pub cells: Vec<String>,
    /// Box enclosing the row's cells
    pub bbox: BoundingBox,
}

impl TableRowData {
    fn from_cluster(mut cluster: RowCluster) -> Self {
        cluster.sort_cells();
        Self {
            y: cluster.y,
            bbox: cluster.bbox(),
            cells: cluster.texts(),
        }
    }
}

/// Table detector configuration.
#[derive(Debug, Clone)]
pub struct TableDetectorConfig {
    /// Vertical tolerance for grouping lines into rows
    pub row_tolerance: f32,
    /// Largest vertical distance between consecutive rows of one table
    pub max_row_gap: f32,
    /// Minimum number of rows to consider as table
    pub min_rows: usize,
    /// Minimum number of cells for a row to count
    pub min_row_cells: usize,
}

impl Default for TableDetectorConfig {
    fn default() -> Self {
        Self::from(&LayoutOptions::default())
    }
}

impl From<&LayoutOptions> for TableDetectorConfig {
    fn from(options: &LayoutOptions) -> Self {
        Self {
            row_tolerance: options.row_tolerance,
            max_row_gap: options.max_row_gap,
            min_rows: options.min_table_rows,
            min_row_cells: options.min_row_cells,
        }
    }
}

/// Detects tables in a page's span lines.
#[derive(Debug, Clone, Default)]
pub struct HeuristicTableDetector {
    config: TableDetectorConfig,
}

impl HeuristicTableDetector {
    /// Create a new table detector with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new table detector with custom configuration.
    pub fn with_config(config: TableDetectorConfig) -> Self {
        Self { config }
    }

    /// Detect tables in the given lines.
    pub fn detect(&self, lines: &[RawLine]) -> Vec<DetectedTable> {
        log::debug!("TableDetector: starting with {} lines", lines.len());

        let clusters = RowClusterer::new(self.config.row_tolerance).cluster(lines);
        log::debug!("TableDetector: grouped into {} rows", clusters.len());

        let rows = self.admit_rows(clusters);
        log::debug!("TableDetector: {} rows with enough cells", rows.len());

        if rows.len() < self.config.min_rows {
            log::debug!(
                "TableDetector: not enough rows ({} < {})",
                rows.len(),
                self.config.min_rows
            );
            return Vec::new();
        }

        let tables = self.group_rows(rows);
        log::debug!("TableDetector: found {} tables", tables.len());
        tables
    }

    /// Keep multi-cell rows, ordered top to bottom.
    fn admit_rows(&self, clusters: Vec<RowCluster>) -> Vec<TableRowData> {
        let mut rows: Vec<TableRowData> = clusters
            .into_iter()
            .filter(|c| c.cells.len() >= self.config.min_row_cells)
            .map(TableRowData::from_cluster)
            .collect();
        rows.sort_by(|a, b| cmp_coord(a.y, b.y));
        rows
    }

    /// Sweep rows into runs separated by large vertical gaps.
    fn group_rows(&self, rows: Vec<TableRowData>) -> Vec<DetectedTable> {
        let mut tables = Vec::new();
        let mut current: Vec<TableRowData> = Vec::new();

        for row in rows {
            if let Some(last) = current.last() {
                if (row.y - last.y).abs() > self.config.max_row_gap {
                    self.close_run(std::mem::take(&mut current), &mut tables);
                }
            }
            current.push(row);
        }
        self.close_run(current, &mut tables);

        tables
    }

    fn close_run(&self, run: Vec<TableRowData>, tables: &mut Vec<DetectedTable>) {
        if run.len() < self.config.min_rows {
            return;
        }
        let bbox = BoundingBox::merge(run.iter().map(|r| &r.bbox));
        tables.push(DetectedTable {
            rows: run.into_iter().map(|r| r.cells).collect(),
            bbox,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::RawSpan;

    fn cell(text: &str, x: f32, y: f32) -> RawLine {
        RawLine::new(vec![RawSpan::new(
            BoundingBox::new(x, y, x + 30.0, y + 10.0),
            text,
        )])
    }

    #[test]
    fn test_two_aligned_rows_make_one_table() {
        let lines = vec![
            cell("B", 100.0, 50.0),
            cell("A", 10.0, 50.0),
            cell("C", 10.0, 70.0),
            cell("D", 100.0, 70.0),
        ];
        let tables = HeuristicTableDetector::new().detect(&lines);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].rows, vec![vec!["A", "B"], vec!["C", "D"]]);
        assert_eq!(tables[0].bbox, BoundingBox::new(10.0, 50.0, 130.0, 80.0));
    }

    #[test]
    fn test_scenario_close_rows_collapse() {
        // 50, 55 and 53 all fall into the row keyed at 50.
        let lines = vec![
            cell("A", 10.0, 50.0),
            cell("B", 100.0, 50.0),
            cell("C", 10.0, 55.0),
            cell("D", 100.0, 55.0),
            cell("E", 200.0, 53.0),
        ];
        let clusters = RowClusterer::default().cluster(&lines);
        assert!(clusters.len() <= 2);

        // A single multi-cell row is not a table.
        assert!(HeuristicTableDetector::new().detect(&lines).is_empty());
    }

    #[test]
    fn test_distant_rows_do_not_form_tables() {
        let lines = vec![
            cell("A", 10.0, 10.0),
            cell("B", 100.0, 10.0),
            cell("C", 10.0, 500.0),
            cell("D", 100.0, 500.0),
        ];
        assert!(HeuristicTableDetector::new().detect(&lines).is_empty());
    }

    #[test]
    fn test_single_cell_rows_are_ignored() {
        let lines = vec![
            cell("Heading", 10.0, 10.0),
            cell("A", 10.0, 30.0),
            cell("B", 100.0, 30.0),
            cell("lone", 10.0, 45.0),
            cell("C", 10.0, 60.0),
            cell("D", 100.0, 60.0),
        ];
        let tables = HeuristicTableDetector::new().detect(&lines);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].rows, vec![vec!["A", "B"], vec!["C", "D"]]);
    }

    #[test]
    fn test_gap_splits_tables_and_keeps_ragged_rows() {
        let lines = vec![
            cell("a1", 10.0, 10.0),
            cell("a2", 100.0, 10.0),
            cell("b1", 10.0, 60.0),
            cell("b2", 100.0, 60.0),
            cell("b3", 200.0, 60.0),
            // 61 units below the previous row
            cell("c1", 10.0, 121.0),
            cell("c2", 100.0, 121.0),
            cell("d1", 10.0, 140.0),
            cell("d2", 100.0, 140.0),
        ];
        let tables = HeuristicTableDetector::new().detect(&lines);
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].rows, vec![vec!["a1", "a2"], vec!["b1", "b2", "b3"]]);
        assert_eq!(tables[1].rows, vec![vec!["c1", "c2"], vec!["d1", "d2"]]);
    }

    #[test]
    fn test_custom_config() {
        let lines = vec![
            cell("A", 10.0, 10.0),
            cell("B", 100.0, 10.0),
            cell("C", 10.0, 100.0),
            cell("D", 100.0, 100.0),
        ];
        let config = TableDetectorConfig::from(&LayoutOptions::new().with_max_row_gap(100.0));
        let tables = HeuristicTableDetector::with_config(config).detect(&lines);
        assert_eq!(tables.len(), 1);
    }
}
