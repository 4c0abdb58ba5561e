//! Row clustering.
//!
//! Groups span lines into horizontal rows. A line joins the first existing
//! row whose key lies within the tolerance of the line's average span top;
//! otherwise it opens a new row keyed at that average. Rows keep their
//! creation order and are never rebalanced.

use crate::backend::RawLine;
use crate::model::{cmp_coord, BoundingBox};

/// One line's contribution to a row.
#[derive(Debug, Clone, PartialEq)]
pub struct RowCell {
    /// Trimmed line text
    pub text: String,
    /// Line bounding box
    pub bbox: BoundingBox,
    /// Left edge, used to order cells
    pub x: f32,
}

/// Lines sharing an approximate vertical position.
#[derive(Debug, Clone, PartialEq)]
pub struct RowCluster {
    /// Row key: the average span top of the line that opened the row
    pub y: f32,
    /// Cells in insertion order
    pub cells: Vec<RowCell>,
}

impl RowCluster {
    fn new(y: f32) -> Self {
        Self {
            y,
            cells: Vec::new(),
        }
    }

    /// Sort cells left to right. Ties keep insertion order.
    pub fn sort_cells(&mut self) {
        self.cells.sort_by(|a, b| cmp_coord(a.x, b.x));
    }

    /// Box enclosing every cell.
    pub fn bbox(&self) -> BoundingBox {
        BoundingBox::merge(self.cells.iter().map(|c| &c.bbox))
    }

    /// Cell texts in current order.
    pub fn texts(&self) -> Vec<String> {
        self.cells.iter().map(|c| c.text.clone()).collect()
    }
}

/// Clusters lines into rows under a vertical tolerance.
#[derive(Debug, Clone, Copy)]
pub struct RowClusterer {
    tolerance: f32,
}

impl RowClusterer {
    /// Create a clusterer with the given tolerance.
    pub fn new(tolerance: f32) -> Self {
        Self { tolerance }
    }

    /// Cluster lines, in input order.
    ///
    /// Lines without spans are skipped. A line whose text is blank still
    /// opens (or matches) a row but contributes no cell.
    pub fn cluster(&self, lines: &[RawLine]) -> Vec<RowCluster> {
        let mut rows: Vec<RowCluster> = Vec::new();

        for line in lines {
            let Some(avg_y) = average_top(line) else {
                continue;
            };

            let index = match rows
                .iter()
                .position(|row| (row.y - avg_y).abs() <= self.tolerance)
            {
                Some(index) => index,
                None => {
                    rows.push(RowCluster::new(avg_y));
                    rows.len() - 1
                }
            };

            let text = line.text();
            let text = text.trim();
            if !text.is_empty() {
                let bbox = line.bbox();
                rows[index].cells.push(RowCell {
                    text: text.to_string(),
                    bbox,
                    x: bbox.x0,
                });
            }
        }

        rows
    }
}

impl Default for RowClusterer {
    fn default() -> Self {
        Self::new(5.0)
    }
}

fn average_top(line: &RawLine) -> Option<f32> {
    if line.spans.is_empty() {
        return None;
    }
    let sum: f32 = line.spans.iter().map(|s| s.bbox.y0).sum();
    Some(sum / line.spans.len() as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::RawSpan;

    fn line(text: &str, x: f32, y: f32) -> RawLine {
        RawLine::new(vec![RawSpan::new(
            BoundingBox::new(x, y, x + 40.0, y + 10.0),
            text,
        )])
    }

    #[test]
    fn test_groups_within_tolerance() {
        let rows = RowClusterer::default().cluster(&[
            line("A", 10.0, 50.0),
            line("B", 100.0, 55.0),
            line("C", 10.0, 80.0),
        ]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].y, 50.0);
        assert_eq!(rows[0].texts(), vec!["A", "B"]);
        assert_eq!(rows[1].y, 80.0);
        assert_eq!(rows[1].texts(), vec!["C"]);
    }

    #[test]
    fn test_first_match_wins() {
        // 53 is within tolerance of both 50 and 56; the older row wins.
        let rows = RowClusterer::default().cluster(&[
            line("A", 10.0, 50.0),
            line("B", 10.0, 56.0),
            line("C", 10.0, 53.0),
        ]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].texts(), vec!["A", "C"]);
        assert_eq!(rows[1].texts(), vec!["B"]);
    }

    #[test]
    fn test_average_over_spans() {
        let two_spans = RawLine::new(vec![
            RawSpan::new(BoundingBox::new(10.0, 40.0, 30.0, 50.0), "x"),
            RawSpan::new(BoundingBox::new(40.0, 60.0, 60.0, 70.0), "y"),
        ]);
        let rows = RowClusterer::default().cluster(&[two_spans]);
        assert_eq!(rows[0].y, 50.0);
        assert_eq!(rows[0].cells[0].text, "x y");
        assert_eq!(rows[0].cells[0].bbox, BoundingBox::new(10.0, 40.0, 60.0, 70.0));
        assert_eq!(rows[0].cells[0].x, 10.0);
    }

    #[test]
    fn test_blank_lines_open_rows_without_cells() {
        let rows = RowClusterer::default().cluster(&[
            line("   ", 10.0, 100.0),
            RawLine::default(),
            line("late", 10.0, 102.0),
        ]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].y, 100.0);
        assert_eq!(rows[0].texts(), vec!["late"]);
    }

    #[test]
    fn test_sort_cells_left_to_right() {
        let mut rows = RowClusterer::default().cluster(&[
            line("right", 200.0, 10.0),
            line("left", 10.0, 10.0),
        ]);
        rows[0].sort_cells();
        assert_eq!(rows[0].texts(), vec!["left", "right"]);
        assert_eq!(rows[0].bbox(), BoundingBox::new(10.0, 10.0, 240.0, 20.0));
    }

    #[test]
    fn test_sort_cells_signed_zero_is_a_tie() {
        let mut rows = RowClusterer::default().cluster(&[
            line("first", 0.0, 10.0),
            line("second", -0.0, 10.0),
        ]);
        rows[0].sort_cells();
        assert_eq!(rows[0].texts(), vec!["first", "second"]);
    }
}
