//! Axis-aligned bounding boxes in page coordinates.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle `[x0, y0, x1, y1]` in page coordinate units.
///
/// Coordinates are top-down: `y0` is the top edge. `x1 >= x0` and `y1 >= y0`
/// are not enforced on construction, but every box produced by
/// [`BoundingBox::merge`] satisfies them.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct BoundingBox {
    /// Left edge
    pub x0: f32,
    /// Top edge
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Bottom edge
    pub y1: f32,
}

impl BoundingBox {
    /// Create a box from its four edges.
    pub const fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Smallest box enclosing every input box.
    ///
    /// Returns the all-zero box when `boxes` is empty; callers should not
    /// treat that as a meaningful region.
    pub fn merge<'a, I>(boxes: I) -> Self
    where
        I: IntoIterator<Item = &'a BoundingBox>,
    {
        boxes
            .into_iter()
            .fold(None, |acc: Option<BoundingBox>, b| {
                let b = b.normalized();
                Some(match acc {
                    None => b,
                    Some(m) => m.union(&b),
                })
            })
            .unwrap_or_default()
    }

    /// Smallest box enclosing `self` and `other`.
    pub fn union(&self, other: &BoundingBox) -> Self {
        Self {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// Same region with edges swapped where inverted.
    pub fn normalized(&self) -> Self {
        Self {
            x0: self.x0.min(self.x1),
            y0: self.y0.min(self.y1),
            x1: self.x0.max(self.x1),
            y1: self.y0.max(self.y1),
        }
    }

    /// Whether `other` lies entirely inside `self` (edges inclusive).
    pub fn contains(&self, other: &BoundingBox) -> bool {
        other.x0 >= self.x0 && other.y0 >= self.y0 && other.x1 <= self.x1 && other.y1 <= self.y1
    }

    /// Whether the point lies inside `self` (edges inclusive).
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.x0 && x <= self.x1 && y >= self.y0 && y <= self.y1
    }

    /// Sort key for top-to-bottom ordering.
    pub fn vertical_position(&self) -> f32 {
        self.y0
    }

    /// Height of the box.
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// Edges as an array.
    pub fn to_array(self) -> [f32; 4] {
        [self.x0, self.y0, self.x1, self.y1]
    }
}

/// Total order on coordinates with `-0.0` and `0.0` treated as equal.
pub(crate) fn cmp_coord(a: f32, b: f32) -> Ordering {
    (a + 0.0).total_cmp(&(b + 0.0))
}

impl From<[f32; 4]> for BoundingBox {
    fn from([x0, y0, x1, y1]: [f32; 4]) -> Self {
        Self::new(x0, y0, x1, y1)
    }
}

impl From<BoundingBox> for [f32; 4] {
    fn from(b: BoundingBox) -> Self {
        b.to_array()
    }
}
