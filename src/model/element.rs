//! Positioned page content: text blocks and tables.

use serde::{Deserialize, Serialize};

use super::BoundingBox;

/// Element type discriminator, serialized as `"text"` / `"table"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// A text block
    Text,
    /// A table
    Table,
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ElementKind::Text => f.write_str("text"),
            ElementKind::Table => f.write_str("table"),
        }
    }
}

/// Payload of an element.
///
/// Table rows keep the column count they were detected with; rows are never
/// padded to a rectangular grid.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementContent {
    /// Trimmed text of a block
    Text(String),
    /// Row-major cell texts
    Table(Vec<Vec<String>>),
}

impl ElementContent {
    /// The discriminator for this payload.
    pub fn kind(&self) -> ElementKind {
        match self {
            ElementContent::Text(_) => ElementKind::Text,
            ElementContent::Table(_) => ElementKind::Table,
        }
    }
}

/// A positioned unit of page content.
///
/// `order` is assigned by the page processor; any value carried in from
/// elsewhere is overwritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "ElementRecord", try_from = "ElementRecord")]
pub struct Element {
    /// 0-based position in the page's reading sequence
    pub order: usize,
    /// Element payload
    pub content: ElementContent,
    /// Region covered by the element
    pub bbox: BoundingBox,
}

impl Element {
    /// Create a text element.
    pub fn text(content: impl Into<String>, bbox: BoundingBox) -> Self {
        Self {
            order: 0,
            content: ElementContent::Text(content.into()),
            bbox,
        }
    }

    /// Create a table element.
    pub fn table(rows: Vec<Vec<String>>, bbox: BoundingBox) -> Self {
        Self {
            order: 0,
            content: ElementContent::Table(rows),
            bbox,
        }
    }

    /// Set the order index.
    pub fn with_order(mut self, order: usize) -> Self {
        self.order = order;
        self
    }

    /// Element type.
    pub fn kind(&self) -> ElementKind {
        self.content.kind()
    }

    /// Check if this element is a text block.
    pub fn is_text(&self) -> bool {
        matches!(self.content, ElementContent::Text(_))
    }

    /// Check if this element is a table.
    pub fn is_table(&self) -> bool {
        matches!(self.content, ElementContent::Table(_))
    }

    /// Text of a text element.
    pub fn as_text(&self) -> Option<&str> {
        match &self.content {
            ElementContent::Text(s) => Some(s),
            ElementContent::Table(_) => None,
        }
    }

    /// Rows of a table element.
    pub fn as_table(&self) -> Option<&[Vec<String>]> {
        match &self.content {
            ElementContent::Table(rows) => Some(rows),
            ElementContent::Text(_) => None,
        }
    }

    /// Sort key for top-to-bottom ordering (`bbox.y0`).
    pub fn vertical_position(&self) -> f32 {
        self.bbox.vertical_position()
    }
}

/// Wire form of an element:
/// `{"type", "order", "content", "metadata": {"bbox"}}`.
#[derive(Serialize, Deserialize)]
struct ElementRecord {
    #[serde(rename = "type")]
    kind: ElementKind,
    order: usize,
    content: RecordContent,
    metadata: ElementMetadata,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RecordContent {
    Text(String),
    Table(Vec<Vec<String>>),
}

/// Positional metadata attached to every serialized element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElementMetadata {
    /// Element bounding box
    pub bbox: BoundingBox,
}

impl From<Element> for ElementRecord {
    fn from(e: Element) -> Self {
        let kind = e.kind();
        let content = match e.content {
            ElementContent::Text(s) => RecordContent::Text(s),
            ElementContent::Table(rows) => RecordContent::Table(rows),
        };
        Self {
            kind,
            order: e.order,
            content,
            metadata: ElementMetadata { bbox: e.bbox },
        }
    }
}

impl TryFrom<ElementRecord> for Element {
    type Error = String;

    fn try_from(r: ElementRecord) -> Result<Self, Self::Error> {
        let content = match (r.kind, r.content) {
            (ElementKind::Text, RecordContent::Text(s)) => ElementContent::Text(s),
            (ElementKind::Table, RecordContent::Table(rows)) => ElementContent::Table(rows),
            (kind, _) => return Err(format!("content does not match element type `{}`", kind)),
        };
        Ok(Self {
            order: r.order,
            content,
            bbox: r.metadata.bbox,
        })
    }
}
