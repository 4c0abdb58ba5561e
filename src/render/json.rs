//! JSON rendering for extracted structures.

use crate::error::{Error, Result};
use crate::model::DocumentStructure;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a structure to JSON text.
pub fn to_json(structure: &DocumentStructure, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(structure),
        JsonFormat::Compact => serde_json::to_string(structure),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Convert a structure to a JSON value tree.
pub fn to_json_value(structure: &DocumentStructure) -> Result<serde_json::Value> {
    serde_json::to_value(structure)
        .map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BoundingBox, Element, Page};

    fn sample() -> DocumentStructure {
        DocumentStructure::from_pages(vec![Page::new(
            1,
            vec![
                Element::text("Hello", BoundingBox::new(1.0, 2.0, 3.0, 4.0)),
                Element::table(
                    vec![vec!["a".into(), "b".into()]],
                    BoundingBox::new(0.0, 10.0, 5.0, 20.0),
                )
                .with_order(1),
            ],
        )])
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&sample(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"page_number\": 1"));
        assert!(json.contains('\n')); // Pretty has newlines
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&sample(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n')); // Compact has no newlines
        assert!(json.ends_with(
            r#""summary":{"total_pages":1,"total_text_blocks":1,"total_tables":1}}"#
        ));
    }

    #[test]
    fn test_to_json_value_shape() {
        let value = to_json_value(&sample()).unwrap();
        let table = &value["pages"][0]["elements"][1];
        assert_eq!(table["type"], "table");
        assert_eq!(table["order"], 1);
        assert_eq!(table["content"][0][1], "b");
        assert_eq!(table["metadata"]["bbox"][3], 20.0);
    }
}
