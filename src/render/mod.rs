//! Rendering of extracted structures.

mod json;

pub use json::{to_json, to_json_value, JsonFormat};
