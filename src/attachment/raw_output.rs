//! Reader for the vendor raw output side channel of a row.

use std::io::Read;

use serde_json::{Map, Value};

use crate::dataset::NULL;
use crate::error::AttachmentError;
use crate::header::URI_FRAGMENT_SUFFIX;

/// Parsed raw output of one row: a JSON object keyed by column name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawOutput {
    fields: Map<String, Value>,
}

impl RawOutput {
    /// Parses the raw output stream of `row_id`.
    pub fn from_reader<R: Read>(row_id: &str, reader: R) -> Result<Self, AttachmentError> {
        let value: Value =
            serde_json::from_reader(reader).map_err(|e| AttachmentError::RawOutput {
                row_id: row_id.to_string(),
                message: e.to_string(),
            })?;

        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(AttachmentError::RawOutput {
                row_id: row_id.to_string(),
                message: format!("expected a JSON object, got {other}"),
            }),
        }
    }

    /// Value recorded for `column`, or `null` when absent.
    ///
    /// The exact key is tried first, then the key without its trailing
    /// `_uriFragment` element.
    pub fn value(&self, column: &str) -> String {
        let found = self.fields.get(column).or_else(|| {
            column
                .strip_suffix(URI_FRAGMENT_SUFFIX)
                .map(|base| base.trim_end_matches('_'))
                .and_then(|base| self.fields.get(base))
        });

        match found {
            None | Some(Value::Null) => NULL.to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> RawOutput {
        RawOutput::from_reader("row1", json.as_bytes()).unwrap()
    }

    #[test]
    fn test_value_exact_key() {
        let raw = parse(r#"{"num_children_uriFragment": "3", "count": 7, "flag": true}"#);

        assert_eq!(raw.value("num_children_uriFragment"), "3");
        assert_eq!(raw.value("count"), "7");
        assert_eq!(raw.value("flag"), "true");
        assert_eq!(raw.len(), 3);
    }

    #[test]
    fn test_value_falls_back_to_base_name() {
        let raw = parse(r#"{"num_children_image": "3"}"#);
        assert_eq!(raw.value("num_children_image_uriFragment"), "3");
    }

    #[test]
    fn test_value_missing_or_null() {
        let raw = parse(r#"{"a": null}"#);
        assert_eq!(raw.value("a"), "null");
        assert_eq!(raw.value("b"), "null");
    }

    #[test]
    fn test_value_nested_is_compact_json() {
        let raw = parse(r#"{"grid": [1, 2]}"#);
        assert_eq!(raw.value("grid"), "[1,2]");
    }

    #[test]
    fn test_rejects_non_object() {
        let result = RawOutput::from_reader("row9", "[1, 2]".as_bytes());
        match result {
            Err(AttachmentError::RawOutput { row_id, .. }) => assert_eq!(row_id, "row9"),
            other => panic!("Expected RawOutput error, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_invalid_json() {
        assert!(RawOutput::from_reader("row1", "{".as_bytes()).is_err());
    }
}
