//! Row and batch representations as delivered by the sync server.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::DatasetError;

/// Filter scope attached to every row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterScope {
    #[serde(rename = "type", default, deserialize_with = "lenient_scalar")]
    pub filter_type: Option<String>,

    #[serde(default, deserialize_with = "lenient_scalar")]
    pub value: Option<String>,
}

/// One `{column, value}` pair of a row's user data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataEntry {
    pub column: String,

    #[serde(default, deserialize_with = "lenient_scalar")]
    pub value: Option<String>,
}

impl DataEntry {
    pub fn new(column: impl Into<String>, value: Option<&str>) -> Self {
        Self {
            column: column.into(),
            value: value.map(str::to_string),
        }
    }
}

/// A single row fetched from the server.
///
/// Metadata and data values are read leniently: numbers and booleans keep
/// their JSON text, and `null` or an absent key is treated as missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    #[serde(default, deserialize_with = "lenient_scalar")]
    pub id: Option<String>,

    #[serde(default, deserialize_with = "lenient_scalar")]
    pub form_id: Option<String>,

    #[serde(default, deserialize_with = "lenient_scalar")]
    pub locale: Option<String>,

    #[serde(default, deserialize_with = "lenient_scalar")]
    pub savepoint_type: Option<String>,

    #[serde(default, deserialize_with = "lenient_scalar")]
    pub savepoint_timestamp: Option<String>,

    #[serde(default, deserialize_with = "lenient_scalar")]
    pub savepoint_creator: Option<String>,

    #[serde(default, deserialize_with = "lenient_scalar")]
    pub create_user: Option<String>,

    #[serde(default, deserialize_with = "lenient_scalar")]
    pub last_update_user: Option<String>,

    #[serde(rename = "rowETag", default, deserialize_with = "lenient_scalar")]
    pub row_etag: Option<String>,

    #[serde(default)]
    pub filter_scope: Option<FilterScope>,

    #[serde(default)]
    pub ordered_columns: Vec<DataEntry>,
}

impl Row {
    /// Looks up a top-level metadata field by its JSON name.
    pub fn metadata(&self, json_name: &str) -> Option<&str> {
        let field = match json_name {
            "id" => &self.id,
            "formId" => &self.form_id,
            "locale" => &self.locale,
            "savepointType" => &self.savepoint_type,
            "savepointTimestamp" => &self.savepoint_timestamp,
            "savepointCreator" => &self.savepoint_creator,
            "createUser" => &self.create_user,
            "lastUpdateUser" => &self.last_update_user,
            "rowETag" => &self.row_etag,
            _ => return None,
        };
        field.as_deref()
    }

    /// Looks up a field of the nested filter scope (`type` or `value`).
    pub fn filter_scope_field(&self, key: &str) -> Option<&str> {
        let scope = self.filter_scope.as_ref()?;
        match key {
            "type" => scope.filter_type.as_deref(),
            "value" => scope.value.as_deref(),
            _ => None,
        }
    }

    /// Value of the data entry at `position`, if present and non-null.
    pub fn value_at(&self, position: usize) -> Option<&str> {
        self.ordered_columns
            .get(position)
            .and_then(|entry| entry.value.as_deref())
    }

    /// Names of the row's data columns, in order.
    pub fn data_columns(&self) -> Vec<String> {
        self.ordered_columns
            .iter()
            .map(|entry| entry.column.clone())
            .collect()
    }

    /// Row id, or the empty string when the server omitted it.
    pub fn id_or_empty(&self) -> &str {
        self.id.as_deref().unwrap_or("")
    }
}

/// One fetched page of rows. Immutable once appended to a dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    rows: Vec<Row>,
}

impl Batch {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Parses a batch from the server's JSON.
    ///
    /// Accepts a bare array of rows or a row-list resource carrying a `rows`
    /// array. A row that cannot be parsed is reported with its position and,
    /// when available, its id.
    pub fn from_json(json: &str) -> Result<Self, DatasetError> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| DatasetError::MalformedRow {
                index: 0,
                row_id: None,
                message: format!("batch is not valid JSON: {e}"),
            })?;
        Self::from_value(value)
    }

    /// Parses a batch from an already decoded JSON value.
    pub fn from_value(value: Value) -> Result<Self, DatasetError> {
        let items = match value {
            Value::Array(items) => items,
            Value::Object(mut resource) => match resource.remove("rows") {
                Some(Value::Array(items)) => items,
                Some(Value::Null) | None => Vec::new(),
                Some(other) => {
                    return Err(DatasetError::MalformedRow {
                        index: 0,
                        row_id: None,
                        message: format!("expected `rows` to be an array, got {other}"),
                    })
                }
            },
            other => {
                return Err(DatasetError::MalformedRow {
                    index: 0,
                    row_id: None,
                    message: format!("expected an array of rows, got {other}"),
                })
            }
        };

        let mut rows = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            let row_id = item.get("id").and_then(Value::as_str).map(str::to_string);
            let row = serde_json::from_value::<Row>(item).map_err(|e| {
                DatasetError::MalformedRow {
                    index,
                    row_id,
                    message: e.to_string(),
                }
            })?;
            rows.push(row);
        }

        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn get(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Data columns inferred from the first row, `None` for an empty batch.
    pub fn data_columns(&self) -> Option<Vec<String>> {
        self.rows.first().map(Row::data_columns)
    }
}

impl From<Vec<Row>> for Batch {
    fn from(rows: Vec<Row>) -> Self {
        Self::new(rows)
    }
}

/// Reads a JSON scalar as text. Objects and arrays keep their compact JSON.
fn lenient_scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROW_JSON: &str = r#"{
        "id": "row1",
        "formId": "household",
        "locale": "en_US",
        "savepointType": "COMPLETE",
        "savepointTimestamp": "2016-05-01T10:00:00.000000000",
        "savepointCreator": "mailto:user@example.org",
        "createUser": "username:alice",
        "lastUpdateUser": null,
        "rowETag": "etag-1",
        "filterScope": {"type": "DEFAULT", "value": null},
        "orderedColumns": [
            {"column": "name", "value": "Alice"},
            {"column": "age", "value": 42},
            {"column": "photo_uriFragment", "value": "photo.jpg"}
        ]
    }"#;

    #[test]
    fn test_row_deserialize() {
        let row: Row = serde_json::from_str(ROW_JSON).unwrap();

        assert_eq!(row.id.as_deref(), Some("row1"));
        assert_eq!(row.metadata("formId"), Some("household"));
        assert_eq!(row.metadata("rowETag"), Some("etag-1"));
        assert_eq!(row.metadata("lastUpdateUser"), None);
        assert_eq!(row.filter_scope_field("type"), Some("DEFAULT"));
        assert_eq!(row.filter_scope_field("value"), None);
        assert_eq!(row.data_columns(), vec!["name", "age", "photo_uriFragment"]);
    }

    #[test]
    fn test_lenient_scalars() {
        let row: Row = serde_json::from_str(ROW_JSON).unwrap();

        assert_eq!(row.value_at(0), Some("Alice"));
        assert_eq!(row.value_at(1), Some("42"));
        assert_eq!(row.value_at(7), None);
    }

    #[test]
    fn test_row_missing_filter_scope() {
        let row: Row = serde_json::from_str(r#"{"id": "r", "orderedColumns": []}"#).unwrap();
        assert_eq!(row.filter_scope_field("type"), None);
        assert_eq!(row.metadata("unknownField"), None);
    }

    #[test]
    fn test_batch_from_array() {
        let json = format!("[{ROW_JSON}, {ROW_JSON}]");
        let batch = Batch::from_json(&json).unwrap();

        assert_eq!(batch.len(), 2);
        assert_eq!(
            batch.data_columns().unwrap(),
            vec!["name", "age", "photo_uriFragment"]
        );
    }

    #[test]
    fn test_batch_from_row_resource_list() {
        let json = format!(r#"{{"rows": [{ROW_JSON}], "hasMoreResults": false}}"#);
        let batch = Batch::from_json(&json).unwrap();
        assert_eq!(batch.len(), 1);

        let empty = Batch::from_json(r#"{"rows": []}"#).unwrap();
        assert!(empty.is_empty());
        assert!(empty.data_columns().is_none());
    }

    #[test]
    fn test_batch_malformed_row_reports_identity() {
        let json = r#"[{"id": "ok", "orderedColumns": []}, {"id": "bad", "orderedColumns": 5}]"#;
        let result = Batch::from_json(json);

        match result {
            Err(DatasetError::MalformedRow { index, row_id, .. }) => {
                assert_eq!(index, 1);
                assert_eq!(row_id.as_deref(), Some("bad"));
            }
            other => panic!("Expected MalformedRow, got {other:?}"),
        }
    }

    #[test]
    fn test_batch_rejects_non_array() {
        assert!(matches!(
            Batch::from_json("42"),
            Err(DatasetError::MalformedRow { .. })
        ));
        assert!(matches!(
            Batch::from_json("not json"),
            Err(DatasetError::MalformedRow { .. })
        ));
    }
}
