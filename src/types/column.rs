//! Table column definitions as published by the server.

use serde::{Deserialize, Serialize};

/// One entry of a table's column definition list.
///
/// Only units of retention are stored as row data; the rest are grouping
/// elements of composite columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDefinition {
    pub element_key: String,

    #[serde(default)]
    pub is_unit_of_retention: bool,
}

impl ColumnDefinition {
    pub fn new(element_key: impl Into<String>, is_unit_of_retention: bool) -> Self {
        Self {
            element_key: element_key.into(),
            is_unit_of_retention,
        }
    }
}

/// Element keys of the retained columns, in definition order.
pub fn retained_columns(definitions: &[ColumnDefinition]) -> Vec<String> {
    definitions
        .iter()
        .filter(|def| def.is_unit_of_retention)
        .map(|def| def.element_key.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retained_columns_filters_groups() {
        let defs = vec![
            ColumnDefinition::new("name", true),
            ColumnDefinition::new("photo", false),
            ColumnDefinition::new("photo_uriFragment", true),
            ColumnDefinition::new("photo_contentType", true),
        ];

        assert_eq!(
            retained_columns(&defs),
            vec!["name", "photo_uriFragment", "photo_contentType"]
        );
    }

    #[test]
    fn test_column_definition_deserialize() {
        let json = r#"[{"elementKey": "a", "isUnitOfRetention": true}, {"elementKey": "b"}]"#;
        let defs: Vec<ColumnDefinition> = serde_json::from_str(json).unwrap();

        assert_eq!(defs[0], ColumnDefinition::new("a", true));
        assert!(!defs[1].is_unit_of_retention);
    }
}
