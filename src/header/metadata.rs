//! Fixed system metadata columns placed around the user data.

/// Metadata columns exported before the data columns.
pub const FRONT_METADATA: [&str; 8] = [
    "_id",
    "_form_id",
    "_locale",
    "_savepoint_type",
    "_savepoint_timestamp",
    "_savepoint_creator",
    "_create_user",
    "_last_update_user",
];

/// Metadata columns exported after the data columns.
pub const END_METADATA: [&str; 3] = ["_row_etag", "_filter_type", "_filter_value"];

/// Where a metadata column's value lives in a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataSource {
    /// Top-level row field with this JSON name.
    Row(&'static str),
    /// Field of the nested filter scope.
    FilterScope(&'static str),
}

/// Maps a metadata column to its location in the row JSON.
#[must_use]
pub fn metadata_source(column: &str) -> Option<MetadataSource> {
    let source = match column {
        "_id" => MetadataSource::Row("id"),
        "_form_id" => MetadataSource::Row("formId"),
        "_locale" => MetadataSource::Row("locale"),
        "_savepoint_type" => MetadataSource::Row("savepointType"),
        "_savepoint_timestamp" => MetadataSource::Row("savepointTimestamp"),
        "_savepoint_creator" => MetadataSource::Row("savepointCreator"),
        "_create_user" => MetadataSource::Row("createUser"),
        "_last_update_user" => MetadataSource::Row("lastUpdateUser"),
        "_row_etag" => MetadataSource::Row("rowETag"),
        "_filter_type" => MetadataSource::FilterScope("type"),
        "_filter_value" => MetadataSource::FilterScope("value"),
        _ => return None,
    };
    Some(source)
}
