//! Per-column transformation rules.

/// Suffix of the column holding an attachment's content type.
pub const CONTENT_TYPE_SUFFIX: &str = "contentType";

/// Suffix of the column holding an attachment's file name.
pub const URI_FRAGMENT_SUFFIX: &str = "uriFragment";

/// Prefix marking a column whose values come from the raw output side channel.
pub const RAW_PREFIX: &str = "raw_";

/// The content-type column of the raw output attachment itself.
pub const RESERVED_FILTERED_COLUMN: &str = "raw_contentType";

/// Number of columns dropped from every row under raw formatting.
///
/// The raw output attachment contributes exactly one filtered column.
pub const RESERVED_FILTERED_COUNT: usize = 1;

/// Audit columns only exported when extra metadata is requested.
pub const EXTRA_COLUMNS: [&str; 2] = ["_create_user", "_last_update_user"];

/// What happens to a column when a row is exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Copied verbatim.
    Keep,
    /// Dropped under raw formatting.
    Filter,
    /// Rewritten into a spreadsheet hyperlink.
    Link,
    /// Replaced by the raw output value under raw formatting.
    RawSubstitute,
    /// Audit column, only exported with extra metadata.
    Extra,
}

/// Classifies a column by its name.
#[must_use]
pub fn classify(column: &str) -> Action {
    if column.ends_with(CONTENT_TYPE_SUFFIX) {
        if column == RESERVED_FILTERED_COLUMN {
            Action::Filter
        } else {
            Action::RawSubstitute
        }
    } else if column.ends_with(URI_FRAGMENT_SUFFIX) {
        Action::Link
    } else if EXTRA_COLUMNS.contains(&column) {
        Action::Extra
    } else {
        Action::Keep
    }
}
