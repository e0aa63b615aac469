//! Error types shared across the dataset, attachment and export layers.

use std::io;

use thiserror::Error;

/// Errors raised by an [`AttachmentResolver`](crate::attachment::AttachmentResolver).
#[derive(Error, Debug)]
pub enum AttachmentError {
    /// The attachment does not exist on the server.
    #[error("Attachment {file_name} of row {row_id} not found")]
    NotFound { row_id: String, file_name: String },

    /// Local I/O failure while reading or storing an attachment.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Network or server failure reported by the resolver.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The raw output side channel of a row could not be read.
    #[error("Raw output error for row {row_id}: {message}")]
    RawOutput { row_id: String, message: String },
}

/// Errors raised while building or reading a [`TableCsv`](crate::dataset::TableCsv).
#[derive(Error, Debug)]
pub enum DatasetError {
    /// A batch's data columns disagree with the established header.
    #[error("Schema mismatch: expected columns {expected:?}, found {found:?}")]
    SchemaMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    /// Row index past the end of the dataset.
    #[error("Row index {index} out of range for dataset of {size} rows")]
    OutOfRange { index: usize, size: usize },

    /// A row in a fetched batch could not be parsed.
    #[error("Malformed row at index {index} (id: {}): {message}", .row_id.as_deref().unwrap_or("unknown"))]
    MalformedRow {
        index: usize,
        row_id: Option<String>,
        message: String,
    },

    /// Column definitions were unusable for seeding the header.
    #[error("Invalid column definitions for table {table_id}: {message}")]
    InvalidColumnDefinitions { table_id: String, message: String },

    /// Column definitions could not be fetched.
    #[error("Failed to fetch column definitions for table {table_id}: {message}")]
    ColumnDefinitionFetch { table_id: String, message: String },

    /// The page source failed to deliver the next batch.
    #[error("Failed to fetch page: {0}")]
    PageFetch(String),

    /// Invalid constructor argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An attachment failure made a row impossible to materialize.
    #[error("Row {row_id} at index {index} failed: {source}")]
    RowFailed {
        index: usize,
        row_id: String,
        #[source]
        source: AttachmentError,
    },
}
