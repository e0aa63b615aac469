//! Export of a [`TableCsv`](crate::dataset::TableCsv) to CSV text.
//!
//! # Example
//!
//! ```
//! use tablecsv_rs::export::{export_to_writer, CsvExportOptions};
//! use tablecsv_rs::{Batch, CsvConfig, ServerInfo, TableCsv};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let server = ServerInfo::new("https://host", "default").with_table("census", "etag1");
//! let batch = Batch::from_json(
//!     r#"[{"id": "r1", "orderedColumns": [{"column": "name", "value": "Alice"}]}]"#,
//! )?;
//! let csv = TableCsv::builder("census", server).with_batch(batch)?;
//!
//! let mut output = Vec::new();
//! let summary = export_to_writer(
//!     &csv,
//!     &CsvConfig::default(),
//!     &mut output,
//!     &CsvExportOptions::default(),
//! )?;
//! assert_eq!(summary.rows_written, 1);
//! # Ok(())
//! # }
//! ```

pub mod csv;

pub use csv::{
    export_to_bytes, export_to_file, export_to_stream, export_to_writer, Compression,
    CsvExportOptions, CsvWriter, ExportError, ExportSummary, RowErrorPolicy, RowSeparator,
};
