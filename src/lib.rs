//! # tablecsv-rs
//!
//! Spreadsheet-friendly CSV export of rows fetched from a tabular sync server.
//!
//! Rows arrive in pages (batches) from the sync layer and are collected into a
//! [`TableCsv`]. The dataset fixes one column contract for all pages and then
//! materializes each row as a flat list of fields:
//!
//! - fixed system metadata columns before and after the user data;
//! - attachment file names rewritten into `=HYPERLINK(...)` formulas;
//! - content-type columns replaced by values from the vendor raw output side
//!   channel when raw formatting is requested;
//! - audit columns (`_create_user`, `_last_update_user`) on demand.
//!
//! What a read looks like is chosen per read with a [`CsvConfig`], so one
//! dataset can be exported several times under different projections.
//!
//! ## Example
//!
//! ```
//! use tablecsv_rs::{Batch, CsvConfig, ServerInfo, TableCsv};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let server = ServerInfo::new("https://host", "app1").with_table("t1", "etag123");
//! let batch = Batch::from_json(
//!     r#"[{
//!         "id": "row1",
//!         "rowETag": "e1",
//!         "filterScope": {"type": "DEFAULT", "value": null},
//!         "orderedColumns": [
//!             {"column": "colA", "value": "x"},
//!             {"column": "colB_uriFragment", "value": "photo.jpg"}
//!         ]
//!     }]"#,
//! )?;
//!
//! let csv = TableCsv::builder("t1", server).with_batch(batch)?;
//! let row = csv.get(0, &CsvConfig::default())?;
//!
//! assert_eq!(
//!     row.fields()[7],
//!     "=HYPERLINK(\"https://host/tables/app1/t1/ref/etag123/attachments/row1/file/photo.jpg\", \"Ctrl + Click to view\")"
//! );
//! # Ok(())
//! # }
//! ```

// Module declarations
pub mod attachment;
pub mod config;
pub mod dataset;
pub mod error;
pub mod export;
pub mod header;
pub mod types;

// =============================================================================
// Dataset
// =============================================================================

/// Re-export the dataset, its cursor and row types.
pub use dataset::{CellIssue, MaterializedRow, RowCursor, Rows, TableCsv, TableCsvBuilder};

// =============================================================================
// Configuration
// =============================================================================

pub use config::{CsvConfig, ServerInfo};

// =============================================================================
// Collaborators
// =============================================================================

/// Re-export the interfaces implemented by the sync layer.
pub use attachment::{
    AttachmentInfo, AttachmentResolver, ColumnDefinitionSource, NoAttachments, PageSource,
    RawOutput,
};

// =============================================================================
// Input Model
// =============================================================================

pub use types::{Batch, ColumnDefinition, DataEntry, FilterScope, Row};

// =============================================================================
// Header
// =============================================================================

pub use header::{classify, Action, Header};

// =============================================================================
// Error Types
// =============================================================================

/// Re-export error types for convenient error handling.
pub use error::{AttachmentError, DatasetError};
pub use export::ExportError;
