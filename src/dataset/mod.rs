//! In-memory CSV view over the rows of one table.
//!
//! A [`TableCsv`] collects fetched batches of rows and exposes them as a
//! header plus flat rows of fields, projected per read by a [`CsvConfig`].
//!
//! # Schema seeding
//!
//! The dataset starts empty. The first batch appended while no row is stored
//! fixes the data header: from the batch's first row, or from the table's
//! retained column definitions when the batch has no rows. Afterwards a batch
//! is only accepted when its data columns equal the header name for name.
//!
//! # Example
//!
//! ```
//! use tablecsv_rs::{Batch, CsvConfig, ServerInfo, TableCsv};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let server = ServerInfo::new("https://host", "default").with_table("census", "etag1");
//! let batch = Batch::from_json(
//!     r#"[{"id": "r1", "orderedColumns": [{"column": "name", "value": "Alice"}]}]"#,
//! )?;
//!
//! let csv = TableCsv::builder("census", server).with_batch(batch)?;
//! let config = CsvConfig::default();
//!
//! let header = csv.header(&config);
//! let mut cursor = csv.cursor();
//! while cursor.has_next() {
//!     let row = cursor.next_with(&config)?;
//!     assert_eq!(row.len(), header.len());
//! }
//! # Ok(())
//! # }
//! ```

mod cursor;
mod link;
mod materialize;
mod store;

use std::sync::Arc;

use tracing::{debug, warn};

use crate::attachment::{AttachmentResolver, ColumnDefinitionSource, NoAttachments, PageSource};
use crate::config::{CsvConfig, ServerInfo};
use crate::error::DatasetError;
use crate::header::Header;
use crate::types::{retained_columns, Batch, ColumnDefinition};

pub use cursor::{RowCursor, Rows};
pub use link::{hyperlink, make_link, remote_attachment_url, MISSING_ATTACHMENT};
pub use materialize::{CellIssue, MaterializedRow, NULL};
pub use store::BatchStore;

use materialize::RowMaterializer;

/// Builder for [`TableCsv`].
pub struct TableCsvBuilder {
    table_id: String,
    server: ServerInfo,
    resolver: Arc<dyn AttachmentResolver>,
    definitions: Arc<dyn ColumnDefinitionSource>,
}

impl TableCsvBuilder {
    /// Sets the attachment resolver (default: [`NoAttachments`]).
    #[must_use]
    pub fn resolver(mut self, resolver: impl AttachmentResolver + 'static) -> Self {
        self.resolver = Arc::new(resolver);
        self
    }

    /// Sets a resolver shared with other datasets.
    #[must_use]
    pub fn shared_resolver(mut self, resolver: Arc<dyn AttachmentResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Sets the source of column definitions used to seed the header from an
    /// empty first batch (default: no definitions).
    #[must_use]
    pub fn column_definitions(mut self, source: impl ColumnDefinitionSource + 'static) -> Self {
        self.definitions = Arc::new(source);
        self
    }

    /// Builds an empty dataset.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::InvalidArgument`] if the table id is empty or
    /// unknown to the server info.
    pub fn build(self) -> Result<TableCsv, DatasetError> {
        if self.table_id.is_empty() {
            return Err(DatasetError::InvalidArgument(
                "table id cannot be empty".to_string(),
            ));
        }
        if !self.server.table_exists(&self.table_id) {
            return Err(DatasetError::InvalidArgument(format!(
                "table id {} does not exist",
                self.table_id
            )));
        }

        Ok(TableCsv {
            table_id: self.table_id,
            server: self.server,
            resolver: self.resolver,
            definitions: self.definitions,
            header: None,
            store: BatchStore::new(),
        })
    }

    /// Builds a dataset seeded with an initial batch.
    pub fn with_batch(self, batch: Batch) -> Result<TableCsv, DatasetError> {
        let mut csv = self.build()?;
        csv.append(batch)?;
        Ok(csv)
    }
}

/// Rows of one table, exported as CSV fields.
pub struct TableCsv {
    table_id: String,
    server: ServerInfo,
    resolver: Arc<dyn AttachmentResolver>,
    definitions: Arc<dyn ColumnDefinitionSource>,
    header: Option<Header>,
    store: BatchStore,
}

impl std::fmt::Debug for TableCsv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableCsv")
            .field("table_id", &self.table_id)
            .field("header", &self.header)
            .field("rows", &self.store.len())
            .finish_non_exhaustive()
    }
}

impl TableCsv {
    pub fn builder(table_id: impl Into<String>, server: ServerInfo) -> TableCsvBuilder {
        TableCsvBuilder {
            table_id: table_id.into(),
            server,
            resolver: Arc::new(NoAttachments),
            definitions: Arc::new(Vec::<ColumnDefinition>::new()),
        }
    }

    pub fn table_id(&self) -> &str {
        &self.table_id
    }

    pub fn server(&self) -> &ServerInfo {
        &self.server
    }

    /// Number of rows stored.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Number of batches appended so far, empty ones included.
    pub fn batch_count(&self) -> usize {
        self.store.batch_count()
    }

    /// Unprojected header, `None` until the schema is seeded.
    pub fn full_header(&self) -> Option<&Header> {
        self.header.as_ref()
    }

    /// The header as seen under `config`. Empty until the schema is seeded.
    pub fn header(&self, config: &CsvConfig) -> Vec<String> {
        self.header
            .as_ref()
            .map(|header| header.project(config))
            .unwrap_or_default()
    }

    /// Appends a batch if its data columns match the header.
    ///
    /// Returns `Ok(false)` without touching the dataset when the columns
    /// disagree. While the dataset holds no rows every non-empty batch is
    /// accepted and re-seeds the header; an empty batch keeps a header that is
    /// already seeded.
    ///
    /// # Errors
    ///
    /// Fails when the header has to be seeded from column definitions and
    /// those cannot be fetched or contain no retained column.
    pub fn try_append(&mut self, batch: Batch) -> Result<bool, DatasetError> {
        if self.is_empty() && (self.header.is_none() || !batch.is_empty()) {
            let header = self.seed_header(&batch)?;
            debug!(
                table_id = %self.table_id,
                columns = header.data_columns().len(),
                "seeded data header"
            );
            self.header = Some(header);
        } else if let (Some(header), Some(columns)) = (&self.header, batch.data_columns()) {
            if !header.matches(&columns) {
                warn!(
                    table_id = %self.table_id,
                    expected = header.data_columns().len(),
                    found = columns.len(),
                    "rejected batch with mismatching columns"
                );
                return Ok(false);
            }
        }

        debug!(table_id = %self.table_id, rows = batch.len(), "appended batch");
        self.store.push(batch);
        Ok(true)
    }

    /// Appends a batch, turning a column mismatch into an error.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::SchemaMismatch`] when the batch is rejected.
    pub fn append(&mut self, batch: Batch) -> Result<(), DatasetError> {
        let found = batch.data_columns().unwrap_or_default();
        if self.try_append(batch)? {
            return Ok(());
        }

        let expected = self
            .header
            .as_ref()
            .map(|h| h.data_columns().to_vec())
            .unwrap_or_default();
        Err(DatasetError::SchemaMismatch { expected, found })
    }

    /// Drains `pages`, appending each page in order.
    ///
    /// Returns the number of rows appended. Pages appended before a failure
    /// stay in the dataset.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::PageFetch`] when the source fails and
    /// [`DatasetError::SchemaMismatch`] on the first incompatible page.
    pub fn extend_from_pages<P: PageSource>(&mut self, pages: &mut P) -> Result<usize, DatasetError> {
        let mut appended = 0;
        while let Some(batch) = pages
            .next_page()
            .map_err(|e| DatasetError::PageFetch(e.to_string()))?
        {
            let rows = batch.len();
            self.append(batch)?;
            appended += rows;
        }
        Ok(appended)
    }

    /// Materializes the row at `index` under `config`.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::OutOfRange`] for an index past the end and
    /// [`DatasetError::RowFailed`] on a row-fatal attachment failure.
    pub fn get(&self, index: usize, config: &CsvConfig) -> Result<MaterializedRow, DatasetError> {
        let row = self.store.row(index)?;
        let header = self.header.as_ref().ok_or(DatasetError::OutOfRange {
            index,
            size: self.len(),
        })?;

        let materializer = RowMaterializer {
            header,
            server: &self.server,
            table_id: &self.table_id,
            resolver: self.resolver.as_ref(),
        };
        materializer.materialize(index, row, config)
    }

    /// A fresh cursor positioned on the first row.
    pub fn cursor(&self) -> RowCursor<'_> {
        RowCursor::new(self)
    }

    fn seed_header(&self, batch: &Batch) -> Result<Header, DatasetError> {
        if let Some(columns) = batch.data_columns() {
            return Ok(Header::new(columns));
        }

        let definitions = self
            .definitions
            .column_definitions(&self.table_id)
            .map_err(|message| DatasetError::ColumnDefinitionFetch {
                table_id: self.table_id.clone(),
                message,
            })?;
        let columns = retained_columns(&definitions);
        if columns.is_empty() {
            return Err(DatasetError::InvalidColumnDefinitions {
                table_id: self.table_id.clone(),
                message: "no retained columns".to_string(),
            });
        }

        Ok(Header::new(columns))
    }
}
