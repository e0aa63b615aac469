//! CSV serialization of a [`TableCsv`].
//!
//! Rows are materialized through a [`RowCursor`](crate::dataset::RowCursor)
//! and written with the projected header first. Materialization may call into
//! the attachment resolver, which blocks; the async entry points therefore
//! render on a blocking task and only perform the final write asynchronously.

use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use bzip2::write::BzEncoder;
use flate2::write::GzEncoder;
use thiserror::Error;
use tokio::fs::File;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};
use tracing::{debug, warn};

use crate::config::CsvConfig;
use crate::dataset::TableCsv;
use crate::error::DatasetError;

/// Error types for CSV export operations.
#[derive(Error, Debug)]
pub enum ExportError {
    /// I/O error during export.
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// Reading the dataset failed.
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    /// Compressing the output failed.
    #[error("Compression error: {0}")]
    CompressionError(String),

    /// The blocking render task failed.
    #[error("Export task error: {0}")]
    TaskError(String),
}

/// Row separator written after each record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowSeparator {
    /// Line feed (Unix-style)
    #[default]
    LF,
    /// Carriage return (old Mac-style)
    CR,
    /// Carriage return + line feed (Windows-style)
    CRLF,
}

impl RowSeparator {
    pub fn as_str(&self) -> &'static str {
        match self {
            RowSeparator::LF => "\n",
            RowSeparator::CR => "\r",
            RowSeparator::CRLF => "\r\n",
        }
    }
}

/// Compression applied to the exported file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    /// No compression
    #[default]
    None,
    /// Gzip compression
    Gzip,
    /// Bzip2 compression
    Bzip2,
}

/// What to do with a row that fails to materialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowErrorPolicy {
    /// Log the failure and continue with the next row.
    #[default]
    Skip,
    /// Stop the export with the row's error.
    Abort,
}

/// Options for CSV export configuration.
#[derive(Debug, Clone)]
pub struct CsvExportOptions {
    /// Column separator character (default: ',').
    pub column_separator: char,

    /// Column delimiter character for quoting (default: '"').
    pub column_delimiter: char,

    /// Row separator (default: LF).
    pub row_separator: RowSeparator,

    /// Whether to write the header row (default: true).
    pub with_column_names: bool,

    /// Compression type (default: None).
    pub compression: Compression,

    /// Handling of row-fatal failures (default: Skip).
    pub on_row_error: RowErrorPolicy,
}

impl Default for CsvExportOptions {
    fn default() -> Self {
        Self {
            column_separator: ',',
            column_delimiter: '"',
            row_separator: RowSeparator::LF,
            with_column_names: true,
            compression: Compression::None,
            on_row_error: RowErrorPolicy::Skip,
        }
    }
}

impl CsvExportOptions {
    /// Creates new export options with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the column separator character.
    #[must_use]
    pub fn column_separator(mut self, sep: char) -> Self {
        self.column_separator = sep;
        self
    }

    /// Sets the column delimiter (quote) character.
    #[must_use]
    pub fn column_delimiter(mut self, delim: char) -> Self {
        self.column_delimiter = delim;
        self
    }

    /// Sets the row separator.
    #[must_use]
    pub fn row_separator(mut self, sep: RowSeparator) -> Self {
        self.row_separator = sep;
        self
    }

    /// Sets whether to include the header row.
    #[must_use]
    pub fn with_column_names(mut self, include: bool) -> Self {
        self.with_column_names = include;
        self
    }

    /// Sets the compression type.
    #[must_use]
    pub fn compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Sets the handling of row-fatal failures.
    #[must_use]
    pub fn on_row_error(mut self, policy: RowErrorPolicy) -> Self {
        self.on_row_error = policy;
        self
    }
}

/// Outcome of an export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// Data rows written, header excluded.
    pub rows_written: usize,

    /// Rows dropped under [`RowErrorPolicy::Skip`].
    pub rows_skipped: usize,

    /// Written rows carrying at least one placeholder cell.
    pub degraded_rows: usize,
}

/// Writes records of string fields as CSV.
pub struct CsvWriter<W: Write> {
    writer: W,
    options: CsvExportOptions,
    records_written: usize,
}

impl<W: Write> CsvWriter<W> {
    pub fn new(writer: W, options: CsvExportOptions) -> Self {
        Self {
            writer,
            options,
            records_written: 0,
        }
    }

    /// Writes one record. Returns the number of bytes written.
    pub fn write_record<I, S>(&mut self, fields: I) -> io::Result<usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut line = String::with_capacity(256);
        for (idx, field) in fields.into_iter().enumerate() {
            if idx > 0 {
                line.push(self.options.column_separator);
            }
            line.push_str(&self.escape_string(field.as_ref()));
        }
        line.push_str(self.options.row_separator.as_str());

        self.writer.write_all(line.as_bytes())?;
        self.records_written += 1;
        Ok(line.len())
    }

    /// Number of records written so far, header included.
    #[must_use]
    pub fn records_written(&self) -> usize {
        self.records_written
    }

    /// Flushes and returns the inner writer.
    pub fn finish(mut self) -> io::Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }

    /// Escape a string value for CSV.
    ///
    /// Quotes the string if it contains the separator, delimiter, or newlines.
    /// Doubles any delimiter characters inside the string.
    fn escape_string(&self, s: &str) -> String {
        let sep = self.options.column_separator;
        let delim = self.options.column_delimiter;

        let needs_quoting =
            s.contains(sep) || s.contains(delim) || s.contains('\n') || s.contains('\r');

        if needs_quoting {
            let mut result = String::with_capacity(s.len() + 4);
            result.push(delim);
            for c in s.chars() {
                if c == delim {
                    result.push(delim);
                }
                result.push(c);
            }
            result.push(delim);
            result
        } else {
            s.to_string()
        }
    }
}

/// Exports `csv` under `config` to a synchronous writer, uncompressed.
///
/// # Errors
///
/// Returns `ExportError` on I/O failure, or on the first row-fatal failure
/// under [`RowErrorPolicy::Abort`].
pub fn export_to_writer<W: Write>(
    csv: &TableCsv,
    config: &CsvConfig,
    writer: W,
    options: &CsvExportOptions,
) -> Result<ExportSummary, ExportError> {
    let mut out = CsvWriter::new(writer, options.clone());
    let mut summary = ExportSummary::default();

    if options.with_column_names {
        out.write_record(csv.header(config))?;
    }

    let mut cursor = csv.cursor();
    while cursor.has_next() {
        match cursor.next_with(config) {
            Ok(row) => {
                if row.is_degraded() {
                    summary.degraded_rows += 1;
                }
                out.write_record(row.fields())?;
                summary.rows_written += 1;
            }
            Err(e @ DatasetError::RowFailed { .. })
                if options.on_row_error == RowErrorPolicy::Skip =>
            {
                warn!(table_id = csv.table_id(), error = %e, "skipping row");
                summary.rows_skipped += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }

    out.finish()?;
    debug!(
        table_id = csv.table_id(),
        rows = summary.rows_written,
        skipped = summary.rows_skipped,
        "exported csv"
    );
    Ok(summary)
}

/// Renders `csv` into an in-memory buffer, compressed per `options`.
pub fn export_to_bytes(
    csv: &TableCsv,
    config: &CsvConfig,
    options: &CsvExportOptions,
) -> Result<(Vec<u8>, ExportSummary), ExportError> {
    let mut buffer = Vec::new();
    let summary = export_to_writer(csv, config, &mut buffer, options)?;
    let data = compress(buffer, options.compression)?;
    Ok((data, summary))
}

/// Exports `csv` to a file.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use std::sync::Arc;
/// use tablecsv_rs::export::{export_to_file, CsvExportOptions};
/// use tablecsv_rs::{CsvConfig, TableCsv};
///
/// # async fn example(csv: TableCsv) -> Result<(), Box<dyn std::error::Error>> {
/// let summary = export_to_file(
///     Arc::new(csv),
///     CsvConfig::new().with_extra_metadata(true),
///     Path::new("/tmp/census.csv"),
///     CsvExportOptions::default(),
/// )
/// .await?;
/// println!("Exported {} rows", summary.rows_written);
/// # Ok(())
/// # }
/// ```
pub async fn export_to_file(
    csv: Arc<TableCsv>,
    config: CsvConfig,
    file_path: &Path,
    options: CsvExportOptions,
) -> Result<ExportSummary, ExportError> {
    let file = File::create(file_path).await?;
    let writer = BufWriter::new(file);

    export_to_stream(csv, config, writer, options).await
}

/// Exports `csv` to an async writer.
pub async fn export_to_stream<W: AsyncWrite + Unpin>(
    csv: Arc<TableCsv>,
    config: CsvConfig,
    mut writer: W,
    options: CsvExportOptions,
) -> Result<ExportSummary, ExportError> {
    let (data, summary) =
        tokio::task::spawn_blocking(move || export_to_bytes(&csv, &config, &options))
            .await
            .map_err(|e| ExportError::TaskError(e.to_string()))??;

    writer.write_all(&data).await?;
    writer.flush().await?;

    Ok(summary)
}

fn compress(data: Vec<u8>, compression: Compression) -> Result<Vec<u8>, ExportError> {
    match compression {
        Compression::None => Ok(data),
        Compression::Gzip => {
            let mut encoder = GzEncoder::new(Vec::new(), flate2::Compression::default());
            encoder
                .write_all(&data)
                .and_then(|_| encoder.finish())
                .map_err(|e| ExportError::CompressionError(e.to_string()))
        }
        Compression::Bzip2 => {
            let mut encoder = BzEncoder::new(Vec::new(), bzip2::Compression::default());
            encoder
                .write_all(&data)
                .and_then(|_| encoder.finish())
                .map_err(|e| ExportError::CompressionError(e.to_string()))
        }
    }
}
