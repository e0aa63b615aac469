//! Turns one stored row into a flat, ordered list of CSV fields.
//!
//! Each row is emitted as front metadata, data fields and end metadata. The
//! data fields follow the projection of [`Header::project`] for the same
//! configuration, so header and rows always have the same length.
//!
//! Attachment failures are split in two classes:
//! - listing a row's attachments is row-fatal: the row is returned as
//!   [`DatasetError::RowFailed`];
//! - fetching or parsing the raw output, resolving a local link and the final
//!   attachment download only degrade the affected cells, each recorded as a
//!   [`CellIssue`].

use tracing::warn;

use crate::attachment::{AttachmentResolver, RawOutput};
use crate::config::{CsvConfig, ServerInfo};
use crate::error::{AttachmentError, DatasetError};
use crate::header::{
    classify, metadata_source, Action, Header, MetadataSource, END_METADATA, FRONT_METADATA,
};
use crate::types::Row;

use super::link::make_link;

/// Placeholder for absent values.
pub const NULL: &str = "null";

/// A cell that was filled with a placeholder instead of its real value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellIssue {
    pub column: String,
    pub message: String,
}

/// Fields of one exported row.
///
/// A row without issues is complete; a row with issues carries placeholders
/// in the affected cells but keeps its shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializedRow {
    fields: Vec<String>,
    issues: Vec<CellIssue>,
}

impl MaterializedRow {
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn into_fields(self) -> Vec<String> {
        self.fields
    }

    pub fn issues(&self) -> &[CellIssue] {
        &self.issues
    }

    pub fn is_degraded(&self) -> bool {
        !self.issues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// State of a row's raw output side channel.
enum RawSource {
    Unused,
    Loaded(RawOutput),
    Failed(String),
}

/// Borrowed view of everything needed to materialize rows of one dataset.
pub(crate) struct RowMaterializer<'a> {
    pub header: &'a Header,
    pub server: &'a ServerInfo,
    pub table_id: &'a str,
    pub resolver: &'a dyn AttachmentResolver,
}

impl RowMaterializer<'_> {
    /// Materializes `row`, stored at global position `index`.
    pub fn materialize(
        &self,
        index: usize,
        row: &Row,
        config: &CsvConfig,
    ) -> Result<MaterializedRow, DatasetError> {
        let row_id = row.id_or_empty();
        let row_failed = |source: AttachmentError| DatasetError::RowFailed {
            index,
            row_id: row_id.to_string(),
            source,
        };

        let mut issues = Vec::new();
        let front = metadata_fields(row, &FRONT_METADATA, config);
        let data = self
            .data_fields(row, config, &mut issues)
            .map_err(row_failed)?;
        let end = metadata_fields(row, &END_METADATA, config);

        let mut fields = Vec::with_capacity(front.len() + data.len() + end.len());
        fields.extend(front);
        fields.extend(data);
        fields.extend(end);

        Ok(MaterializedRow { fields, issues })
    }

    fn data_fields(
        &self,
        row: &Row,
        config: &CsvConfig,
        issues: &mut Vec<CellIssue>,
    ) -> Result<Vec<String>, AttachmentError> {
        let row_id = row.id_or_empty();

        let mut raw_output = RawSource::Unused;
        if config.touches_attachments() {
            self.resolver.list_row_attachments(row_id)?;

            if config.raw_formatting {
                raw_output = match self.fetch_raw_output(row_id) {
                    Ok(raw) => RawSource::Loaded(raw),
                    Err(e) => {
                        warn!(row_id, error = %e, "raw output unavailable");
                        RawSource::Failed(e.to_string())
                    }
                };
            }
        }

        let mut data = Vec::with_capacity(self.header.data_capacity(config));
        for (position, (column, action)) in self.header.data_with_actions().enumerate() {
            let value = row.value_at(position);

            match action {
                Action::Keep => data.push(or_null(value)),
                Action::Filter => {
                    if !config.raw_formatting {
                        data.push(or_null(value));
                    }
                }
                Action::Link => {
                    data.push(self.link_cell(row_id, column, value, config, issues));
                }
                Action::RawSubstitute => match &raw_output {
                    RawSource::Unused => data.push(or_null(value)),
                    RawSource::Loaded(raw) => {
                        data.push(raw.value(self.header.raw_source_column(position, config)))
                    }
                    RawSource::Failed(message) => {
                        issues.push(CellIssue {
                            column: column.to_string(),
                            message: format!("raw output unavailable: {message}"),
                        });
                        data.push(NULL.to_string());
                    }
                },
                Action::Extra => {
                    if config.extra_metadata {
                        data.push(or_null(value));
                    }
                }
            }
        }

        if config.download_attachments {
            if let Err(e) = self.resolver.download_attachments(row_id, false) {
                warn!(row_id, error = %e, "attachment download failed");
                issues.push(CellIssue {
                    column: FRONT_METADATA[0].to_string(),
                    message: format!("attachment download failed: {e}"),
                });
            }
        }

        Ok(data)
    }

    fn fetch_raw_output(&self, row_id: &str) -> Result<RawOutput, AttachmentError> {
        self.resolver.download_attachments(row_id, true)?;
        let stream = self.resolver.raw_output_stream(row_id)?;
        RawOutput::from_reader(row_id, stream)
    }

    fn link_cell(
        &self,
        row_id: &str,
        column: &str,
        file_name: Option<&str>,
        config: &CsvConfig,
        issues: &mut Vec<CellIssue>,
    ) -> String {
        let Some(file_name) = file_name else {
            return NULL.to_string();
        };

        match make_link(
            self.resolver,
            self.server,
            self.table_id,
            row_id,
            file_name,
            config.download_attachments,
        ) {
            Ok(cell) => cell,
            Err(e) => {
                warn!(row_id, column, error = %e, "attachment link unavailable");
                issues.push(CellIssue {
                    column: column.to_string(),
                    message: e.to_string(),
                });
                format!("Attachment unavailable: {e}")
            }
        }
    }
}

/// Values of the metadata columns in `columns` that are visible under `config`.
fn metadata_fields(row: &Row, columns: &[&str], config: &CsvConfig) -> Vec<String> {
    let mut fields = Vec::with_capacity(columns.len());

    for column in columns {
        match metadata_source(column) {
            Some(MetadataSource::FilterScope(key)) => {
                fields.push(or_null(row.filter_scope_field(key)));
            }
            Some(MetadataSource::Row(json_name)) => {
                if config.extra_metadata || classify(column) != Action::Extra {
                    fields.push(or_null(row.metadata(json_name)));
                }
            }
            None => fields.push(NULL.to_string()),
        }
    }

    fields
}

fn or_null(value: Option<&str>) -> String {
    value.unwrap_or(NULL).to_string()
}
