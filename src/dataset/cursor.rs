//! Forward-only iteration over a dataset's rows.

use crate::config::CsvConfig;
use crate::error::DatasetError;

use super::materialize::MaterializedRow;
use super::TableCsv;

/// Forward-only cursor over the rows of a [`TableCsv`].
///
/// The cursor borrows the dataset and never copies its batches. It cannot be
/// rewound; create a new one with [`TableCsv::cursor`] to scan again.
pub struct RowCursor<'a> {
    csv: &'a TableCsv,
    position: usize,
}

impl<'a> RowCursor<'a> {
    pub(crate) fn new(csv: &'a TableCsv) -> Self {
        Self { csv, position: 0 }
    }

    /// True while rows remain.
    pub fn has_next(&self) -> bool {
        self.position < self.csv.len()
    }

    /// Index of the next row to be returned.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Materializes the next row under `config` and advances.
    ///
    /// The cursor advances even when the row fails, so a caller may log the
    /// error and continue with the following row.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::OutOfRange`] once the cursor is exhausted, and
    /// [`DatasetError::RowFailed`] when the row could not be materialized.
    pub fn next_with(&mut self, config: &CsvConfig) -> Result<MaterializedRow, DatasetError> {
        if !self.has_next() {
            return Err(DatasetError::OutOfRange {
                index: self.position,
                size: self.csv.len(),
            });
        }

        let index = self.position;
        self.position += 1;
        self.csv.get(index, config)
    }

    /// Materializes the next row with every option disabled.
    pub fn next_row(&mut self) -> Result<MaterializedRow, DatasetError> {
        self.next_with(&CsvConfig::default())
    }

    /// Adapts the cursor into an [`Iterator`] reading under `config`.
    pub fn rows(self, config: CsvConfig) -> Rows<'a> {
        Rows {
            cursor: self,
            config,
        }
    }
}

/// Iterator over materialized rows under a fixed configuration.
pub struct Rows<'a> {
    cursor: RowCursor<'a>,
    config: CsvConfig,
}

impl Iterator for Rows<'_> {
    type Item = Result<MaterializedRow, DatasetError>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.cursor.has_next() {
            return None;
        }
        Some(self.cursor.next_with(&self.config))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.cursor.csv.len() - self.cursor.position;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Rows<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attachment::NoAttachments;
    use crate::config::ServerInfo;
    use crate::types::{Batch, ColumnDefinition, DataEntry, Row};

    fn dataset(rows: usize) -> TableCsv {
        let batch = Batch::new(
            (0..rows)
                .map(|i| Row {
                    id: Some(format!("row{i}")),
                    ordered_columns: vec![DataEntry::new("name", Some("x"))],
                    ..Row::default()
                })
                .collect(),
        );
        let server = ServerInfo::new("https://host", "app1").with_table("t1", "etag123");
        TableCsv::builder("t1", server)
            .resolver(NoAttachments)
            .column_definitions(vec![ColumnDefinition::new("name", true)])
            .with_batch(batch)
            .unwrap()
    }

    #[test]
    fn test_cursor_yields_every_row_then_fails() {
        let csv = dataset(3);
        let mut cursor = csv.cursor();
        let mut ids = Vec::new();

        while cursor.has_next() {
            let row = cursor.next_row().unwrap();
            ids.push(row.fields()[0].clone());
        }

        assert_eq!(ids, vec!["row0", "row1", "row2"]);
        assert!(!cursor.has_next());
        assert!(matches!(
            cursor.next_row(),
            Err(DatasetError::OutOfRange { index: 3, size: 3 })
        ));
    }

    #[test]
    fn test_cursor_config_override_per_call() {
        let csv = dataset(2);
        let mut cursor = csv.cursor();

        let plain = cursor.next_row().unwrap();
        let extra = cursor
            .next_with(&CsvConfig::new().with_extra_metadata(true))
            .unwrap();

        assert_eq!(extra.len(), plain.len() + 2);
        assert_eq!(cursor.position(), 2);
    }

    #[test]
    fn test_rows_iterator() {
        let csv = dataset(4);
        let rows = csv.cursor().rows(CsvConfig::default());

        assert_eq!(rows.len(), 4);
        let collected: Result<Vec<_>, _> = rows.collect();
        assert_eq!(collected.unwrap().len(), 4);
    }

    #[test]
    fn test_cursor_over_empty_dataset() {
        let csv = dataset(0);
        let mut cursor = csv.cursor();

        assert!(!cursor.has_next());
        assert!(cursor.next_row().is_err());
    }
}
