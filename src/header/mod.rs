//! Header derivation and projection.
//!
//! A dataset's full header is the fixed front metadata, the data columns of
//! the table and the fixed end metadata, in that order. What a reader actually
//! sees depends on the [`CsvConfig`] used for the read:
//!
//! | Action          | raw formatting off | raw formatting on             |
//! |-----------------|--------------------|-------------------------------|
//! | `Keep`, `Link`  | kept               | kept                          |
//! | `RawSubstitute` | kept               | renamed to `raw_<previous>`   |
//! | `Filter`        | kept               | dropped                       |
//! | `Extra`         | only with extra metadata enabled                   ||

mod action;
mod metadata;

pub use action::{
    classify, Action, CONTENT_TYPE_SUFFIX, EXTRA_COLUMNS, RAW_PREFIX, RESERVED_FILTERED_COLUMN,
    RESERVED_FILTERED_COUNT, URI_FRAGMENT_SUFFIX,
};
pub use metadata::{metadata_source, MetadataSource, END_METADATA, FRONT_METADATA};

use crate::config::CsvConfig;

/// The column contract of a dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    full: Vec<String>,
    data: Vec<String>,
    data_actions: Vec<Action>,
}

impl Header {
    /// Builds the full header around the given data columns.
    pub fn new(data_columns: Vec<String>) -> Self {
        let full = FRONT_METADATA
            .iter()
            .map(|s| s.to_string())
            .chain(data_columns.iter().cloned())
            .chain(END_METADATA.iter().map(|s| s.to_string()))
            .collect();
        let data_actions = data_columns.iter().map(|c| classify(c)).collect();

        Self {
            full,
            data: data_columns,
            data_actions,
        }
    }

    /// Every column, unprojected.
    pub fn full(&self) -> &[String] {
        &self.full
    }

    /// Data columns only, unprojected.
    pub fn data_columns(&self) -> &[String] {
        &self.data
    }

    /// Data columns paired with their actions.
    pub fn data_with_actions(&self) -> impl Iterator<Item = (&str, Action)> + '_ {
        self.data
            .iter()
            .map(String::as_str)
            .zip(self.data_actions.iter().copied())
    }

    /// Every column paired with its action. Metadata columns are classified
    /// by name.
    fn all_with_actions(&self) -> impl Iterator<Item = (&str, Action)> + '_ {
        let front = FRONT_METADATA.iter().map(|c| (*c, classify(c)));
        let end = END_METADATA.iter().map(|c| (*c, classify(c)));
        front.chain(self.data_with_actions()).chain(end)
    }

    /// Action of a data column, `None` for metadata or unknown columns.
    pub fn action(&self, column: &str) -> Option<Action> {
        self.data_with_actions()
            .find(|(name, _)| *name == column)
            .map(|(_, action)| action)
    }

    /// True when `columns` matches the data header name for name, in order.
    pub fn matches(&self, columns: &[String]) -> bool {
        self.data.as_slice() == columns
    }

    /// The header as seen under `config`.
    pub fn project(&self, config: &CsvConfig) -> Vec<String> {
        if !config.raw_formatting && config.extra_metadata {
            return self.full.clone();
        }

        let mut header: Vec<String> = Vec::with_capacity(self.full.len());
        for (column, action) in self.all_with_actions() {
            match action {
                Action::Keep | Action::Link => header.push(column.to_string()),
                Action::RawSubstitute => {
                    if config.raw_formatting {
                        let previous = header.last().map(String::as_str).unwrap_or_default();
                        header.push(format!("{RAW_PREFIX}{previous}"));
                    } else {
                        header.push(column.to_string());
                    }
                }
                Action::Filter => {
                    if !config.raw_formatting {
                        header.push(column.to_string());
                    }
                }
                Action::Extra => {
                    if config.extra_metadata {
                        header.push(column.to_string());
                    }
                }
            }
        }

        header
    }

    /// Buffer size for the data fields of one row under `config`.
    pub fn data_capacity(&self, config: &CsvConfig) -> usize {
        if config.raw_formatting {
            self.data.len().saturating_sub(RESERVED_FILTERED_COUNT)
        } else {
            self.data.len()
        }
    }

    /// Column whose name keys the raw output lookup for the data column at
    /// `position`: the preceding data column, or the last front metadata
    /// column emitted under `config` for the first data column.
    pub fn raw_source_column(&self, position: usize, config: &CsvConfig) -> &str {
        match position.checked_sub(1) {
            Some(previous) => &self.data[previous],
            None => FRONT_METADATA
                .iter()
                .rev()
                .find(|c| config.extra_metadata || classify(c) != Action::Extra)
                .copied()
                .unwrap_or_default(),
        }
    }
}
