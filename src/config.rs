//! Read configuration and server context.

use std::collections::HashMap;

/// Projection applied to one read of a dataset.
///
/// The same dataset can be read several times under different projections
/// without re-fetching anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CsvConfig {
    /// Download every attachment of each row and link to the local copies.
    pub download_attachments: bool,

    /// Substitute content-type columns with values from the raw output side
    /// channel and drop the reserved filtered column.
    pub raw_formatting: bool,

    /// Include the `_create_user` and `_last_update_user` audit columns.
    pub extra_metadata: bool,
}

impl CsvConfig {
    /// Creates a configuration with every option disabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_download_attachments(mut self, enabled: bool) -> Self {
        self.download_attachments = enabled;
        self
    }

    #[must_use]
    pub fn with_raw_formatting(mut self, enabled: bool) -> Self {
        self.raw_formatting = enabled;
        self
    }

    #[must_use]
    pub fn with_extra_metadata(mut self, enabled: bool) -> Self {
        self.extra_metadata = enabled;
        self
    }

    /// True when attachment listing is needed before reading data cells.
    pub(crate) fn touches_attachments(&self) -> bool {
        self.raw_formatting || self.download_attachments
    }
}

/// Read-only description of the sync server a dataset was fetched from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerInfo {
    server_url: String,
    app_id: String,
    schema_etags: HashMap<String, String>,
}

impl ServerInfo {
    /// Creates server info. A trailing `/` on `server_url` is dropped.
    pub fn new(server_url: impl Into<String>, app_id: impl Into<String>) -> Self {
        let mut server_url = server_url.into();
        while server_url.ends_with('/') {
            server_url.pop();
        }

        Self {
            server_url,
            app_id: app_id.into(),
            schema_etags: HashMap::new(),
        }
    }

    /// Registers a table and its current schema tag.
    #[must_use]
    pub fn with_table(mut self, table_id: impl Into<String>, schema_etag: impl Into<String>) -> Self {
        self.schema_etags.insert(table_id.into(), schema_etag.into());
        self
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn table_exists(&self, table_id: &str) -> bool {
        self.schema_etags.contains_key(table_id)
    }

    pub fn schema_etag(&self, table_id: &str) -> Option<&str> {
        self.schema_etags.get(table_id).map(String::as_str)
    }
}
