//! Collaborator interfaces consumed by the materializer.
//!
//! Fetching rows, listing and downloading attachments and resolving their URLs
//! are owned by the sync layer. The dataset only calls into these traits and
//! treats every call as blocking and fallible. Any caching belongs to the
//! implementor.

mod raw_output;

use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::error::AttachmentError;
use crate::types::{Batch, ColumnDefinition};

pub use raw_output::RawOutput;

/// Summary of one attachment as listed by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentInfo {
    pub filename: String,

    #[serde(default)]
    pub content_type: Option<String>,

    #[serde(default)]
    pub md5hash: Option<String>,
}

/// Lists, downloads and locates the file attachments of rows.
pub trait AttachmentResolver: Send + Sync {
    /// Lists the attachments of a row.
    fn list_row_attachments(&self, row_id: &str) -> Result<Vec<AttachmentInfo>, AttachmentError>;

    /// Downloads a row's attachments. With `raw_output_only` set, only the raw
    /// output side channel is fetched.
    fn download_attachments(&self, row_id: &str, raw_output_only: bool)
        -> Result<(), AttachmentError>;

    /// Opens the downloaded raw output side channel of a row.
    fn raw_output_stream(&self, row_id: &str) -> Result<Box<dyn Read + '_>, AttachmentError>;

    /// Resolves the URL of an attachment, local or remote.
    ///
    /// Returns `Ok(None)` when the file is missing on the server.
    fn attachment_url(
        &self,
        row_id: &str,
        file_name: &str,
        local: bool,
    ) -> Result<Option<String>, AttachmentError>;
}

/// Supplies a table's column definitions.
pub trait ColumnDefinitionSource: Send + Sync {
    fn column_definitions(&self, table_id: &str) -> Result<Vec<ColumnDefinition>, String>;
}

impl ColumnDefinitionSource for Vec<ColumnDefinition> {
    fn column_definitions(&self, _table_id: &str) -> Result<Vec<ColumnDefinition>, String> {
        Ok(self.clone())
    }
}

/// Yields fetched pages of rows until the server has no more results.
pub trait PageSource {
    type Error: std::fmt::Display;

    fn next_page(&mut self) -> Result<Option<Batch>, Self::Error>;
}

/// Resolver for datasets read without any attachment access.
///
/// Listing returns nothing, downloads succeed without effect, links resolve to
/// `None` and the raw output side channel is an empty object.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAttachments;

impl AttachmentResolver for NoAttachments {
    fn list_row_attachments(&self, _row_id: &str) -> Result<Vec<AttachmentInfo>, AttachmentError> {
        Ok(Vec::new())
    }

    fn download_attachments(
        &self,
        _row_id: &str,
        _raw_output_only: bool,
    ) -> Result<(), AttachmentError> {
        Ok(())
    }

    fn raw_output_stream(&self, _row_id: &str) -> Result<Box<dyn Read + '_>, AttachmentError> {
        Ok(Box::new(&b"{}"[..]))
    }

    fn attachment_url(
        &self,
        _row_id: &str,
        _file_name: &str,
        _local: bool,
    ) -> Result<Option<String>, AttachmentError> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_attachments() {
        let resolver = NoAttachments;

        assert!(resolver.list_row_attachments("r").unwrap().is_empty());
        assert!(resolver.download_attachments("r", true).is_ok());
        assert!(resolver.attachment_url("r", "f.jpg", true).unwrap().is_none());

        let raw = RawOutput::from_reader("r", resolver.raw_output_stream("r").unwrap()).unwrap();
        assert_eq!(raw.value("anything"), "null");
    }

    #[test]
    fn test_vec_column_definition_source() {
        let defs = vec![ColumnDefinition::new("a", true)];
        assert_eq!(defs.column_definitions("t1").unwrap(), defs);
    }

    #[test]
    fn test_attachment_info_deserialize() {
        let json = r#"{"filename": "photo.jpg", "contentType": "image/jpeg", "md5hash": "md5:abc"}"#;
        let info: AttachmentInfo = serde_json::from_str(json).unwrap();

        assert_eq!(info.filename, "photo.jpg");
        assert_eq!(info.content_type.as_deref(), Some("image/jpeg"));
    }
}
