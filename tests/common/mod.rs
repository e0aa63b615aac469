//! Shared fakes for integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::sync::Mutex;

use serde_json::json;
use tablecsv_rs::{
    AttachmentError, AttachmentInfo, AttachmentResolver, Batch, ServerInfo,
};

pub const TABLE_ID: &str = "t1";

pub fn server() -> ServerInfo {
    ServerInfo::new("https://host", "app1").with_table(TABLE_ID, "etag123")
}

/// Data columns of a table filled with a scanning app: a plain value, an
/// image attachment and the raw output attachment.
pub const SCAN_COLUMNS: [&str; 5] = [
    "colA",
    "colB_uriFragment",
    "colB_contentType",
    "raw_uriFragment",
    "raw_contentType",
];

/// Builds a batch of rows with ids `row<start>..row<start + count>`.
pub fn scan_batch(start: usize, count: usize) -> Batch {
    let rows: Vec<_> = (start..start + count)
        .map(|i| {
            json!({
                "id": format!("row{i}"),
                "formId": "household",
                "locale": "en_US",
                "savepointType": "COMPLETE",
                "savepointTimestamp": "2016-05-01T10:00:00.000000000",
                "savepointCreator": "mailto:collector@example.org",
                "createUser": "username:alice",
                "lastUpdateUser": "username:bob",
                "rowETag": format!("etag-{i}"),
                "filterScope": {"type": "DEFAULT", "value": null},
                "orderedColumns": [
                    {"column": "colA", "value": format!("value{i}")},
                    {"column": "colB_uriFragment", "value": "photo.jpg"},
                    {"column": "colB_contentType", "value": "image/jpeg"},
                    {"column": "raw_uriFragment", "value": "raw.json"},
                    {"column": "raw_contentType", "value": "application/json"}
                ]
            })
        })
        .collect();
    Batch::from_value(serde_json::Value::Array(rows)).expect("valid batch")
}

/// In-memory stand-in for the attachment manager of the sync layer.
#[derive(Default)]
pub struct FakeAttachments {
    pub raw_outputs: HashMap<String, String>,
    pub missing_files: HashSet<String>,
    pub failing_rows: HashSet<String>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeAttachments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_raw_output(mut self, row_id: &str, json: &str) -> Self {
        self.raw_outputs.insert(row_id.to_string(), json.to_string());
        self
    }

    pub fn with_missing_file(mut self, file_name: &str) -> Self {
        self.missing_files.insert(file_name.to_string());
        self
    }

    pub fn with_failing_row(mut self, row_id: &str) -> Self {
        self.failing_rows.insert(row_id.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl AttachmentResolver for FakeAttachments {
    fn list_row_attachments(&self, row_id: &str) -> Result<Vec<AttachmentInfo>, AttachmentError> {
        self.record(format!("list:{row_id}"));
        if self.failing_rows.contains(row_id) {
            return Err(AttachmentError::Transport(format!(
                "server refused listing of {row_id}"
            )));
        }
        Ok(vec![AttachmentInfo {
            filename: "photo.jpg".to_string(),
            content_type: Some("image/jpeg".to_string()),
            md5hash: None,
        }])
    }

    fn download_attachments(&self, row_id: &str, raw_output_only: bool) -> Result<(), AttachmentError> {
        self.record(format!("download:{row_id}:{raw_output_only}"));
        Ok(())
    }

    fn raw_output_stream(&self, row_id: &str) -> Result<Box<dyn Read + '_>, AttachmentError> {
        self.record(format!("raw:{row_id}"));
        match self.raw_outputs.get(row_id) {
            Some(json) => Ok(Box::new(json.as_bytes())),
            None => Err(AttachmentError::RawOutput {
                row_id: row_id.to_string(),
                message: "raw output not downloaded".to_string(),
            }),
        }
    }

    fn attachment_url(
        &self,
        row_id: &str,
        file_name: &str,
        _local: bool,
    ) -> Result<Option<String>, AttachmentError> {
        if self.missing_files.contains(file_name) {
            return Ok(None);
        }
        Ok(Some(format!("file:///export/{row_id}/{file_name}")))
    }
}
