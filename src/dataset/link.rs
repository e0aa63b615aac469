//! Spreadsheet hyperlinks to row attachments.

use crate::attachment::AttachmentResolver;
use crate::config::ServerInfo;
use crate::error::AttachmentError;

/// Cell text used when a local attachment is missing on the server.
pub const MISSING_ATTACHMENT: &str = "File is missing on Aggregate server.";

/// Wraps `url` in a spreadsheet `HYPERLINK` formula.
#[must_use]
pub fn hyperlink(url: &str) -> String {
    format!("=HYPERLINK(\"{url}\", \"Ctrl + Click to view\")")
}

/// Server URL of an attachment, derived without any network call.
#[must_use]
pub fn remote_attachment_url(
    server: &ServerInfo,
    table_id: &str,
    row_id: &str,
    file_name: &str,
) -> String {
    format!(
        "{}/tables/{}/{}/ref/{}/attachments/{}/file/{}",
        server.server_url(),
        server.app_id(),
        table_id,
        server.schema_etag(table_id).unwrap_or_default(),
        row_id,
        file_name
    )
}

/// Builds the display value of a link column.
///
/// With `local` set the URL comes from the resolver and a missing file, given
/// as `Ok(None)` or [`AttachmentError::NotFound`], turns into
/// [`MISSING_ATTACHMENT`]; otherwise the server URL is synthesized.
pub fn make_link(
    resolver: &dyn AttachmentResolver,
    server: &ServerInfo,
    table_id: &str,
    row_id: &str,
    file_name: &str,
    local: bool,
) -> Result<String, AttachmentError> {
    if !local {
        let url = remote_attachment_url(server, table_id, row_id, file_name);
        return Ok(hyperlink(&url));
    }

    match resolver.attachment_url(row_id, file_name, true) {
        Ok(Some(url)) => Ok(hyperlink(&url)),
        Ok(None) | Err(AttachmentError::NotFound { .. }) => Ok(MISSING_ATTACHMENT.to_string()),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use super::*;
    use crate::attachment::{AttachmentInfo, NoAttachments};

    struct LocalFiles;

    impl AttachmentResolver for LocalFiles {
        fn list_row_attachments(
            &self,
            _row_id: &str,
        ) -> Result<Vec<AttachmentInfo>, AttachmentError> {
            Ok(Vec::new())
        }

        fn download_attachments(&self, _row_id: &str, _raw: bool) -> Result<(), AttachmentError> {
            Ok(())
        }

        fn raw_output_stream(&self, _row_id: &str) -> Result<Box<dyn Read + '_>, AttachmentError> {
            Ok(Box::new(&b"{}"[..]))
        }

        fn attachment_url(
            &self,
            row_id: &str,
            file_name: &str,
            _local: bool,
        ) -> Result<Option<String>, AttachmentError> {
            if file_name == "broken.jpg" {
                return Err(AttachmentError::Transport("timed out".to_string()));
            }
            if file_name == "gone.jpg" {
                return Err(AttachmentError::NotFound {
                    row_id: row_id.to_string(),
                    file_name: file_name.to_string(),
                });
            }
            Ok(Some(format!("file:///data/{row_id}/{file_name}")))
        }
    }

    fn server() -> ServerInfo {
        ServerInfo::new("https://host", "app1").with_table("t1", "etag123")
    }

    #[test]
    fn test_remote_link() {
        let link = make_link(&NoAttachments, &server(), "t1", "row1", "photo.jpg", false).unwrap();
        assert_eq!(
            link,
            "=HYPERLINK(\"https://host/tables/app1/t1/ref/etag123/attachments/row1/file/photo.jpg\", \"Ctrl + Click to view\")"
        );
    }

    #[test]
    fn test_local_link() {
        let link = make_link(&LocalFiles, &server(), "t1", "row1", "photo.jpg", true).unwrap();
        assert_eq!(
            link,
            "=HYPERLINK(\"file:///data/row1/photo.jpg\", \"Ctrl + Click to view\")"
        );
    }

    #[test]
    fn test_local_link_missing_file() {
        let link = make_link(&NoAttachments, &server(), "t1", "row1", "photo.jpg", true).unwrap();
        assert_eq!(link, MISSING_ATTACHMENT);
    }

    #[test]
    fn test_local_link_not_found_error() {
        let link = make_link(&LocalFiles, &server(), "t1", "row1", "gone.jpg", true).unwrap();
        assert_eq!(link, MISSING_ATTACHMENT);
    }

    #[test]
    fn test_local_link_resolver_failure() {
        let result = make_link(&LocalFiles, &server(), "t1", "row1", "broken.jpg", true);
        assert!(matches!(result, Err(AttachmentError::Transport(_))));
    }
}
