// SPDX-License-Identifier: GPL-3.0-only

//! Sending a generated barcode
//!
//! The barcode is written as a PNG into the barcode directory, then a
//! `mailto:` link carrying the text is handed to the desktop. The PNG path
//! is reported so it can be attached by hand.

use super::encoder::QrCodeEncoder;
use crate::constants::{APP_NAME, barcode::SHARE_MIME_TYPE};
use crate::errors::{AppError, AppResult, ShareError};
use crate::storage;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Everything needed to send a barcode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareRequest {
    pub subject: String,
    pub text: String,
    pub attachment: PathBuf,
    pub mime: &'static str,
}

impl ShareRequest {
    pub fn new(title: &str, text: &str, attachment: PathBuf) -> Self {
        Self {
            subject: format!("{} - {}", APP_NAME, title),
            text: text.to_string(),
            attachment,
            mime: SHARE_MIME_TYPE,
        }
    }

    pub fn mailto_uri(&self) -> String {
        format!(
            "mailto:?subject={}&body={}",
            urlencoding::encode(&self.subject),
            urlencoding::encode(&self.text)
        )
    }
}

/// Save the barcode under `dir` and build the request to send it
///
/// Returns `Ok(None)` when there is nothing to send.
pub fn prepare_share(
    encoder: Option<&QrCodeEncoder>,
    dir: Option<&Path>,
) -> Result<Option<ShareRequest>, ShareError> {
    let Some(encoder) = encoder.filter(|e| !e.contents().is_empty()) else {
        warn!("No existing barcode to send?");
        return Ok(None);
    };

    let dir = dir.ok_or_else(|| {
        ShareError::StorageUnavailable("no pictures or home directory".to_string())
    })?;
    let path = storage::save_barcode(encoder.image(), dir, encoder.contents())?;

    let title = encoder.request().contents_type.title();
    Ok(Some(ShareRequest::new(title, encoder.contents(), path)))
}

/// Hand the request to the default mail client
pub fn send(request: &ShareRequest) -> AppResult<()> {
    let uri = request.mailto_uri();
    info!(
        attachment = %request.attachment.display(),
        mime = request.mime,
        "Opening mail client"
    );
    open::that(&uri).map_err(|e| AppError::Other(format!("Failed to open {}: {}", uri, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::intents::EncodeRequest;

    #[test]
    fn test_share_request_fields() {
        let request = ShareRequest::new("Text", "hi there", PathBuf::from("/tmp/hi.png"));
        assert_eq!(request.subject, "QR Scanner - Text");
        assert_eq!(request.mime, "image/png");
        assert_eq!(
            request.mailto_uri(),
            "mailto:?subject=QR%20Scanner%20-%20Text&body=hi%20there"
        );
    }

    #[test]
    fn test_nothing_to_share() {
        assert_eq!(prepare_share(None, None).unwrap(), None);
    }

    #[test]
    fn test_missing_directory_is_error() {
        let encoder = QrCodeEncoder::new(EncodeRequest::text("x").unwrap(), 40).unwrap();
        assert!(matches!(
            prepare_share(Some(&encoder), None),
            Err(ShareError::StorageUnavailable(_))
        ));
    }

    #[test]
    fn test_prepare_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("Barcodes");
        let encoder =
            QrCodeEncoder::new(EncodeRequest::text("https://example.com").unwrap(), 40).unwrap();

        let request = prepare_share(Some(&encoder), Some(&target))
            .unwrap()
            .unwrap();
        assert_eq!(request.attachment, target.join("https___example_com.png"));
        assert!(request.attachment.exists());
        assert_eq!(request.text, "https://example.com");
    }
}
