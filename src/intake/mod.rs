use std::io;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::NaiveDate;
use thiserror::Error;

use crate::store::{CertificateRecord, NO_ATTACHMENT};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewCertificate {
    pub title: String,
    pub provider: String,
    pub issue_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub attachment: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("failed to read attachment '{path}': {source}")]
    AttachmentRead {
        path: String,
        #[source]
        source: io::Error,
    },
}

pub async fn build_record(input: NewCertificate) -> Result<CertificateRecord, IntakeError> {
    let file_url = match &input.attachment {
        Some(path) => encode_attachment(path).await?,
        None => NO_ATTACHMENT.to_string(),
    };
    Ok(CertificateRecord {
        title: input.title,
        provider: input.provider,
        issue_date: input.issue_date,
        expiry_date: input.expiry_date,
        file_url,
    })
}

pub async fn encode_attachment(path: &Path) -> Result<String, IntakeError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| IntakeError::AttachmentRead {
            path: path.display().to_string(),
            source: e,
        })?;
    Ok(format!(
        "data:{};base64,{}",
        mime_for(path),
        STANDARD.encode(bytes)
    ))
}

// Extension lookup only, the attachment content stays opaque.
fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());
    match ext.as_deref() {
        Some("pdf") => "application/pdf",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}
