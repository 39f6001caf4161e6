use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::models::file_record::FileRecord;

#[derive(Debug, Serialize)]
pub struct UploadFileResponse {
    pub message: String,
    pub file: UploadedFile,
}

#[derive(Debug, Serialize)]
pub struct UploadedFile {
    pub id: Uuid,
    #[serde(rename = "originalName")]
    pub original_name: String,
    #[serde(rename = "shortUrl")]
    pub short_url: String,
    #[serde(rename = "shareUrl")]
    pub share_url: String,
    #[serde(rename = "qrCode")]
    pub qr_code: Option<String>,
    #[serde(rename = "expiresAt")]
    pub expires_at: DateTime<Utc>,
    #[serde(rename = "fileSize")]
    pub file_size: u64,
}

impl UploadedFile {
    pub fn from_record(record: FileRecord, share_url: String) -> Self {
        Self {
            id: record.id,
            original_name: record.original_name,
            short_url: record.short_code,
            share_url,
            qr_code: record.qr_code,
            expires_at: record.expires_at,
            file_size: record.file_size,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FileInfoResponse {
    pub file: FileInfo,
}

/// Public metadata only: the PIN itself and the storage key never appear,
/// recipients just learn whether a PIN is required.
#[derive(Debug, Serialize)]
pub struct FileInfo {
    pub id: Uuid,
    #[serde(rename = "originalName")]
    pub original_name: String,
    #[serde(rename = "fileSize")]
    pub file_size: u64,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    #[serde(rename = "requiresPin")]
    pub requires_pin: bool,
    #[serde(rename = "expiresAt")]
    pub expires_at: DateTime<Utc>,
    #[serde(rename = "downloadCount")]
    pub download_count: u64,
    #[serde(rename = "shortUrl")]
    pub short_url: String,
    #[serde(rename = "shareUrl")]
    pub share_url: String,
    #[serde(rename = "qrCode")]
    pub qr_code: Option<String>,
}

impl FileInfo {
    pub fn from_record(record: FileRecord, share_url: String) -> Self {
        Self {
            id: record.id,
            original_name: record.original_name,
            file_size: record.file_size,
            mime_type: record.mime_type,
            requires_pin: record.security_pin.is_some(),
            expires_at: record.expires_at,
            download_count: record.download_count,
            short_url: record.short_code,
            share_url,
            qr_code: record.qr_code,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DownloadRequest {
    pub pin: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CleanupResponse {
    #[serde(rename = "deletedCount")]
    pub deleted_count: usize,
    pub errors: Vec<String>,
}
