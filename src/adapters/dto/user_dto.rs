use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::adapters::dto::auth_dto::AccountResponse;
use crate::domain::models::file_record::FileRecord;

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: AccountResponse,
}

#[derive(Debug, Serialize)]
pub struct UserFilesResponse {
    pub files: Vec<OwnedFile>,
}

/// A record as shown in the owner's dashboard; the storage key and PIN stay
/// server-side.
#[derive(Debug, Serialize)]
pub struct OwnedFile {
    pub id: Uuid,
    #[serde(rename = "originalName")]
    pub original_name: String,
    #[serde(rename = "fileSize")]
    pub file_size: u64,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    #[serde(rename = "shortUrl")]
    pub short_url: String,
    #[serde(rename = "requiresPin")]
    pub requires_pin: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "expiresAt")]
    pub expires_at: DateTime<Utc>,
    #[serde(rename = "downloadCount")]
    pub download_count: u64,
    #[serde(rename = "lastAccessed")]
    pub last_accessed: Option<DateTime<Utc>>,
    #[serde(rename = "qrCode")]
    pub qr_code: Option<String>,
}

impl From<FileRecord> for OwnedFile {
    fn from(record: FileRecord) -> Self {
        Self {
            id: record.id,
            original_name: record.original_name,
            file_size: record.file_size,
            mime_type: record.mime_type,
            short_url: record.short_code,
            requires_pin: record.security_pin.is_some(),
            created_at: record.created_at,
            expires_at: record.expires_at,
            download_count: record.download_count,
            last_accessed: record.last_accessed,
            qr_code: record.qr_code,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub analytics: Analytics,
}

#[derive(Debug, Serialize)]
pub struct Analytics {
    #[serde(rename = "totalUploads")]
    pub total_uploads: usize,
    #[serde(rename = "totalDownloads")]
    pub total_downloads: u64,
    #[serde(rename = "totalSize")]
    pub total_size: u64,
    #[serde(rename = "activeFiles")]
    pub active_files: usize,
}

#[derive(Debug, Serialize)]
pub struct UpgradeResponse {
    pub message: String,
    pub user: AccountResponse,
}
