use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::{
    application::error::ApplicationError,
    domain::{models::file_record::FileRecord, tier::Tier},
};

/// Fields the upload handler supplies when persisting a new record; the
/// database fills id, created_at and the counters.
#[derive(Debug, Clone)]
pub struct NewFileRecord {
    pub short_code: String,
    pub storage_key: String,
    pub original_name: String,
    pub file_size: u64,
    pub mime_type: String,
    pub security_pin: Option<String>,
    pub owner_id: Option<Uuid>,
    pub tier: Tier,
    pub expires_at: DateTime<Utc>,
}

/// Row image of `file_records`. Numeric columns are i64 on the wire and
/// widen back to u64 at the domain edge.
#[derive(Debug, Clone, FromRow)]
pub struct FileRecordRow {
    pub id: Uuid,
    pub short_code: String,
    pub storage_key: String,
    pub original_name: String,
    pub file_size: i64,
    pub mime_type: String,
    pub security_pin: Option<String>,
    pub owner_id: Option<Uuid>,
    pub tier: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub download_count: i64,
    pub last_accessed: Option<DateTime<Utc>>,
    pub qr_code: Option<String>,
}

impl TryFrom<FileRecordRow> for FileRecord {
    type Error = ApplicationError;

    fn try_from(row: FileRecordRow) -> Result<Self, Self::Error> {
        let tier = row
            .tier
            .parse::<Tier>()
            .map_err(ApplicationError::DatabaseError)?;

        Ok(FileRecord {
            id: row.id,
            short_code: row.short_code,
            storage_key: row.storage_key,
            original_name: row.original_name,
            file_size: row.file_size.max(0) as u64,
            mime_type: row.mime_type,
            security_pin: row.security_pin,
            owner_id: row.owner_id,
            tier,
            created_at: row.created_at,
            expires_at: row.expires_at,
            download_count: row.download_count.max(0) as u64,
            last_accessed: row.last_accessed,
            qr_code: row.qr_code,
        })
    }
}
