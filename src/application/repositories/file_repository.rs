use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    application::{dto::file_record_dto::NewFileRecord, error::ApplicationError},
    domain::models::file_record::FileRecord,
};

#[async_trait]
pub trait FileRepository: Send + Sync {
    /// Returns `Conflict` on a short-code collision so the caller can retry
    /// with a fresh code.
    async fn create(&self, record: NewFileRecord) -> Result<FileRecord, ApplicationError>;

    async fn find_by_short_code(
        &self,
        short_code: &str,
    ) -> Result<Option<FileRecord>, ApplicationError>;

    async fn attach_qr_code(
        &self,
        short_code: &str,
        qr_code: &str,
    ) -> Result<(), ApplicationError>;

    /// Single atomic update: `download_count + 1` and `last_accessed = now`.
    /// Never read-then-write; concurrent downloads must not lose counts.
    async fn record_download(&self, short_code: &str) -> Result<FileRecord, ApplicationError>;

    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Vec<FileRecord>, ApplicationError>;

    async fn find_expired(&self) -> Result<Vec<FileRecord>, ApplicationError>;

    async fn delete(&self, short_code: &str) -> Result<(), ApplicationError>;
}
