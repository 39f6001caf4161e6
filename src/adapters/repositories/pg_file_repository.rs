use async_trait::async_trait;
use sqlx::query_as;
use uuid::Uuid;

use crate::{
    application::{
        dto::file_record_dto::{FileRecordRow, NewFileRecord},
        error::ApplicationError,
        repositories::file_repository::FileRepository,
    },
    domain::models::file_record::FileRecord,
};

pub struct PgFileRepository {
    pool: sqlx::PgPool,
}

impl PgFileRepository {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

fn map_db_error(e: sqlx::Error) -> ApplicationError {
    ApplicationError::DatabaseError(e.to_string())
}

#[async_trait]
impl FileRepository for PgFileRepository {
    async fn create(&self, record: NewFileRecord) -> Result<FileRecord, ApplicationError> {
        let query = r#"
            INSERT INTO file_records (
                short_code, storage_key, original_name, file_size, mime_type,
                security_pin, owner_id, tier, expires_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
        "#;

        let created: FileRecordRow = query_as::<_, FileRecordRow>(query)
            .bind(&record.short_code)
            .bind(&record.storage_key)
            .bind(&record.original_name)
            .bind(record.file_size as i64)
            .bind(&record.mime_type)
            .bind(&record.security_pin)
            .bind(record.owner_id)
            .bind(record.tier.as_str())
            .bind(record.expires_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    ApplicationError::Conflict
                }
                _ => map_db_error(e),
            })?;

        created.try_into()
    }

    async fn find_by_short_code(
        &self,
        short_code: &str,
    ) -> Result<Option<FileRecord>, ApplicationError> {
        let query = "SELECT * FROM file_records WHERE short_code = $1";

        let row: Option<FileRecordRow> = query_as::<_, FileRecordRow>(query)
            .bind(short_code)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        row.map(TryInto::try_into).transpose()
    }

    async fn attach_qr_code(
        &self,
        short_code: &str,
        qr_code: &str,
    ) -> Result<(), ApplicationError> {
        let query = "UPDATE file_records SET qr_code = $2 WHERE short_code = $1";

        sqlx::query(query)
            .bind(short_code)
            .bind(qr_code)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(())
    }

    async fn record_download(&self, short_code: &str) -> Result<FileRecord, ApplicationError> {
        // Single statement so concurrent downloads never lose an increment.
        let query = r#"
            UPDATE file_records
            SET download_count = download_count + 1,
                last_accessed = NOW()
            WHERE short_code = $1
            RETURNING *
        "#;

        let row: Option<FileRecordRow> = query_as::<_, FileRecordRow>(query)
            .bind(short_code)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        row.ok_or(ApplicationError::NotFound)?.try_into()
    }

    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Vec<FileRecord>, ApplicationError> {
        let query = "SELECT * FROM file_records WHERE owner_id = $1 ORDER BY created_at DESC";

        let rows: Vec<FileRecordRow> = query_as::<_, FileRecordRow>(query)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn find_expired(&self) -> Result<Vec<FileRecord>, ApplicationError> {
        let query = "SELECT * FROM file_records WHERE expires_at <= NOW()";

        let rows: Vec<FileRecordRow> = query_as::<_, FileRecordRow>(query)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn delete(&self, short_code: &str) -> Result<(), ApplicationError> {
        let query = "DELETE FROM file_records WHERE short_code = $1";

        sqlx::query(query)
            .bind(short_code)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(())
    }
}
