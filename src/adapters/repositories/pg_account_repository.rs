use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::query_as;
use uuid::Uuid;

use crate::{
    application::{
        dto::account_dto::{AccountRow, NewAccount},
        error::ApplicationError,
        repositories::account_repository::AccountRepository,
    },
    domain::models::account::Account,
};

pub struct PgAccountRepository {
    pool: sqlx::PgPool,
}

impl PgAccountRepository {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

fn map_db_error(e: sqlx::Error) -> ApplicationError {
    ApplicationError::DatabaseError(e.to_string())
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    async fn create(&self, account: NewAccount) -> Result<Account, ApplicationError> {
        let query = r#"
            INSERT INTO accounts (email, password_hash)
            VALUES ($1, $2)
            RETURNING *
        "#;

        let created: AccountRow = query_as::<_, AccountRow>(query)
            .bind(&account.email)
            .bind(&account.password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    ApplicationError::BadRequest("Email already registered".to_string())
                }
                _ => map_db_error(e),
            })?;

        created.try_into()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, ApplicationError> {
        let query = "SELECT * FROM accounts WHERE id = $1";

        let row: Option<AccountRow> = query_as::<_, AccountRow>(query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        row.map(TryInto::try_into).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, ApplicationError> {
        let query = "SELECT * FROM accounts WHERE email = $1";

        let row: Option<AccountRow> = query_as::<_, AccountRow>(query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        row.map(TryInto::try_into).transpose()
    }

    async fn record_login(&self, id: Uuid) -> Result<(), ApplicationError> {
        sqlx::query("UPDATE accounts SET last_login_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(())
    }

    async fn record_upload(&self, id: Uuid) -> Result<(), ApplicationError> {
        sqlx::query("UPDATE accounts SET upload_count = upload_count + 1 WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(())
    }

    async fn add_downloads(&self, id: Uuid, count: u64) -> Result<(), ApplicationError> {
        sqlx::query("UPDATE accounts SET total_downloads = total_downloads + $2 WHERE id = $1")
            .bind(id)
            .bind(count as i64)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(())
    }

    async fn upgrade_to_premium(
        &self,
        id: Uuid,
        subscription_end_date: DateTime<Utc>,
    ) -> Result<Account, ApplicationError> {
        let query = r#"
            UPDATE accounts
            SET tier = 'premium',
                subscription_status = 'active',
                subscription_end_date = $2
            WHERE id = $1
            RETURNING *
        "#;

        let row: Option<AccountRow> = query_as::<_, AccountRow>(query)
            .bind(id)
            .bind(subscription_end_date)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        row.ok_or(ApplicationError::NotFound)?.try_into()
    }
}
