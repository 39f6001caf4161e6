use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    application::{dto::account_dto::NewAccount, error::ApplicationError},
    domain::models::account::Account,
};

#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Returns `BadRequest` when the email is already registered.
    async fn create(&self, account: NewAccount) -> Result<Account, ApplicationError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, ApplicationError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, ApplicationError>;

    async fn record_login(&self, id: Uuid) -> Result<(), ApplicationError>;

    async fn record_upload(&self, id: Uuid) -> Result<(), ApplicationError>;

    async fn add_downloads(&self, id: Uuid, count: u64) -> Result<(), ApplicationError>;

    async fn upgrade_to_premium(
        &self,
        id: Uuid,
        subscription_end_date: DateTime<Utc>,
    ) -> Result<Account, ApplicationError>;
}
