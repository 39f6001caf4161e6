use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::{
    application::error::ApplicationError,
    domain::{
        models::account::{Account, SubscriptionStatus},
        tier::Tier,
    },
};

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct AccountRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub tier: String,
    pub subscription_status: String,
    pub subscription_end_date: Option<DateTime<Utc>>,
    pub upload_count: i64,
    pub total_downloads: i64,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl TryFrom<AccountRow> for Account {
    type Error = ApplicationError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let tier = row
            .tier
            .parse::<Tier>()
            .map_err(ApplicationError::DatabaseError)?;
        let subscription_status = SubscriptionStatus::parse(&row.subscription_status)
            .map_err(ApplicationError::DatabaseError)?;

        Ok(Account {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            tier,
            subscription_status,
            subscription_end_date: row.subscription_end_date,
            upload_count: row.upload_count.max(0) as u64,
            total_downloads: row.total_downloads.max(0) as u64,
            created_at: row.created_at,
            last_login_at: row.last_login_at,
        })
    }
}
