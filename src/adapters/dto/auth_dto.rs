use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::models::account::{Account, SubscriptionStatus};
use crate::domain::tier::Tier;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: AccountResponse,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: AccountResponse,
}

/// Everything about an account except the password hash.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub id: Uuid,
    pub email: String,
    pub tier: Tier,
    #[serde(rename = "subscriptionStatus")]
    pub subscription_status: SubscriptionStatus,
    #[serde(rename = "subscriptionEndDate")]
    pub subscription_end_date: Option<DateTime<Utc>>,
    #[serde(rename = "uploadCount")]
    pub upload_count: u64,
    #[serde(rename = "totalDownloads")]
    pub total_downloads: u64,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "lastLoginAt")]
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            email: account.email,
            tier: account.tier,
            subscription_status: account.subscription_status,
            subscription_end_date: account.subscription_end_date,
            upload_count: account.upload_count,
            total_downloads: account.total_downloads,
            created_at: account.created_at,
            last_login_at: account.last_login_at,
        }
    }
}
