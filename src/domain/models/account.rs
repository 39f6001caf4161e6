use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::tier::Tier;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Active,
    Expired,
    None,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Expired => "expired",
            SubscriptionStatus::None => "none",
        }
    }

    pub fn parse(s: &str) -> Result<Self, String> {
        match s {
            "active" => Ok(SubscriptionStatus::Active),
            "expired" => Ok(SubscriptionStatus::Expired),
            "none" => Ok(SubscriptionStatus::None),
            other => Err(format!("unknown subscription status '{}'", other)),
        }
    }
}

/// Registered user. The password hash never leaves this process; response
/// DTOs carry everything else.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub tier: Tier,
    pub subscription_status: SubscriptionStatus,
    pub subscription_end_date: Option<DateTime<Utc>>,
    pub upload_count: u64,
    pub total_downloads: u64,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl Account {
    pub fn is_premium(&self) -> bool {
        self.tier == Tier::Premium && self.subscription_status == SubscriptionStatus::Active
    }

    /// Tier used for limit checks. A premium account whose subscription end
    /// date has passed counts as Free at read time, without waiting for a
    /// write-back.
    pub fn effective_tier(&self, now: DateTime<Utc>) -> Tier {
        if self.tier == Tier::Premium {
            if let Some(end) = self.subscription_end_date {
                if end < now {
                    return Tier::Free;
                }
            }
        }
        self.tier
    }
}
