use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::domain::tier::Tier;

/// One uploaded artifact. The short code is the public identifier used in
/// share links; the storage key points at the bytes and is never exposed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: Uuid,
    pub short_code: String,
    pub storage_key: String,
    pub original_name: String,
    pub file_size: u64,
    pub mime_type: String,
    pub security_pin: Option<String>,
    pub owner_id: Option<Uuid>,
    pub tier: Tier,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub download_count: u64,
    pub last_accessed: Option<DateTime<Utc>>,
    pub qr_code: Option<String>,
}

impl FileRecord {
    /// A record past its expiry is logically dead regardless of whether the
    /// row or the bytes still exist; every read path checks this first.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    pub fn requires_pin(&self) -> bool {
        self.security_pin.is_some()
    }

    pub fn pin_matches(&self, submitted: Option<&str>) -> bool {
        match (&self.security_pin, submitted) {
            (None, _) => true,
            (Some(expected), Some(given)) => {
                expected.as_bytes().ct_eq(given.as_bytes()).into()
            }
            (Some(_), None) => false,
        }
    }
}
