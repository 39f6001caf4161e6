use std::fmt;
use std::str::FromStr;

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Account category determining upload size and link retention limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Anonymous,
    Free,
    Premium,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Anonymous => "anonymous",
            Tier::Free => "free",
            Tier::Premium => "premium",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "anonymous" => Ok(Tier::Anonymous),
            "free" => Ok(Tier::Free),
            "premium" => Ok(Tier::Premium),
            other => Err(format!("unknown tier '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TierPolicy {
    pub max_upload_bytes: u64,
    pub link_validity: Duration,
}

/// Read-only tier limits table, shared by upload and download handling.
/// Every representable `Tier` has an entry, so lookups cannot fail.
#[derive(Debug, Clone)]
pub struct TierPolicyTable {
    anonymous: TierPolicy,
    free: TierPolicy,
    premium: TierPolicy,
}

impl TierPolicyTable {
    pub fn builtin() -> Self {
        Self {
            anonymous: TierPolicy {
                max_upload_bytes: 5 * 1024 * 1024,
                link_validity: Duration::days(1),
            },
            free: TierPolicy {
                max_upload_bytes: 50 * 1024 * 1024,
                link_validity: Duration::days(7),
            },
            premium: TierPolicy {
                max_upload_bytes: 500 * 1024 * 1024,
                link_validity: Duration::days(30),
            },
        }
    }

    pub fn policy(&self, tier: Tier) -> TierPolicy {
        match tier {
            Tier::Anonymous => self.anonymous,
            Tier::Free => self.free,
            Tier::Premium => self.premium,
        }
    }

    /// Largest upload any tier accepts, used to size the request body limit.
    pub fn max_upload_bytes(&self) -> u64 {
        [self.anonymous, self.free, self.premium]
            .iter()
            .map(|p| p.max_upload_bytes)
            .max()
            .unwrap_or(0)
    }
}
