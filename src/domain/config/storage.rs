use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum Provider {
    #[serde(rename = "local")]
    Local,
    #[serde(rename = "supabase")]
    Supabase,
}

impl std::str::FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(Provider::Local),
            "supabase" => Ok(Provider::Supabase),
            other => Err(format!("unknown storage provider '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    pub storage_url: String,
    pub api_key: String,
    pub bucket_name: String,
}

#[derive(Debug, Clone)]
pub enum StorageConfig {
    Local { root_dir: PathBuf },
    Supabase(SupabaseConfig),
}
