mod error;
mod local_storage;
mod supabase_storage;

pub use error::StorageError;
pub use local_storage::LocalStorageService;
pub use supabase_storage::SupabaseStorageService;

use std::sync::Arc;

use crate::{application::services::StorageService, domain::config::storage::StorageConfig};

pub async fn create_storage_service(
    config: &StorageConfig,
) -> Result<Arc<dyn StorageService>, StorageError> {
    match config {
        StorageConfig::Local { root_dir } => {
            let service = LocalStorageService::new(root_dir.clone()).await?;
            Ok(Arc::new(service))
        }
        StorageConfig::Supabase(supabase) => {
            let service = SupabaseStorageService::new(supabase.clone());
            Ok(Arc::new(service))
        }
    }
}
