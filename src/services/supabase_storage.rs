use async_trait::async_trait;
use futures::TryStreamExt;
use reqwest::{multipart, Client};

use crate::{
    application::{
        error::ApplicationError,
        services::{ByteStream, StorageService},
    },
    domain::{config::storage::SupabaseConfig, models::file::FileData},
    services::{error::StorageError, local_storage::sanitize_filename},
};

pub struct SupabaseStorageService {
    client: Client,
    storage_url: String,
    api_key: String,
    bucket_name: String,
}

impl SupabaseStorageService {
    pub fn new(config: SupabaseConfig) -> Self {
        Self {
            client: Client::new(),
            storage_url: config.storage_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
            bucket_name: config.bucket_name,
        }
    }

    fn generate_key(filename: &str) -> String {
        use std::time::{SystemTime, UNIX_EPOCH};
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();

        format!("{}/{}", timestamp, sanitize_filename(filename))
    }

    fn object_url(&self, storage_key: &str) -> String {
        format!(
            "{}/object/{}/{}",
            self.storage_url, self.bucket_name, storage_key
        )
    }
}

#[async_trait]
impl StorageService for SupabaseStorageService {
    async fn upload(&self, file_data: FileData) -> Result<String, ApplicationError> {
        let storage_key = Self::generate_key(&file_data.filename);

        let file_part = multipart::Part::bytes(file_data.content.clone())
            .file_name(file_data.filename.clone())
            .mime_str(&file_data.mime_type)
            .map_err(|e| StorageError::InternalError(e.to_string()))?;

        let form = multipart::Form::new().part("file", file_part);

        let response = self
            .client
            .post(self.object_url(&storage_key))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("apikey", &self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(StorageError::from)?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(
                StorageError::ProviderError(format!("Upload failed: {}", error_text)).into(),
            );
        }

        Ok(storage_key)
    }

    async fn download(&self, storage_key: &str) -> Result<ByteStream, ApplicationError> {
        let response = self
            .client
            .get(self.object_url(storage_key))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("apikey", &self.api_key)
            .send()
            .await
            .map_err(StorageError::from)?;

        if response.status().as_u16() == 404 {
            return Err(StorageError::NotFound(storage_key.to_string()).into());
        }

        if !response.status().is_success() {
            return Err(StorageError::ProviderError(format!(
                "Download failed with status: {}",
                response.status()
            ))
            .into());
        }

        let stream = response.bytes_stream().map_err(std::io::Error::other);
        Ok(Box::pin(stream) as ByteStream)
    }

    async fn delete(&self, storage_key: &str) -> Result<(), ApplicationError> {
        let response = self
            .client
            .delete(self.object_url(storage_key))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("apikey", &self.api_key)
            .send()
            .await
            .map_err(StorageError::from)?;

        // Missing objects are treated as already deleted; the expiry sweep
        // re-runs this path after partial failures.
        if response.status().as_u16() == 404 {
            return Ok(());
        }

        if !response.status().is_success() {
            return Err(StorageError::ProviderError(format!(
                "Delete failed with status: {}",
                response.status()
            ))
            .into());
        }

        Ok(())
    }
}
