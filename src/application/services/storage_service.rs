use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;

use crate::{application::error::ApplicationError, domain::models::file::FileData};

pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

#[async_trait]
pub trait StorageService: Send + Sync {
    /// Writes the bytes and returns the opaque storage key that owns them.
    async fn upload(&self, file_data: FileData) -> Result<String, ApplicationError>;

    /// Opens a byte stream for the key; `NotFound` when the bytes are gone.
    async fn download(&self, storage_key: &str) -> Result<ByteStream, ApplicationError>;

    async fn delete(&self, storage_key: &str) -> Result<(), ApplicationError>;
}
