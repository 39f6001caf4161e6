//! In-memory implementations of the repository and storage ports, plus
//! request helpers shared by the handler tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::http::{header, request::Builder, Request};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use http_body_util::BodyExt;
use uuid::Uuid;

use crate::{
    adapters::{auth::issue_token, state::AppState},
    application::{
        dto::{account_dto::NewAccount, file_record_dto::NewFileRecord},
        error::ApplicationError,
        repositories::{account_repository::AccountRepository, file_repository::FileRepository},
        services::{ByteStream, StorageService},
    },
    domain::{
        config::service::ServiceConfig,
        models::{
            account::{Account, SubscriptionStatus},
            file::FileData,
            file_record::FileRecord,
        },
        tier::{Tier, TierPolicyTable},
    },
};

#[derive(Default)]
pub struct InMemoryFileRepository {
    records: Mutex<Vec<FileRecord>>,
}

impl InMemoryFileRepository {
    pub fn get(&self, short_code: &str) -> Option<FileRecord> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.short_code == short_code)
            .cloned()
    }

    pub fn insert(&self, record: FileRecord) {
        self.records.lock().unwrap().push(record);
    }

    pub fn replace(&self, record: FileRecord) {
        let mut records = self.records.lock().unwrap();
        if let Some(existing) = records.iter_mut().find(|r| r.short_code == record.short_code) {
            *existing = record;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().unwrap().is_empty()
    }
}

#[async_trait]
impl FileRepository for InMemoryFileRepository {
    async fn create(&self, new: NewFileRecord) -> Result<FileRecord, ApplicationError> {
        let mut records = self.records.lock().unwrap();
        if records.iter().any(|r| r.short_code == new.short_code) {
            return Err(ApplicationError::Conflict);
        }

        let record = FileRecord {
            id: Uuid::new_v4(),
            short_code: new.short_code,
            storage_key: new.storage_key,
            original_name: new.original_name,
            file_size: new.file_size,
            mime_type: new.mime_type,
            security_pin: new.security_pin,
            owner_id: new.owner_id,
            tier: new.tier,
            created_at: Utc::now(),
            expires_at: new.expires_at,
            download_count: 0,
            last_accessed: None,
            qr_code: None,
        };
        records.push(record.clone());
        Ok(record)
    }

    async fn find_by_short_code(
        &self,
        short_code: &str,
    ) -> Result<Option<FileRecord>, ApplicationError> {
        Ok(self.get(short_code))
    }

    async fn attach_qr_code(
        &self,
        short_code: &str,
        qr_code: &str,
    ) -> Result<(), ApplicationError> {
        let mut records = self.records.lock().unwrap();
        if let Some(record) = records.iter_mut().find(|r| r.short_code == short_code) {
            record.qr_code = Some(qr_code.to_string());
        }
        Ok(())
    }

    async fn record_download(&self, short_code: &str) -> Result<FileRecord, ApplicationError> {
        let mut records = self.records.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|r| r.short_code == short_code)
            .ok_or(ApplicationError::NotFound)?;
        record.download_count += 1;
        record.last_accessed = Some(Utc::now());
        Ok(record.clone())
    }

    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Vec<FileRecord>, ApplicationError> {
        let mut owned: Vec<FileRecord> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.owner_id == Some(owner_id))
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn find_expired(&self) -> Result<Vec<FileRecord>, ApplicationError> {
        let now = Utc::now();
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.expires_at <= now)
            .cloned()
            .collect())
    }

    async fn delete(&self, short_code: &str) -> Result<(), ApplicationError> {
        self.records
            .lock()
            .unwrap()
            .retain(|r| r.short_code != short_code);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryAccountRepository {
    accounts: Mutex<Vec<Account>>,
}

impl InMemoryAccountRepository {
    pub fn get_by_email(&self, email: &str) -> Option<Account> {
        self.accounts
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.email == email)
            .cloned()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn create(&self, new: NewAccount) -> Result<Account, ApplicationError> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.iter().any(|a| a.email == new.email) {
            return Err(ApplicationError::BadRequest(
                "Email already registered".to_string(),
            ));
        }

        let account = Account {
            id: Uuid::new_v4(),
            email: new.email,
            password_hash: new.password_hash,
            tier: Tier::Free,
            subscription_status: SubscriptionStatus::None,
            subscription_end_date: None,
            upload_count: 0,
            total_downloads: 0,
            created_at: Utc::now(),
            last_login_at: None,
        };
        accounts.push(account.clone());
        Ok(account)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, ApplicationError> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == id)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, ApplicationError> {
        Ok(self.get_by_email(email))
    }

    async fn record_login(&self, id: Uuid) -> Result<(), ApplicationError> {
        if let Some(account) = self.accounts.lock().unwrap().iter_mut().find(|a| a.id == id) {
            account.last_login_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn record_upload(&self, id: Uuid) -> Result<(), ApplicationError> {
        if let Some(account) = self.accounts.lock().unwrap().iter_mut().find(|a| a.id == id) {
            account.upload_count += 1;
        }
        Ok(())
    }

    async fn add_downloads(&self, id: Uuid, count: u64) -> Result<(), ApplicationError> {
        if let Some(account) = self.accounts.lock().unwrap().iter_mut().find(|a| a.id == id) {
            account.total_downloads += count;
        }
        Ok(())
    }

    async fn upgrade_to_premium(
        &self,
        id: Uuid,
        subscription_end_date: DateTime<Utc>,
    ) -> Result<Account, ApplicationError> {
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(ApplicationError::NotFound)?;
        account.tier = Tier::Premium;
        account.subscription_status = SubscriptionStatus::Active;
        account.subscription_end_date = Some(subscription_end_date);
        Ok(account.clone())
    }
}

#[derive(Default)]
pub struct InMemoryStorage {
    objects: Mutex<HashMap<String, Vec<u8>>>,
}

impl InMemoryStorage {
    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.objects.lock().unwrap().contains_key(key)
    }

    pub fn insert(&self, key: &str, data: &[u8]) {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), data.to_vec());
    }

    pub fn remove(&self, key: &str) {
        self.objects.lock().unwrap().remove(key);
    }
}

#[async_trait]
impl StorageService for InMemoryStorage {
    async fn upload(&self, file_data: FileData) -> Result<String, ApplicationError> {
        let key = format!("{}/{}", Uuid::new_v4(), file_data.filename);
        self.insert(&key, &file_data.content);
        Ok(key)
    }

    async fn download(&self, storage_key: &str) -> Result<ByteStream, ApplicationError> {
        let data = self
            .objects
            .lock()
            .unwrap()
            .get(storage_key)
            .cloned()
            .ok_or(ApplicationError::NotFound)?;
        let stream = futures::stream::iter(vec![Ok(Bytes::from(data))]);
        Ok(Box::pin(stream) as ByteStream)
    }

    async fn delete(&self, storage_key: &str) -> Result<(), ApplicationError> {
        self.remove(storage_key);
        Ok(())
    }
}

pub fn test_state() -> (
    AppState,
    Arc<InMemoryFileRepository>,
    Arc<InMemoryAccountRepository>,
    Arc<InMemoryStorage>,
) {
    let files = Arc::new(InMemoryFileRepository::default());
    let accounts = Arc::new(InMemoryAccountRepository::default());
    let storage = Arc::new(InMemoryStorage::default());

    let state = AppState {
        config: Arc::new(ServiceConfig {
            public_origin: None,
            jwt_secret: "test-secret".to_string(),
            admin_secret: "test-admin".to_string(),
            sweep_interval_secs: 900,
        }),
        tiers: Arc::new(TierPolicyTable::builtin()),
        file_repository: files.clone() as Arc<dyn FileRepository>,
        account_repository: accounts.clone() as Arc<dyn AccountRepository>,
        storage_service: storage.clone() as Arc<dyn StorageService>,
    };

    (state, files, accounts, storage)
}

/// Seeds a record and its bytes directly, bypassing the upload handler, so
/// tests can control expiry and PIN exactly.
pub async fn seed_record(
    files: &Arc<InMemoryFileRepository>,
    storage: &Arc<InMemoryStorage>,
    short_code: &str,
    data: &[u8],
    expires_at: DateTime<Utc>,
    pin: Option<&str>,
) -> FileRecord {
    let storage_key = format!("seed/{}", short_code);
    storage.insert(&storage_key, data);

    let record = FileRecord {
        id: Uuid::new_v4(),
        short_code: short_code.to_string(),
        storage_key,
        original_name: format!("file-{}", short_code),
        file_size: data.len() as u64,
        mime_type: "application/octet-stream".to_string(),
        security_pin: pin.map(str::to_string),
        owner_id: None,
        tier: Tier::Anonymous,
        created_at: Utc::now(),
        expires_at,
        download_count: 0,
        last_accessed: None,
        qr_code: None,
    };
    files.insert(record.clone());
    record
}

/// Registers an account straight through the repository and returns a bearer
/// token for it.
pub async fn register_account(
    accounts: &Arc<InMemoryAccountRepository>,
    state: &AppState,
    email: &str,
) -> String {
    let account = accounts
        .create(NewAccount {
            email: email.to_string(),
            password_hash: "unused-in-these-tests".to_string(),
        })
        .await
        .unwrap();
    issue_token(&account, &state.config.jwt_secret).unwrap()
}

pub const MULTIPART_BOUNDARY: &str = "qs-test-boundary";

pub fn multipart_upload_body(
    filename: &str,
    content_type: &str,
    data: &[u8],
    pin: Option<&str>,
) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", MULTIPART_BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
            filename, content_type
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(b"\r\n");
    if let Some(pin) = pin {
        body.extend_from_slice(format!("--{}\r\n", MULTIPART_BOUNDARY).as_bytes());
        body.extend_from_slice(b"Content-Disposition: form-data; name=\"securityPin\"\r\n\r\n");
        body.extend_from_slice(pin.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", MULTIPART_BOUNDARY).as_bytes());
    body
}

pub fn upload_request() -> Builder {
    Request::builder()
        .method("POST")
        .uri("/api/files/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", MULTIPART_BOUNDARY),
        )
}

pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
