use axum::{
    body::Body,
    extract::{Multipart, Path, State},
    http::{header, HeaderMap, StatusCode},
    response::Response,
    Json,
};
use chrono::Utc;
use subtle::ConstantTimeEq;
use tracing::{info, warn};

use crate::{
    adapters::{
        auth::MaybeAuthAccount,
        dto::file_dto::{
            CleanupResponse, DownloadRequest, FileInfo, FileInfoResponse, UploadFileResponse,
            UploadedFile,
        },
        origin::{resolve_origin, share_url},
        qr, short_code,
        state::AppState,
    },
    application::{dto::file_record_dto::NewFileRecord, error::ApplicationError},
    domain::{
        models::{file::FileData, file_record::FileRecord},
        tier::Tier,
    },
    sweeper,
};

const SHORT_CODE_ATTEMPTS: usize = 3;

pub struct FileController;

impl FileController {
    /// POST /api/files/upload
    /// Multipart body: "file" plus optional "securityPin". Anonymous callers
    /// get the anonymous tier; a valid bearer token selects the account tier.
    pub async fn upload_file(
        State(app_state): State<AppState>,
        auth: MaybeAuthAccount,
        headers: HeaderMap,
        mut multipart: Multipart,
    ) -> Result<(StatusCode, Json<UploadFileResponse>), ApplicationError> {
        let mut file: Option<FileData> = None;
        let mut security_pin: Option<String> = None;

        while let Some(field) = multipart.next_field().await.map_err(|e| {
            warn!("Invalid multipart data: {}", e);
            ApplicationError::BadRequest("Invalid request format".to_string())
        })? {
            let name = field.name().unwrap_or("").to_string();

            match name.as_str() {
                "file" => {
                    let filename = field.file_name().unwrap_or("file").to_string();
                    let mime_type = field
                        .content_type()
                        .unwrap_or("application/octet-stream")
                        .to_string();
                    let bytes = field.bytes().await.map_err(|e| {
                        warn!("Cannot read file bytes: {}", e);
                        ApplicationError::BadRequest("Invalid file data".to_string())
                    })?;
                    file = Some(FileData::new(bytes.to_vec(), filename, mime_type));
                }
                "securityPin" => {
                    let pin = field.text().await.map_err(|e| {
                        warn!("Invalid securityPin field: {}", e);
                        ApplicationError::BadRequest("Invalid request data".to_string())
                    })?;
                    if !pin.is_empty() {
                        security_pin = Some(pin);
                    }
                }
                _ => {}
            }
        }

        let file = file.ok_or_else(|| {
            warn!("Missing required 'file' field in upload");
            ApplicationError::BadRequest("No file uploaded".to_string())
        })?;

        let now = Utc::now();
        let owner = auth.0;
        let tier = owner
            .as_ref()
            .map(|account| account.effective_tier(now))
            .unwrap_or(Tier::Anonymous);
        let policy = app_state.tiers.policy(tier);

        // Nothing has been written yet; the buffered bytes just drop.
        if file.size() > policy.max_upload_bytes {
            return Err(ApplicationError::BadRequest(format!(
                "File size exceeds limit for {} tier ({}MB)",
                tier,
                policy.max_upload_bytes / (1024 * 1024)
            )));
        }

        let expires_at = now + policy.link_validity;
        let original_name = file.filename.clone();
        let mime_type = file.mime_type.clone();
        let file_size = file.size();

        let storage_key = app_state.storage_service.upload(file).await?;

        let mut record: Option<FileRecord> = None;
        for _ in 0..SHORT_CODE_ATTEMPTS {
            let new_record = NewFileRecord {
                short_code: short_code::generate(),
                storage_key: storage_key.clone(),
                original_name: original_name.clone(),
                file_size,
                mime_type: mime_type.clone(),
                security_pin: security_pin.clone(),
                owner_id: owner.as_ref().map(|account| account.id),
                tier,
                expires_at,
            };

            match app_state.file_repository.create(new_record).await {
                Ok(created) => {
                    record = Some(created);
                    break;
                }
                Err(ApplicationError::Conflict) => {
                    info!("Short code collision, retrying with a fresh code");
                }
                Err(e) => {
                    // A record never materialized; the bytes must not outlive it.
                    Self::discard_stored_bytes(&app_state, &storage_key).await;
                    return Err(e);
                }
            }
        }

        let mut record = match record {
            Some(record) => record,
            None => {
                Self::discard_stored_bytes(&app_state, &storage_key).await;
                return Err(ApplicationError::InternalError(
                    "Could not allocate a unique short code".to_string(),
                ));
            }
        };

        let origin = resolve_origin(app_state.config.public_origin.as_deref(), &headers);
        let share_url = share_url(&origin, &record.short_code);

        if let Some(qr_code) = qr::encode_data_url(&share_url) {
            if let Err(e) = app_state
                .file_repository
                .attach_qr_code(&record.short_code, &qr_code)
                .await
            {
                warn!("Failed to persist QR code: {:?}", e);
            }
            record.qr_code = Some(qr_code);
        }

        if let Some(account) = &owner {
            if let Err(e) = app_state.account_repository.record_upload(account.id).await {
                warn!("Failed to bump upload count for {}: {:?}", account.id, e);
            }
        }

        info!(
            short_code = %record.short_code,
            tier = %tier,
            size_bytes = file_size,
            "File uploaded"
        );

        Ok((
            StatusCode::CREATED,
            Json(UploadFileResponse {
                message: "File uploaded successfully".to_string(),
                file: UploadedFile::from_record(record, share_url),
            }),
        ))
    }

    /// GET /api/files/{short_code}
    pub async fn get_file_info(
        State(app_state): State<AppState>,
        Path(short_code): Path<String>,
        headers: HeaderMap,
    ) -> Result<Json<FileInfoResponse>, ApplicationError> {
        let mut record = app_state
            .file_repository
            .find_by_short_code(&short_code)
            .await?
            .ok_or(ApplicationError::NotFound)?;

        if record.is_expired(Utc::now()) {
            return Err(ApplicationError::Expired);
        }

        // Same origin resolution as upload, so the URL here always matches
        // the one handed out at upload time for the same request context.
        let origin = resolve_origin(app_state.config.public_origin.as_deref(), &headers);
        let share_url = share_url(&origin, &record.short_code);

        if record.qr_code.is_none() {
            if let Some(qr_code) = qr::encode_data_url(&share_url) {
                if let Err(e) = app_state
                    .file_repository
                    .attach_qr_code(&record.short_code, &qr_code)
                    .await
                {
                    warn!("Failed to persist backfilled QR code: {:?}", e);
                }
                record.qr_code = Some(qr_code);
            }
        }

        Ok(Json(FileInfoResponse {
            file: FileInfo::from_record(record, share_url),
        }))
    }

    /// POST /api/files/download/{short_code}, body {"pin": "..."}
    pub async fn download_file(
        State(app_state): State<AppState>,
        Path(short_code): Path<String>,
        body: Option<Json<DownloadRequest>>,
    ) -> Result<Response, ApplicationError> {
        let submitted_pin = body.and_then(|Json(request)| request.pin);

        let record = app_state
            .file_repository
            .find_by_short_code(&short_code)
            .await?
            .ok_or(ApplicationError::NotFound)?;

        if record.is_expired(Utc::now()) {
            return Err(ApplicationError::Expired);
        }

        if !record.pin_matches(submitted_pin.as_deref()) {
            warn!(short_code = %short_code, "Download rejected: wrong security PIN");
            return Err(ApplicationError::Unauthorized);
        }

        // Open the stream before touching counters: a record whose bytes are
        // gone (or a storage failure) must leave the counters untouched.
        let stream = app_state
            .storage_service
            .download(&record.storage_key)
            .await?;

        let record = app_state.file_repository.record_download(&short_code).await?;

        if let Some(owner_id) = record.owner_id {
            if let Err(e) = app_state.account_repository.add_downloads(owner_id, 1).await {
                warn!("Failed to bump total downloads for {}: {:?}", owner_id, e);
            }
        }

        info!(short_code = %short_code, "File download started");

        let filename = record.original_name.replace('"', "_");
        Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, record.mime_type)
            .header(header::CONTENT_LENGTH, record.file_size)
            .header(
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            )
            .body(Body::from_stream(stream))
            .map_err(|e| ApplicationError::InternalError(e.to_string()))
    }

    /// DELETE /api/files — manual trigger for the expiry sweep, gated by the
    /// X-Admin-Secret header.
    pub async fn cleanup_expired_files(
        State(app_state): State<AppState>,
        headers: HeaderMap,
    ) -> Result<Json<CleanupResponse>, ApplicationError> {
        let provided_secret = headers
            .get("X-Admin-Secret")
            .and_then(|v| v.to_str().ok())
            .ok_or(ApplicationError::Unauthorized)?;

        let matches: bool = provided_secret
            .as_bytes()
            .ct_eq(app_state.config.admin_secret.as_bytes())
            .into();
        if !matches {
            return Err(ApplicationError::Unauthorized);
        }

        let outcome =
            sweeper::sweep(&app_state.file_repository, &app_state.storage_service).await?;

        Ok(Json(CleanupResponse {
            deleted_count: outcome.deleted_count,
            errors: outcome.errors,
        }))
    }

    async fn discard_stored_bytes(app_state: &AppState, storage_key: &str) {
        if let Err(e) = app_state.storage_service.delete(storage_key).await {
            warn!(
                "Failed to clean up stored bytes after persistence failure: {:?}",
                e
            );
        }
    }
}
