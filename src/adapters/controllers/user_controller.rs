use std::sync::Arc;

use axum::{extract::State, Json};
use chrono::{Months, Utc};

use crate::{
    adapters::{
        auth::AuthAccount,
        dto::user_dto::{
            Analytics, AnalyticsResponse, ProfileResponse, UpgradeResponse, UserFilesResponse,
        },
    },
    application::{
        error::ApplicationError,
        repositories::{account_repository::AccountRepository, file_repository::FileRepository},
    },
};

pub struct UserController;

impl UserController {
    /// GET /api/users/profile
    pub async fn get_profile(AuthAccount(account): AuthAccount) -> Json<ProfileResponse> {
        Json(ProfileResponse {
            user: account.into(),
        })
    }

    /// GET /api/users/files — the caller's records, newest first.
    pub async fn get_user_files(
        State(file_repo): State<Arc<dyn FileRepository>>,
        AuthAccount(account): AuthAccount,
    ) -> Result<Json<UserFilesResponse>, ApplicationError> {
        let files = file_repo.find_by_owner(account.id).await?;

        Ok(Json(UserFilesResponse {
            files: files.into_iter().map(Into::into).collect(),
        }))
    }

    /// GET /api/users/analytics
    pub async fn get_analytics(
        State(file_repo): State<Arc<dyn FileRepository>>,
        AuthAccount(account): AuthAccount,
    ) -> Result<Json<AnalyticsResponse>, ApplicationError> {
        let files = file_repo.find_by_owner(account.id).await?;
        let now = Utc::now();

        let analytics = Analytics {
            total_uploads: files.len(),
            total_downloads: files.iter().map(|f| f.download_count).sum(),
            total_size: files.iter().map(|f| f.file_size).sum(),
            active_files: files.iter().filter(|f| !f.is_expired(now)).count(),
        };

        Ok(Json(AnalyticsResponse { analytics }))
    }

    /// POST /api/users/upgrade — payment handling lives elsewhere; this only
    /// flips the tier and stamps a one-month subscription window.
    pub async fn upgrade(
        State(account_repo): State<Arc<dyn AccountRepository>>,
        AuthAccount(account): AuthAccount,
    ) -> Result<Json<UpgradeResponse>, ApplicationError> {
        if account.is_premium() {
            return Err(ApplicationError::BadRequest(
                "Account is already on the premium tier".to_string(),
            ));
        }

        let subscription_end = Utc::now()
            .checked_add_months(Months::new(1))
            .ok_or_else(|| {
                ApplicationError::InternalError("Subscription date overflow".to_string())
            })?;

        let upgraded = account_repo
            .upgrade_to_premium(account.id, subscription_end)
            .await?;

        Ok(Json(UpgradeResponse {
            message: "Upgraded to premium tier successfully".to_string(),
            user: upgraded.into(),
        }))
    }
}
